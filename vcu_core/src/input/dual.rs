//! Dual-channel differential-propagation comparison.
//!
//! The two physical channels of a dual input must transition within the
//! guaranteed skew bound for the transition to qualify. Pairs separated
//! by more than the bound are dropped silently, with no counter effect,
//! and a lone edge whose partner never arrives expires once the never
//! bound has passed. The band between the two bounds is resolved
//! strictly: only skew at or below the guaranteed bound qualifies, which
//! is monotonic and satisfies both the always- and never-qualify
//! properties.

use vcu_common::input::Channel;

use super::EdgeKind;

/// Outcome of feeding one tick of channel edges to the comparator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DualOutcome {
    /// No qualified transition this tick.
    None,
    /// Both channels agreed within the guaranteed bound.
    Qualified(EdgeKind),
    /// A transition was dropped as out-of-tolerance or unpaired.
    /// Carried so compound qualifiers can invalidate a pending event.
    Dropped(EdgeKind),
}

#[derive(Debug, Clone, Copy)]
struct PendingEdge {
    kind: EdgeKind,
    channel: Channel,
    tick: u64,
}

/// Edge-pairing comparator for one dual-channel input.
#[derive(Debug, Clone, Default)]
pub struct DualCompare {
    guaranteed_ticks: u64,
    never_ticks: u64,
    pending: Option<PendingEdge>,
}

impl DualCompare {
    pub fn new(guaranteed_ticks: u64, never_ticks: u64) -> Self {
        Self {
            guaranteed_ticks,
            never_ticks,
            pending: None,
        }
    }

    /// Feed this tick's debounced edges from both channels.
    pub fn step(
        &mut self,
        now: u64,
        edges: [Option<EdgeKind>; 2],
    ) -> DualOutcome {
        // Expire a lone edge whose partner never arrived.
        if let Some(p) = self.pending {
            if now.saturating_sub(p.tick) > self.never_ticks {
                self.pending = None;
            }
        }

        match (edges[0], edges[1]) {
            (None, None) => DualOutcome::None,
            (Some(k1), Some(k2)) => {
                self.pending = None;
                if k1 == k2 {
                    // Same tick: zero skew, always qualifies.
                    DualOutcome::Qualified(k1)
                } else {
                    // Opposite directions can never agree.
                    DualOutcome::Dropped(k1)
                }
            }
            (Some(k), None) => self.offer(now, k, Channel::Ch1),
            (None, Some(k)) => self.offer(now, k, Channel::Ch2),
        }
    }

    fn offer(&mut self, now: u64, kind: EdgeKind, channel: Channel) -> DualOutcome {
        match self.pending.take() {
            Some(p) if p.channel != channel => {
                let skew = now.saturating_sub(p.tick);
                if p.kind == kind && skew <= self.guaranteed_ticks {
                    DualOutcome::Qualified(kind)
                } else {
                    // Out-of-tolerance or direction mismatch: both edges
                    // are masked for this transition.
                    DualOutcome::Dropped(kind)
                }
            }
            Some(p) => {
                // Same channel fired twice without a partner: the older
                // edge expires unpaired, the new one becomes pending.
                self.pending = Some(PendingEdge {
                    kind,
                    channel,
                    tick: now,
                });
                DualOutcome::Dropped(p.kind)
            }
            None => {
                self.pending = Some(PendingEdge {
                    kind,
                    channel,
                    tick: now,
                });
                DualOutcome::None
            }
        }
    }

    /// Discard any pending unpaired edge.
    pub fn reset(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cmp() -> DualCompare {
        // Defaults at 64 kHz: guaranteed = 1 tick, never = 2 ticks.
        DualCompare::new(1, 2)
    }

    #[test]
    fn simultaneous_edges_qualify() {
        let mut c = cmp();
        let out = c.step(10, [Some(EdgeKind::Rising), Some(EdgeKind::Rising)]);
        assert_eq!(out, DualOutcome::Qualified(EdgeKind::Rising));
    }

    #[test]
    fn skew_within_guaranteed_qualifies() {
        let mut c = cmp();
        assert_eq!(c.step(10, [Some(EdgeKind::Rising), None]), DualOutcome::None);
        let out = c.step(11, [None, Some(EdgeKind::Rising)]);
        assert_eq!(out, DualOutcome::Qualified(EdgeKind::Rising));
    }

    #[test]
    fn skew_at_never_bound_fails() {
        let mut c = cmp();
        c.step(10, [Some(EdgeKind::Rising), None]);
        let out = c.step(12, [None, Some(EdgeKind::Rising)]);
        assert_eq!(out, DualOutcome::Dropped(EdgeKind::Rising));
    }

    #[test]
    fn unpaired_edge_expires_silently() {
        let mut c = cmp();
        c.step(10, [Some(EdgeKind::Falling), None]);
        // Partner arrives far too late: treated as a fresh lone edge.
        let out = c.step(20, [None, Some(EdgeKind::Falling)]);
        assert_eq!(out, DualOutcome::None);
    }

    #[test]
    fn direction_mismatch_drops() {
        let mut c = cmp();
        c.step(10, [Some(EdgeKind::Rising), None]);
        let out = c.step(11, [None, Some(EdgeKind::Falling)]);
        assert_eq!(out, DualOutcome::Dropped(EdgeKind::Falling));
    }

    #[test]
    fn same_channel_double_edge_drops_older() {
        let mut c = cmp();
        c.step(10, [Some(EdgeKind::Rising), None]);
        let out = c.step(11, [Some(EdgeKind::Rising), None]);
        assert_eq!(out, DualOutcome::Dropped(EdgeKind::Rising));
        // The replacement edge can still pair.
        let out = c.step(12, [None, Some(EdgeKind::Rising)]);
        assert_eq!(out, DualOutcome::Qualified(EdgeKind::Rising));
    }

    #[test]
    fn repeated_identical_stimulus_is_idempotent() {
        for _ in 0..3 {
            let mut c = cmp();
            c.step(100, [Some(EdgeKind::Rising), None]);
            assert_eq!(
                c.step(101, [None, Some(EdgeKind::Rising)]),
                DualOutcome::Qualified(EdgeKind::Rising)
            );
            c.step(200, [Some(EdgeKind::Rising), None]);
            assert_eq!(
                c.step(202, [None, Some(EdgeKind::Rising)]),
                DualOutcome::Dropped(EdgeKind::Rising)
            );
        }
    }
}
