//! Cross-channel PWM comparison.
//!
//! Checks the redundant PWM pair for edge skew, a stalled channel, and
//! high-width disagreement. Each check reports which channels it charges
//! so the pipeline can advance the right error counters.

use crate::input::EdgeKind;

use super::capture::PwmCycle;

/// Channels charged by one tick of comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompareCharges {
    /// Edge skew above bound (charged to both channels).
    pub skew: bool,
    /// Stalled channel, per channel, once per stall episode.
    pub stalled: [bool; 2],
    /// High-width disagreement (charged to both channels).
    pub width: bool,
}

impl CompareCharges {
    /// True if any check fired.
    pub fn any(&self) -> bool {
        self.skew || self.stalled[0] || self.stalled[1] || self.width
    }

    /// True if the given channel is charged by any check.
    pub fn charges(&self, ch: usize) -> bool {
        self.skew || self.stalled[ch] || self.width
    }
}

#[derive(Debug, Clone, Copy)]
struct PendingEdge {
    kind: EdgeKind,
    channel: usize,
    tick: u64,
}

/// Comparator state for one redundant PWM pair.
#[derive(Debug, Clone)]
pub struct CrossCompare {
    skew_ticks: u64,
    width_tol_ticks: u64,
    stall_ticks: u64,
    pending: Option<PendingEdge>,
    widths: [Option<u64>; 2],
    stall_latched: [bool; 2],
}

impl CrossCompare {
    pub fn new(skew_ticks: u64, width_tol_ticks: u64, stall_ticks: u64) -> Self {
        Self {
            skew_ticks,
            width_tol_ticks,
            stall_ticks,
            pending: None,
            widths: [None; 2],
            stall_latched: [false; 2],
        }
    }

    /// Feed one tick of edges and completed cycles from both captures.
    ///
    /// `last_edge` is each capture's most recent edge tick, used for
    /// stall detection. A masked channel passes `None` edges and is
    /// excluded from all checks via `active`.
    pub fn step(
        &mut self,
        now: u64,
        edges: [Option<EdgeKind>; 2],
        cycles: [Option<PwmCycle>; 2],
        last_edge: [Option<u64>; 2],
        active: [bool; 2],
    ) -> CompareCharges {
        let mut charges = CompareCharges::default();
        if !(active[0] && active[1]) {
            // Single-channel operation: no cross checks possible.
            self.pending = None;
            self.widths = [None; 2];
            return charges;
        }

        charges.skew = self.check_skew(now, edges);
        charges.stalled = self.check_stall(now, edges, last_edge);
        charges.width = self.check_width(cycles);
        charges
    }

    fn check_skew(&mut self, now: u64, edges: [Option<EdgeKind>; 2]) -> bool {
        // Expire an unpaired edge; its partner is the stall check's job.
        if let Some(p) = self.pending {
            if now.saturating_sub(p.tick) > self.skew_ticks && edges[p.channel ^ 1].is_none() {
                self.pending = None;
            }
        }

        match (edges[0], edges[1]) {
            (None, None) => false,
            (Some(_), Some(_)) => {
                self.pending = None;
                false
            }
            (Some(kind), None) => self.offer(now, kind, 0),
            (None, Some(kind)) => self.offer(now, kind, 1),
        }
    }

    fn offer(&mut self, now: u64, kind: EdgeKind, channel: usize) -> bool {
        match self.pending.take() {
            Some(p) if p.channel != channel && p.kind == kind => {
                // Partner arrived: pair complete, judge the skew.
                now.saturating_sub(p.tick) > self.skew_ticks
            }
            _ => {
                self.pending = Some(PendingEdge { kind, channel, tick: now });
                false
            }
        }
    }

    fn check_stall(
        &mut self,
        now: u64,
        edges: [Option<EdgeKind>; 2],
        last_edge: [Option<u64>; 2],
    ) -> [bool; 2] {
        let mut stalled = [false; 2];
        for ch in 0..2 {
            if edges[ch].is_some() {
                self.stall_latched[ch] = false;
                continue;
            }
            let silent = match last_edge[ch] {
                Some(t) => now.saturating_sub(t) > self.stall_ticks,
                // Never toggled at all: silent since power-on.
                None => now > self.stall_ticks,
            };
            let partner_alive = match last_edge[ch ^ 1] {
                Some(t) => now.saturating_sub(t) <= self.stall_ticks,
                None => false,
            };
            if silent && partner_alive && !self.stall_latched[ch] {
                self.stall_latched[ch] = true;
                stalled[ch] = true;
            }
        }
        stalled
    }

    fn check_width(&mut self, cycles: [Option<PwmCycle>; 2]) -> bool {
        for ch in 0..2 {
            if let Some(c) = cycles[ch] {
                self.widths[ch] = Some(c.high_ticks);
            }
        }
        // Compare once both channels have a fresh width.
        if let [Some(w1), Some(w2)] = self.widths {
            self.widths = [None; 2];
            w1.abs_diff(w2) > self.width_tol_ticks
        } else {
            false
        }
    }

    pub fn reset(&mut self) {
        self.pending = None;
        self.widths = [None; 2];
        self.stall_latched = [false; 2];
    }
}
