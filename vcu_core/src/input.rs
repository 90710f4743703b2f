//! Digital input supervision: debounce, qualification, dual-channel
//! comparison, directed self-test, and the channel mask registry.
//!
//! Malformed or out-of-tolerance transitions are silently dropped. "No
//! event" is the fail-safe default, so the qualifier never reports an
//! error upward. Permanent masking is the only state that survives a
//! transition, and it is held in the [`MaskRegistry`] until full reset.

pub mod dual;
pub mod qualifier;
pub mod selftest;

use vcu_common::input::{Channel, InputId};

/// Direction of a debounced logical transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeKind {
    Rising,
    Falling,
}

/// Per physical channel mask and fault flags.
///
/// Set by self-test failure or error-counter saturation; cleared only by
/// full system reset. A masked channel's events are never forwarded to
/// the mode decoder or the vigilance timing system.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ChannelMaskState {
    /// Channel permanently masked.
    pub masked: bool,
    /// Channel reported faulted (feeds the minor-fault aggregate).
    pub faulted: bool,
}

/// Mask registry for all logical inputs' physical channels.
#[derive(Debug, Clone)]
pub struct MaskRegistry {
    channels: [[ChannelMaskState; 2]; InputId::COUNT],
}

impl MaskRegistry {
    /// All channels unmasked.
    pub const fn new() -> Self {
        Self {
            channels: [[ChannelMaskState {
                masked: false,
                faulted: false,
            }; 2]; InputId::COUNT],
        }
    }

    /// Permanently mask one channel and flag it faulted.
    pub fn set_permanent(&mut self, id: InputId, ch: Channel) {
        let state = &mut self.channels[id.index()][ch.index()];
        if !state.masked {
            tracing::warn!(input = ?id, channel = ?ch, "channel permanently masked");
        }
        state.masked = true;
        state.faulted = true;
    }

    /// Mask flags for both channels of an input.
    #[inline]
    pub const fn masked(&self, id: InputId) -> [bool; 2] {
        [
            self.channels[id.index()][0].masked,
            self.channels[id.index()][1].masked,
        ]
    }

    /// True if either channel of the input is masked.
    #[inline]
    pub const fn any_masked(&self, id: InputId) -> bool {
        let m = self.masked(id);
        m[0] || m[1]
    }

    /// True if any channel of any input is masked.
    pub fn any_masked_at_all(&self) -> bool {
        self.channels
            .iter()
            .flatten()
            .any(|c| c.masked)
    }

    /// Full system reset, the only path out of permanent masks.
    pub fn reset(&mut self) {
        *self = Self::new();
    }
}

impl Default for MaskRegistry {
    fn default() -> Self {
        Self::new()
    }
}
