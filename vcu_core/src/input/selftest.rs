//! Directed self-test of digital input channels.
//!
//! A test drives a known stimulus pattern onto both channels of one
//! input and checks that each channel's sampled level follows it. While
//! the test runs, the input's qualifier output is suppressed so the
//! stimulus cannot surface as operator activity. A channel that fails to
//! follow the pattern is permanently masked and the self-test failure is
//! latched into the minor-fault aggregate by the caller.

use heapless::Deque;

use vcu_common::input::{Channel, InputId};

use super::MaskRegistry;

/// Requests that arrive while a test is running are queued up to this
/// depth; beyond it they are dropped.
const REQUEST_QUEUE_DEPTH: usize = 4;

/// Request to start a directed test on one input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelfTestRequest {
    pub input: InputId,
    /// Expected driven level during the active phase of the pattern.
    pub drive_high: bool,
}

/// Per-tick observation of the test harness.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelfTestFeedback {
    /// Sampled channel levels under test stimulus.
    pub observed: [bool; 2],
    /// Per channel: stimulus currently in its low (release) phase.
    pub test_low: [bool; 2],
    /// Harness still driving the pattern.
    pub in_progress: bool,
}

/// Verdict of a completed test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelfTestVerdict {
    Passed,
    /// Channels that failed to follow the stimulus.
    Failed([bool; 2]),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TestState {
    Idle,
    Running {
        input: InputId,
        drive_high: bool,
        mismatch: [bool; 2],
        /// Previous tick's test_low flags, for release-edge detection.
        prev_low: [bool; 2],
    },
}

/// Self-test sequencer. At most one input is under test at a time;
/// further requests wait in a bounded queue.
#[derive(Debug)]
pub struct SelfTestController {
    state: TestState,
    pending: Deque<SelfTestRequest, REQUEST_QUEUE_DEPTH>,
}

impl SelfTestController {
    pub fn new() -> Self {
        Self {
            state: TestState::Idle,
            pending: Deque::new(),
        }
    }

    /// Input currently under test, if any.
    pub const fn busy_input(&self) -> Option<InputId> {
        match self.state {
            TestState::Idle => None,
            TestState::Running { input, .. } => Some(input),
        }
    }

    /// Advance the sequencer one tick.
    ///
    /// A request starts immediately when idle and is otherwise queued.
    /// Returns the verdict on the tick a test completes; failed
    /// channels are masked in the registry before the verdict is
    /// returned.
    pub fn step(
        &mut self,
        request: Option<SelfTestRequest>,
        feedback: SelfTestFeedback,
        masks: &mut MaskRegistry,
    ) -> Option<SelfTestVerdict> {
        if let Some(req) = request {
            if self.pending.push_back(req).is_err() {
                tracing::warn!(input = ?req.input, "self-test queue full, request dropped");
            }
        }

        if let TestState::Idle = self.state {
            if let Some(req) = self.pending.pop_front() {
                tracing::debug!(input = ?req.input, "self-test started");
                self.state = TestState::Running {
                    input: req.input,
                    drive_high: req.drive_high,
                    mismatch: [false; 2],
                    prev_low: [false; 2],
                };
            }
            return None;
        }

        let TestState::Running {
            input,
            drive_high,
            mut mismatch,
            prev_low,
        } = self.state
        else {
            return None;
        };

        // Compare each channel's observation against the driven phase.
        for ch in 0..2 {
            let expected = if feedback.test_low[ch] {
                !drive_high
            } else {
                drive_high
            };
            if feedback.observed[ch] != expected {
                mismatch[ch] = true;
            }
        }

        // Completion: the harness released both channels (falling edge
        // on both test_low flags observed) and reports done.
        let released = [
            prev_low[0] && !feedback.test_low[0],
            prev_low[1] && !feedback.test_low[1],
        ];
        let done = !feedback.in_progress && released[0] && released[1];

        if !done {
            self.state = TestState::Running {
                input,
                drive_high,
                mismatch,
                prev_low: feedback.test_low,
            };
            return None;
        }

        self.state = TestState::Idle;
        if mismatch[0] || mismatch[1] {
            if mismatch[0] {
                masks.set_permanent(input, Channel::Ch1);
            }
            if mismatch[1] {
                masks.set_permanent(input, Channel::Ch2);
            }
            tracing::warn!(input = ?input, ?mismatch, "self-test failed");
            Some(SelfTestVerdict::Failed(mismatch))
        } else {
            tracing::debug!(input = ?input, "self-test passed");
            Some(SelfTestVerdict::Passed)
        }
    }

    /// Abort any test in progress and drop queued requests.
    pub fn reset(&mut self) {
        self.state = TestState::Idle;
        self.pending.clear();
    }
}

impl Default for SelfTestController {
    fn default() -> Self {
        Self::new()
    }
}
