//! Delay line and filter history for the cross path.
//!
//! The delay models the extra path length from each speaker to the far ear.
//! It holds [`DELAY_FRAMES`] interleaved (L, R) pairs in a fixed array: no heap,
//! no resizing, and a cursor that wraps unconditionally so it can never index
//! out of range.
//!
//! The capacity is part of the acoustic model, not a tuning knob.

/// Delay in sample frames (13 samples ≈ 0.3 ms at 44.1 kHz).
pub const DELAY_FRAMES: usize = 13;

/// Length of the interleaved delay buffer.
pub const DELAY_LEN: usize = DELAY_FRAMES * 2;

/// One-sample filter memory for one channel.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChannelHistory {
    /// Previous delayed sample fed to the filter, `x[n-1]`.
    pub prev_in: i32,
    /// Previous filter output, `y[n-1]`.
    pub prev_out: i32,
}

/// Delay buffer, cursor, and per-channel filter history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DelayLineState {
    pub(crate) left: ChannelHistory,
    pub(crate) right: ChannelHistory,
    pub(crate) delay: [i32; DELAY_LEN],
    pub(crate) index: usize,
}

impl Default for DelayLineState {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayLineState {
    /// Zeroed state with the cursor at the start.
    pub const fn new() -> Self {
        Self {
            left: ChannelHistory {
                prev_in: 0,
                prev_out: 0,
            },
            right: ChannelHistory {
                prev_in: 0,
                prev_out: 0,
            },
            delay: [0; DELAY_LEN],
            index: 0,
        }
    }

    /// Discard all history and rewind the cursor.
    pub fn flush(&mut self) {
        self.left = ChannelHistory::default();
        self.right = ChannelHistory::default();
        self.delay = [0; DELAY_LEN];
        self.index = 0;
    }

    /// Current cursor into the interleaved buffer, always in `0..DELAY_LEN`.
    pub fn index(&self) -> usize {
        self.index
    }

    /// History as `[left x[n-1], left y[n-1], right x[n-1], right y[n-1]]`.
    pub fn history(&self) -> [i32; 4] {
        [
            self.left.prev_in,
            self.left.prev_out,
            self.right.prev_in,
            self.right.prev_out,
        ]
    }

    /// Raw interleaved delay buffer.
    pub fn delay(&self) -> &[i32; DELAY_LEN] {
        &self.delay
    }

    /// True if every sample and history slot is zero.
    pub fn is_silent(&self) -> bool {
        self.history() == [0; 4] && self.delay.iter().all(|&s| s == 0)
    }
}
