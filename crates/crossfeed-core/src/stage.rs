//! The crossfeed stage as seen by a host pipeline.
//!
//! A host drives the stage with lifecycle events ([`StageEvent`]), format
//! changes, and audio blocks ([`DspBuffer`]). The stage answers by asking the
//! host to activate or deactivate it through the [`Host`] trait.
//!
//! # States
//!
//! ```text
//!   Init ──▶ AwaitingFormat ──(stereo)──▶ Active
//!                  │                     ▲   │
//!               (mono)            (stereo)   (mono)
//!                  ▼                     │   ▼
//!               Inactive ◀───────────────────┘
//!
//!   Close: Inactive and detached, from any state
//!   Flush: history cleared, state kept
//! ```
//!
//! While `AwaitingFormat`, the first block handed to [`CrossfeedStage::process`]
//! is treated as a format change: its format decides whether the stage goes
//! `Active` (and processes that block) or `Inactive` (and leaves it alone).
//! Everything after that dispatches on the state alone.
//!
//! Unsupported formats are not errors; the stage just steps out of the way.

#[cfg(not(feature = "std"))]
use alloc::sync::Arc;
#[cfg(feature = "std")]
use std::sync::Arc;

use crate::coefs::Coefficients;
use crate::control::CrossfeedControl;
use crate::delay::DelayLineState;
use crate::params::SharedCoefficients;
use crate::processor::{ReferenceProcessor, SampleProcessor};

/// Identifies a stage within a host pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct StageId(pub u8);

impl StageId {
    /// The crossfeed stage.
    pub const CROSSFEED: Self = Self(5);
}

/// Identifies a host pipeline instance.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PipelineId(pub u32);

/// What a stage may ask of the pipeline hosting it.
pub trait Host {
    /// The pipeline this host runs.
    fn pipeline_id(&self) -> PipelineId;

    /// Route (or stop routing) buffers through `stage`.
    fn activate(&mut self, stage: StageId, active: bool);

    /// Attach or detach `stage`. The host answers with
    /// [`StageEvent::Init`] or [`StageEvent::Close`].
    fn enable(&mut self, stage: StageId, enable: bool);
}

/// Lifecycle events delivered through [`CrossfeedStage::configure`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StageEvent {
    /// The stage was attached to a pipeline.
    Init,
    /// Discard history (seek, track change).
    Flush,
    /// The stage was detached.
    Close,
}

/// Where the stage is in its lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum StageState {
    /// The next block's format decides what happens.
    #[default]
    AwaitingFormat,
    /// Blocks go through the processor.
    Active,
    /// Blocks pass untouched.
    Inactive,
}

/// Stream format as the host reports it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SampleFormat {
    /// Number of channels.
    pub channels: u16,
    /// Sample rate in Hz.
    pub sample_rate: u32,
}

impl SampleFormat {
    /// Stereo at `sample_rate`.
    pub const fn stereo(sample_rate: u32) -> Self {
        Self {
            channels: 2,
            sample_rate,
        }
    }

    /// Mono at `sample_rate`.
    pub const fn mono(sample_rate: u32) -> Self {
        Self {
            channels: 1,
            sample_rate,
        }
    }
}

/// A block of planar fixed-point audio, mutated in place.
///
/// `remcount` is the number of frames to process; channels may be longer.
#[derive(Debug)]
pub struct DspBuffer<'a, 'b> {
    format: SampleFormat,
    remcount: usize,
    channels: &'a mut [&'b mut [i32]],
}

impl<'a, 'b> DspBuffer<'a, 'b> {
    /// Wrap `channels`, processing as many frames as the shortest one holds.
    pub fn new(format: SampleFormat, channels: &'a mut [&'b mut [i32]]) -> Self {
        let remcount = channels.iter().map(|c| c.len()).min().unwrap_or(0);
        Self {
            format,
            remcount,
            channels,
        }
    }

    /// Limit processing to the first `remcount` frames.
    pub fn with_remcount(mut self, remcount: usize) -> Self {
        self.remcount = remcount;
        self
    }

    /// Stream format.
    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Frames to process.
    pub fn remcount(&self) -> usize {
        self.remcount
    }

    /// Number of channel slices.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// One channel's samples, up to `remcount`.
    pub fn channel(&self, index: usize) -> Option<&[i32]> {
        let n = self.remcount;
        self.channels.get(index).map(|c| &c[..n.min(c.len())])
    }

    /// The first two channels, both cut to `remcount`.
    pub fn stereo_mut(&mut self) -> Option<(&mut [i32], &mut [i32])> {
        let n = self.remcount;
        match &mut *self.channels {
            [left, right, ..] => {
                let n = n.min(left.len()).min(right.len());
                Some((&mut left[..n], &mut right[..n]))
            }
            _ => None,
        }
    }
}

/// The crossfeed stage.
///
/// Owns its delay line and coefficients. Parameter changes arrive through
/// the [`SharedCoefficients`] it was built with and are picked up at the start
/// of each processed block.
#[derive(Debug)]
pub struct CrossfeedStage<P = ReferenceProcessor> {
    processor: P,
    state: StageState,
    coefs: Coefficients,
    coefs_version: u32,
    delay: DelayLineState,
    pipeline: Option<PipelineId>,
    shared: Arc<SharedCoefficients>,
    control: CrossfeedControl,
}

impl CrossfeedStage<ReferenceProcessor> {
    /// Stage using the reference processor.
    pub fn new(shared: Arc<SharedCoefficients>) -> Self {
        Self::with_processor(shared, ReferenceProcessor)
    }
}

impl<P: SampleProcessor> CrossfeedStage<P> {
    /// Stage using `processor` for the per-sample loop.
    ///
    /// Starts from the set already held in `shared`.
    pub fn with_processor(shared: Arc<SharedCoefficients>, processor: P) -> Self {
        let (version, coefs) = shared.read();
        Self {
            processor,
            state: StageState::AwaitingFormat,
            coefs,
            coefs_version: version,
            delay: DelayLineState::new(),
            pipeline: None,
            control: CrossfeedControl::new(Arc::clone(&shared)),
            shared,
        }
    }

    /// A control handle publishing into this stage.
    ///
    /// Every handle returned shares one rate and cross-path request.
    pub fn control(&self) -> CrossfeedControl {
        self.control.clone()
    }

    /// Handle a lifecycle event.
    pub fn configure<H: Host + ?Sized>(&mut self, host: &mut H, event: StageEvent) {
        match event {
            StageEvent::Init => {
                let id = host.pipeline_id();
                self.pipeline = Some(id);
                self.state = StageState::AwaitingFormat;
                host.activate(StageId::CROSSFEED, true);
                self.flush();
                #[cfg(feature = "tracing")]
                tracing::debug!(pipeline = id.0, "crossfeed: init");
            }
            StageEvent::Flush => self.flush(),
            StageEvent::Close => {
                self.pipeline = None;
                self.state = StageState::Inactive;
                #[cfg(feature = "tracing")]
                tracing::debug!("crossfeed: close");
            }
        }
    }

    /// React to a new stream format carried by `buf`.
    ///
    /// Fewer than two channels deactivates the stage and leaves `buf` alone.
    /// Otherwise the stage activates and processes `buf` once.
    pub fn format_changed<H: Host + ?Sized>(&mut self, host: &mut H, buf: &mut DspBuffer<'_, '_>) {
        let format = buf.format();
        if format.channels < 2 {
            self.flush();
            self.state = StageState::Inactive;
            host.activate(StageId::CROSSFEED, false);
            #[cfg(feature = "tracing")]
            tracing::debug!(channels = format.channels, "crossfeed: format rejected");
            return;
        }

        host.activate(StageId::CROSSFEED, true);
        self.state = StageState::Active;
        #[cfg(feature = "tracing")]
        tracing::debug!(
            channels = format.channels,
            sample_rate = format.sample_rate,
            "crossfeed: format accepted"
        );
        self.run(buf);
    }

    /// Process one block according to the current state.
    pub fn process<H: Host + ?Sized>(&mut self, host: &mut H, buf: &mut DspBuffer<'_, '_>) {
        match self.state {
            StageState::AwaitingFormat => self.format_changed(host, buf),
            StageState::Active => self.run(buf),
            StageState::Inactive => {}
        }
    }

    /// Ask the host to attach or detach the stage.
    ///
    /// Does nothing if the stage is already in the requested attachment.
    pub fn enable<H: Host + ?Sized>(&mut self, host: &mut H, enable: bool) {
        if enable == self.is_attached() {
            return;
        }
        #[cfg(feature = "tracing")]
        tracing::debug!(enable, "crossfeed: forwarding enable to host");
        host.enable(StageId::CROSSFEED, enable);
    }

    /// Forward the enable flag last set through [`CrossfeedControl`].
    pub fn sync_enable<H: Host + ?Sized>(&mut self, host: &mut H) {
        let wanted = self.shared.enabled();
        self.enable(host, wanted);
    }

    /// Clear delay and filter history.
    pub fn flush(&mut self) {
        self.delay.flush();
    }

    /// Current lifecycle state.
    pub fn state(&self) -> StageState {
        self.state
    }

    /// True while blocks go through the processor.
    pub fn is_active(&self) -> bool {
        self.state == StageState::Active
    }

    /// True between `Init` and `Close`.
    pub fn is_attached(&self) -> bool {
        self.pipeline.is_some()
    }

    /// Pipeline this stage is attached to, if any.
    pub fn pipeline(&self) -> Option<PipelineId> {
        self.pipeline
    }

    /// Coefficients the last block was processed with.
    pub fn coefficients(&self) -> Coefficients {
        self.coefs
    }

    /// Delay line and filter history.
    pub fn delay_state(&self) -> &DelayLineState {
        &self.delay
    }

    /// Processor in use.
    pub fn processor(&self) -> &P {
        &self.processor
    }

    /// Pick up newly published coefficients, keeping the current set if the
    /// snapshot loses to a writer.
    fn refresh_coefficients(&mut self) {
        match self.shared.snapshot() {
            Some((version, coefs)) if version != self.coefs_version => {
                self.coefs = coefs;
                self.coefs_version = version;
            }
            _ => {}
        }
    }

    fn run(&mut self, buf: &mut DspBuffer<'_, '_>) {
        self.refresh_coefficients();
        if let Some((left, right)) = buf.stereo_mut() {
            self.processor
                .process(&self.coefs, &mut self.delay, left, right);
        }
    }
}
