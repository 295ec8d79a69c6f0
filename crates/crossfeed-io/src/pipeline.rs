//! Offline host pipeline for the crossfeed stage.
//!
//! [`Pipeline`] plays the part of the host: it owns a [`CrossfeedStage`],
//! answers its activation and enable requests, and feeds it blocks of planar
//! audio. Enable requests made through the [`CrossfeedControl`] are picked up
//! before each block, so a control handle on another thread works the same as
//! one used inline.

use std::sync::Arc;

use crossfeed_core::{
    CrossfeedControl, CrossfeedStage, DspBuffer, Host, PipelineId, ReferenceProcessor,
    SampleFormat, SampleProcessor, SharedCoefficients, StageEvent, StageId,
};

use crate::wav::PlanarSamples;

/// The host side of the pipeline, kept apart from the stage so both can be
/// borrowed at once.
#[derive(Debug)]
struct PipelineHost {
    id: PipelineId,
    /// Stage attached (between Init and Close).
    enabled: bool,
    /// Stage wants buffers.
    active: bool,
    /// Enable request not yet answered.
    pending_enable: Option<bool>,
}

impl Host for PipelineHost {
    fn pipeline_id(&self) -> PipelineId {
        self.id
    }

    fn activate(&mut self, stage: StageId, active: bool) {
        tracing::trace!(stage = stage.0, active, "activate");
        self.active = active;
    }

    fn enable(&mut self, stage: StageId, enable: bool) {
        tracing::trace!(stage = stage.0, enable, "enable");
        self.pending_enable = Some(enable);
    }
}

/// A single-stage offline pipeline.
#[derive(Debug)]
pub struct Pipeline<P = ReferenceProcessor> {
    host: PipelineHost,
    stage: CrossfeedStage<P>,
    control: CrossfeedControl,
    format: SampleFormat,
    format_changed: bool,
}

impl Pipeline<ReferenceProcessor> {
    /// Pipeline for a stream of `format`, using the reference processor.
    pub fn new(format: SampleFormat) -> Self {
        Self::with_processor(format, ReferenceProcessor)
    }
}

impl<P: SampleProcessor> Pipeline<P> {
    /// Pipeline for a stream of `format`, using `processor`.
    ///
    /// The corner frequency is normalized to the stream's own rate and follows
    /// it through [`set_format`](Self::set_format).
    pub fn with_processor(format: SampleFormat, processor: P) -> Self {
        let stage = CrossfeedStage::with_processor(
            Arc::new(SharedCoefficients::default()),
            processor,
        );
        let control = stage.control();
        control.set_native_frequency(format.sample_rate);
        Self {
            host: PipelineHost {
                id: PipelineId(0),
                enabled: false,
                active: false,
                pending_enable: None,
            },
            stage,
            control,
            format,
            format_changed: false,
        }
    }

    /// Control handle for this pipeline's stage.
    pub fn control(&self) -> &CrossfeedControl {
        &self.control
    }

    /// The stage itself.
    pub fn stage(&self) -> &CrossfeedStage<P> {
        &self.stage
    }

    /// Current stream format.
    pub fn format(&self) -> SampleFormat {
        self.format
    }

    /// Whether the stage is attached.
    pub fn is_enabled(&self) -> bool {
        self.host.enabled
    }

    /// Whether the stage is receiving buffers.
    pub fn is_active(&self) -> bool {
        self.host.enabled && self.host.active
    }

    /// Apply any pending enable request: attach with `Init` or detach with
    /// `Close`.
    pub fn sync(&mut self) {
        self.stage.sync_enable(&mut self.host);
        match self.host.pending_enable.take() {
            Some(true) if !self.host.enabled => {
                self.host.enabled = true;
                self.stage.configure(&mut self.host, StageEvent::Init);
                tracing::debug!(pipeline = self.host.id.0, "crossfeed attached");
            }
            Some(false) if self.host.enabled => {
                self.stage.configure(&mut self.host, StageEvent::Close);
                self.host.enabled = false;
                self.host.active = false;
                tracing::debug!(pipeline = self.host.id.0, "crossfeed detached");
            }
            _ => {}
        }
    }

    /// Switch to a new stream format. The next block carries the change.
    ///
    /// A new sample rate re-normalizes the corner frequency right away.
    pub fn set_format(&mut self, format: SampleFormat) {
        if format.sample_rate != self.format.sample_rate {
            self.control.set_native_frequency(format.sample_rate);
        }
        if format != self.format {
            tracing::debug!(
                channels = format.channels,
                sample_rate = format.sample_rate,
                "format change"
            );
            self.format = format;
            self.format_changed = true;
        }
    }

    /// Discard the stage's history, as on a seek.
    pub fn flush(&mut self) {
        if self.host.enabled {
            self.stage.configure(&mut self.host, StageEvent::Flush);
        }
    }

    /// Run one block through the pipeline, in place.
    pub fn process_block(&mut self, channels: &mut [&mut [i32]]) {
        self.sync();
        if !self.host.enabled {
            return;
        }

        let mut buf = DspBuffer::new(self.format, channels);
        if self.format_changed {
            // inactive stages still hear about format changes
            self.format_changed = false;
            self.stage.format_changed(&mut self.host, &mut buf);
        } else if self.host.active {
            self.stage.process(&mut self.host, &mut buf);
        }
    }

    /// Run a whole buffer through in blocks of `block_size` frames.
    ///
    /// `on_block` is called with the number of frames after each block.
    pub fn process_all(
        &mut self,
        samples: &mut PlanarSamples,
        block_size: usize,
        mut on_block: impl FnMut(usize),
    ) {
        let frames = samples.frames();
        let block_size = block_size.max(1);
        let mut start = 0;
        while start < frames {
            let end = (start + block_size).min(frames);
            let mut block: Vec<&mut [i32]> = samples
                .channels
                .iter_mut()
                .map(|c| &mut c[start..end])
                .collect();
            self.process_block(&mut block);
            on_block(end - start);
            start = end;
        }
    }
}
