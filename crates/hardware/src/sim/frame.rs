//! Frame (animation) loop.
//!
//! Runs the engine once per frame. After each run the cores are snapshotted, a
//! [`FrameReport`] is handed to the observer, and all frame state is reset. Without an
//! animation the loop ends after the first frame; with one, it continues until the
//! animation has no frames left, rebuilding the animation's spatial index every
//! `rebuild_frequency` frames.

use tracing::{debug, info};

use crate::common::SimResult;
use crate::config::AnimationConfig;
use crate::sim::engine::Engine;
use crate::soc::SharedResourceSet;
use crate::stats::FrameReport;

/// Source of animated scene frames.
pub trait Animation {
    /// Index of the frame currently loaded.
    fn current_frame(&self) -> usize;

    /// Advances to the next frame; returns `false` when there are none left.
    fn load_next_frame(&mut self) -> bool;

    /// Rebuilds the acceleration structure after objects have moved.
    fn rebuild_spatial_index(&mut self);
}

/// Consumer of finished frames (statistics, image output).
pub trait FrameObserver {
    /// Called once per frame, before any state is reset.
    ///
    /// # Errors
    ///
    /// Any error stops the frame loop and is returned from [`FrameLoop::run`].
    fn frame_complete(&mut self, report: &FrameReport, shared: &SharedResourceSet)
    -> SimResult<()>;
}

/// Totals for a completed frame loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameLoopSummary {
    /// Frames simulated.
    pub frames: usize,
    /// Spatial index rebuilds triggered.
    pub rebuilds: usize,
    /// Cycles simulated over every frame.
    pub total_cycles: u64,
}

/// Drives an engine through a sequence of frames.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FrameLoop {
    rebuild_frequency: u32,
    frames_since_rebuild: u32,
}

impl FrameLoop {
    /// Creates a frame loop; a `rebuild_frequency` of zero never rebuilds.
    pub const fn new(config: &AnimationConfig) -> Self {
        Self {
            rebuild_frequency: config.rebuild_frequency,
            frames_since_rebuild: 0,
        }
    }

    /// Frames loaded since the spatial index was last rebuilt.
    pub const fn frames_since_rebuild(&self) -> u32 {
        self.frames_since_rebuild
    }

    /// Runs frames until the animation is exhausted (or once, without an animation).
    ///
    /// # Errors
    ///
    /// Propagates engine failures and observer errors.
    pub fn run(
        &mut self,
        engine: &mut Engine,
        mut animation: Option<&mut dyn Animation>,
        observer: &mut dyn FrameObserver,
    ) -> SimResult<FrameLoopSummary> {
        let mut summary = FrameLoopSummary::default();
        loop {
            let frame = animation.as_deref().map_or(0, |a| a.current_frame());
            let run = engine.run()?;
            let snapshots = engine.snapshot()?;
            info!(
                frame,
                cycles = run.cycles,
                seconds = run.host_time.as_secs_f64(),
                "frame complete"
            );

            engine.with_shared(|shared| {
                let report = FrameReport::new(frame, &run, &snapshots, shared);
                observer.frame_complete(&report, shared)
            })?;
            engine.reset()?;
            summary.frames += 1;
            summary.total_cycles += run.cycles;

            let Some(anim) = animation.as_deref_mut() else {
                break;
            };
            if !anim.load_next_frame() {
                break;
            }
            self.frames_since_rebuild += 1;
            if self.rebuild_frequency != 0 && self.frames_since_rebuild == self.rebuild_frequency
            {
                debug!(frame = anim.current_frame(), "rebuilding spatial index");
                anim.rebuild_spatial_index();
                self.frames_since_rebuild = 0;
                summary.rebuilds += 1;
            }
        }
        Ok(summary)
    }
}
