use crate::analysis::accumulator::FrameAccumulator;
use crate::analysis::finalizer::RmsfProfile;
use crate::math::stats::StatsHelper;
use crate::prelude::{AnalysisConfig, AnalysisStage, FrameInput, RmsfError, RmsfResult};
use crate::telemetry::log::LogManager;

enum StageState {
    Uninitialized,
    Accumulating(FrameAccumulator),
    Finalized,
    Failed,
}

/// RMSF of a particle set across a trajectory, driven through [`AnalysisStage`].
///
/// No superposition is performed: frames must already be aligned and
/// particles whole across periodic boundaries. No mass weighting is applied.
pub struct RmsfAnalysis {
    state: StageState,
    processed: usize,
    total_frames: Option<usize>,
    results: Option<RmsfProfile>,
    logger: LogManager,
}

impl RmsfAnalysis {
    pub fn new() -> Self {
        Self {
            state: StageState::Uninitialized,
            processed: 0,
            total_frames: None,
            results: None,
            logger: LogManager::new("rmsf"),
        }
    }

    /// Profile produced by the last successful `conclude`.
    pub fn results(&self) -> Option<&RmsfProfile> {
        self.results.as_ref()
    }

    pub fn is_finalized(&self) -> bool {
        matches!(self.state, StageState::Finalized)
    }

    fn state_name(&self) -> &'static str {
        match self.state {
            StageState::Uninitialized => "uninitialized",
            StageState::Accumulating(_) => "accumulating",
            StageState::Finalized => "finalized",
            StageState::Failed => "failed",
        }
    }
}

impl Default for RmsfAnalysis {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalysisStage for RmsfAnalysis {
    type Output = RmsfProfile;

    fn prepare(&mut self, config: &AnalysisConfig) -> RmsfResult<()> {
        if !matches!(self.state, StageState::Uninitialized) {
            return Err(RmsfError::InvalidState(format!(
                "prepare called on a {} analysis",
                self.state_name()
            )));
        }

        let accumulator = FrameAccumulator::new(config.particle_count)?;
        self.logger = LogManager::new("rmsf").with_verbose(config.verbose);
        self.logger.record(&format!(
            "tracking {} particles",
            accumulator.particle_count()
        ));
        self.state = StageState::Accumulating(accumulator);
        self.processed = 0;
        self.total_frames = config.total_frames;
        self.results = None;
        Ok(())
    }

    fn process_frame(&mut self, frame: FrameInput<'_>) -> RmsfResult<()> {
        let state_name = self.state_name();
        let accumulator = match &mut self.state {
            StageState::Accumulating(accumulator) => accumulator,
            _ => {
                return Err(RmsfError::InvalidState(format!(
                    "process_frame called on a {} analysis",
                    state_name
                )))
            }
        };

        if let Err(err) = accumulator.update(frame.positions, self.processed) {
            self.logger
                .warn(&format!("frame {} rejected: {}", frame.frame_index, err));
            self.state = StageState::Failed;
            return Err(err);
        }
        self.processed += 1;
        self.logger.progress(self.processed, self.total_frames);
        Ok(())
    }

    fn conclude(&mut self) -> RmsfResult<RmsfProfile> {
        let accumulator = match std::mem::replace(&mut self.state, StageState::Failed) {
            StageState::Accumulating(accumulator) => accumulator,
            other => {
                self.state = other;
                return Err(RmsfError::InvalidState(format!(
                    "conclude called on a {} analysis",
                    self.state_name()
                )));
            }
        };

        // On error the state stays Failed and no partial profile is kept.
        let profile = accumulator.finalize()?;
        let values = profile.to_vec();
        if let (Some(max), Some(at)) = (StatsHelper::max(&values), StatsHelper::argmax(&values)) {
            self.logger.record(&format!(
                "{} frames, mean RMSF {:.4}, max RMSF {:.4} at particle {}",
                profile.n_frames(),
                StatsHelper::mean(&values),
                max,
                at
            ));
        }

        self.state = StageState::Finalized;
        self.results = Some(profile.clone());
        Ok(profile)
    }
}
