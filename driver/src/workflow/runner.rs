use crate::report::model::{ParticleRmsf, RmsfReport};
use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use rmsfcore::prelude::{AnalysisConfig, AnalysisStage};
use rmsfcore::telemetry::{LogManager, MetricsRecorder, MetricsSnapshot};
use rmsfcore::trajectory::{FrameSource, JsonlTrajectoryReader, SelectedSource, WindowedSource};
use rmsfcore::{RmsfAnalysis, RmsfProfile};

pub struct WorkflowResult {
    pub profile: RmsfProfile,
    /// Positions of the selected particles in the full trajectory.
    pub indices: Vec<usize>,
    pub names: Vec<String>,
    pub metrics: MetricsSnapshot,
}

impl WorkflowResult {
    pub fn to_report(&self, selection: &str) -> RmsfReport {
        let particles = self
            .indices
            .iter()
            .zip(&self.names)
            .zip(self.profile.rmsf().iter())
            .map(|((&index, name), &rmsf)| ParticleRmsf {
                index,
                name: name.clone(),
                rmsf,
            })
            .collect();

        RmsfReport {
            n_frames: self.profile.n_frames(),
            selection: selection.to_string(),
            particles,
        }
    }
}

/// Drives frames from a trajectory through [`RmsfAnalysis`].
#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let path = &self.config.trajectory;
        let reader = JsonlTrajectoryReader::open(path)
            .with_context(|| format!("opening trajectory {}", path.display()))?;
        self.execute_source(reader)
    }

    /// Applies the configured selection and window to `source` and runs the
    /// analysis to completion.
    pub fn execute_source<S: FrameSource>(&self, source: S) -> anyhow::Result<WorkflowResult> {
        let logger = LogManager::new("runner");
        let metrics = MetricsRecorder::new();

        let selection = self.config.to_selection()?;
        let selected =
            SelectedSource::new(source, &selection).context("applying particle selection")?;
        let indices = selected.indices().to_vec();
        let mut source = WindowedSource::new(selected, self.config.to_window()?)
            .context("applying frame window")?;
        let names = source.topology().names().to_vec();

        logger.record(&format!(
            "selection '{}' -> {} particles, window {:?}",
            selection,
            names.len(),
            source.window()
        ));

        let mut stage = RmsfAnalysis::new();
        stage
            .prepare(&AnalysisConfig {
                particle_count: source.particle_count(),
                total_frames: source.n_frames(),
                verbose: self.config.verbose,
            })
            .context("preparing RMSF analysis")?;

        loop {
            let frame = match source.next_frame() {
                Ok(Some(frame)) => frame,
                Ok(None) => break,
                Err(err) => {
                    metrics.record_error();
                    return Err(err).context("reading trajectory frame");
                }
            };
            if let Err(err) = stage.process_frame(frame.input()) {
                metrics.record_error();
                return Err(err).with_context(|| format!("processing frame {}", frame.index));
            }
            metrics.record_processed();
        }
        metrics.record_skipped_n(source.skipped());

        let profile = stage.conclude().context("finalizing RMSF")?;
        let metrics = metrics.snapshot();
        logger.record(&format!(
            "processed {} frames, skipped {}",
            metrics.frames_processed, metrics.frames_skipped
        ));

        Ok(WorkflowResult {
            profile,
            indices,
            names,
            metrics,
        })
    }
}
