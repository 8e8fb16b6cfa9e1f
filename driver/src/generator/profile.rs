use anyhow::Context;
use ndarray::Array2;
use rand::{rngs::StdRng, Rng, SeedableRng};
use rmsfcore::prelude::RmsfResult;
use rmsfcore::trajectory::{Frame, FrameSource, JsonlTrajectoryWriter, Topology};
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::BufWriter;
use std::path::Path;

const BACKBONE: [&str; 4] = ["N", "CA", "C", "O"];

/// Configuration for generating synthetic trajectories.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub particles: usize,
    pub frames: usize,
    /// Per-axis half-width of the uniform jitter of the stiffest particle.
    pub amplitude: f64,
    /// Constant shift applied to every coordinate.
    pub offset: f64,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            particles: 64,
            frames: 100,
            amplitude: 0.5,
            offset: 0.0,
            seed: 0,
        }
    }
}

impl GeneratorConfig {
    /// Jitter half-width of particle `index`; cycles through four levels.
    pub fn amplitude_of(&self, index: usize) -> f64 {
        self.amplitude * (1.0 + (index % 4) as f64 * 0.5)
    }

    pub fn topology(&self) -> Topology {
        Topology::new(
            (0..self.particles.max(1))
                .map(|i| BACKBONE[i % BACKBONE.len()].to_string())
                .collect(),
        )
    }
}

/// Frame source producing particles jittering around fixed reference sites.
///
/// Each axis is drawn uniformly from `[-a, a]`, so the expected RMSF of a
/// particle equals its amplitude `a`.
pub struct SyntheticTrajectory {
    config: GeneratorConfig,
    topology: Topology,
    reference: Array2<f64>,
    rng: StdRng,
    next_index: usize,
}

impl SyntheticTrajectory {
    pub fn new(config: GeneratorConfig) -> Self {
        let topology = config.topology();
        let reference = Array2::from_shape_fn((topology.len(), 3), |(i, axis)| {
            let site = i as f64 * 3.8;
            config.offset
                + match axis {
                    0 => site,
                    1 => (site * 0.1).sin() * 5.0,
                    _ => (site * 0.1).cos() * 5.0,
                }
        });
        Self {
            rng: StdRng::seed_from_u64(config.seed),
            config,
            topology,
            reference,
            next_index: 0,
        }
    }
}

impl FrameSource for SyntheticTrajectory {
    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn n_frames(&self) -> Option<usize> {
        Some(self.config.frames.saturating_sub(self.next_index))
    }

    fn next_frame(&mut self) -> RmsfResult<Option<Frame>> {
        if self.next_index >= self.config.frames {
            return Ok(None);
        }

        let mut positions = self.reference.clone();
        for (i, mut row) in positions.rows_mut().into_iter().enumerate() {
            let amplitude = self.config.amplitude_of(i);
            if amplitude > 0.0 {
                for value in row.iter_mut() {
                    *value += self.rng.gen_range(-amplitude..amplitude);
                }
            }
        }

        let frame = Frame::new(self.next_index, Some(self.next_index as f64), positions);
        self.next_index += 1;
        Ok(Some(frame))
    }
}

/// Streams a synthetic trajectory to `path` in JSON Lines format.
pub fn write_trajectory<P: AsRef<Path>>(config: &GeneratorConfig, path: P) -> anyhow::Result<usize> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    let file =
        File::create(path).with_context(|| format!("creating trajectory {}", path.display()))?;

    let mut source = SyntheticTrajectory::new(config.clone());
    let mut writer =
        JsonlTrajectoryWriter::new(BufWriter::new(file), source.topology(), source.n_frames())
            .context("writing trajectory header")?;
    while let Some(frame) = source.next_frame()? {
        writer
            .write_frame(frame.positions.view(), frame.time)
            .with_context(|| format!("writing frame {}", frame.index))?;
    }
    let written = writer.frames_written();
    writer.finish().context("flushing trajectory")?;
    Ok(written)
}
