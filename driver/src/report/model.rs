use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ParticleRmsf {
    /// Position of the particle in the full trajectory.
    pub index: usize,
    pub name: String,
    pub rmsf: f64,
}

/// Result sink written after a successful run.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct RmsfReport {
    pub n_frames: usize,
    pub selection: String,
    pub particles: Vec<ParticleRmsf>,
}

impl RmsfReport {
    pub fn write_json<P: AsRef<Path>>(&self, path: P) -> anyhow::Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating directory {}", parent.display()))?;
        }
        let file =
            File::create(path).with_context(|| format!("creating report {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)
            .with_context(|| format!("writing report {}", path.display()))?;
        writer
            .flush()
            .with_context(|| format!("flushing report {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn report_is_written_as_json() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/rmsf.json");
        let report = RmsfReport {
            n_frames: 10,
            selection: "name CA".into(),
            particles: vec![ParticleRmsf {
                index: 1,
                name: "CA".into(),
                rmsf: 0.75,
            }],
        };
        report.write_json(&path).unwrap();

        let restored: RmsfReport =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(restored, report);
    }
}
