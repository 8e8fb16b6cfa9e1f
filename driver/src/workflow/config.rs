use anyhow::Context;
use rmsfcore::trajectory::{FrameWindow, Selection};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_selection() -> String {
    "all".to_string()
}

fn default_step() -> usize {
    1
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct WorkflowConfig {
    pub trajectory: PathBuf,
    #[serde(default = "default_selection")]
    pub selection: String,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub stop: Option<usize>,
    #[serde(default = "default_step")]
    pub step: usize,
    #[serde(default)]
    pub verbose: bool,
    #[serde(default)]
    pub output: Option<PathBuf>,
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        trajectory: PathBuf,
        selection: &str,
        start: usize,
        stop: Option<usize>,
        step: usize,
    ) -> Self {
        Self {
            trajectory,
            selection: selection.to_string(),
            start,
            stop,
            step,
            verbose: false,
            output: None,
        }
    }

    pub fn to_selection(&self) -> anyhow::Result<Selection> {
        self.selection
            .parse::<Selection>()
            .with_context(|| format!("parsing selection '{}'", self.selection))
    }

    pub fn to_window(&self) -> anyhow::Result<FrameWindow> {
        FrameWindow::new(self.start, self.stop, self.step).context("validating frame window")
    }
}
