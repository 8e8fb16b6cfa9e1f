use log::{debug, info, warn};

/// Thin wrapper over the `log` facade that tags records with a component name.
pub struct LogManager {
    component: &'static str,
    verbose: bool,
}

impl LogManager {
    pub fn new(component: &'static str) -> Self {
        Self {
            component,
            verbose: false,
        }
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    pub fn record(&self, message: &str) {
        info!("[{}] {}", self.component, message);
    }

    pub fn warn(&self, message: &str) {
        warn!("[{}] {}", self.component, message);
    }

    /// Per-frame progress; promoted to `info` only in verbose mode.
    pub fn progress(&self, processed: usize, total: Option<usize>) {
        let line = match total {
            Some(total) => format!("[{}] frame {}/{}", self.component, processed, total),
            None => format!("[{}] frame {}", self.component, processed),
        };
        if self.verbose {
            info!("{}", line);
        } else {
            debug!("{}", line);
        }
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new("rmsf")
    }
}
