use crate::math::coords::CoordsHelper;
use crate::prelude::{RmsfError, RmsfResult};
use crate::trajectory::frame::{Frame, Topology};
use crate::trajectory::source::FrameSource;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Parsed from `all`, `name CA CB` or `index 0 4 10:20` (ranges half-open).
///
/// Resolved indices are sorted and unique, so particles keep trajectory order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    All,
    Names(Vec<String>),
    Indices(Vec<IndexSpec>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndexSpec {
    Single(usize),
    Range(usize, usize),
}

impl Selection {
    pub fn resolve(&self, topology: &Topology) -> RmsfResult<Vec<usize>> {
        let picked: BTreeSet<usize> = match self {
            Selection::All => (0..topology.len()).collect(),
            Selection::Names(names) => topology
                .names()
                .iter()
                .enumerate()
                .filter(|(_, name)| names.iter().any(|wanted| wanted == *name))
                .map(|(index, _)| index)
                .collect(),
            Selection::Indices(specs) => {
                let mut picked = BTreeSet::new();
                for spec in specs {
                    let (lo, hi) = match *spec {
                        IndexSpec::Single(i) => (i, i.saturating_add(1)),
                        IndexSpec::Range(lo, hi) => (lo, hi),
                    };
                    if hi > topology.len() {
                        return Err(RmsfError::InvalidSelection(format!(
                            "index {} out of range for {} particles",
                            hi - 1,
                            topology.len()
                        )));
                    }
                    picked.extend(lo..hi);
                }
                picked
            }
        };

        if picked.is_empty() {
            return Err(RmsfError::InvalidSelection(format!(
                "'{}' matches no particles",
                self
            )));
        }
        Ok(picked.into_iter().collect())
    }
}

impl FromStr for Selection {
    type Err = RmsfError;

    fn from_str(text: &str) -> RmsfResult<Self> {
        let mut words = text.split_whitespace();
        let keyword = words
            .next()
            .ok_or_else(|| RmsfError::InvalidSelection("empty selection".into()))?;
        let args: Vec<&str> = words.collect();

        match keyword {
            "all" if args.is_empty() => Ok(Selection::All),
            "name" if !args.is_empty() => Ok(Selection::Names(
                args.iter().map(|name| name.to_string()).collect(),
            )),
            "index" if !args.is_empty() => args
                .iter()
                .map(|arg| parse_index_spec(arg))
                .collect::<RmsfResult<Vec<_>>>()
                .map(Selection::Indices),
            _ => Err(RmsfError::InvalidSelection(format!(
                "cannot parse '{}'",
                text.trim()
            ))),
        }
    }
}

fn parse_index_spec(arg: &str) -> RmsfResult<IndexSpec> {
    let parse = |value: &str| {
        value
            .parse::<usize>()
            .map_err(|_| RmsfError::InvalidSelection(format!("bad index '{}'", arg)))
    };

    match arg.split_once(':') {
        Some((lo, hi)) => {
            let (lo, hi) = (parse(lo)?, parse(hi)?);
            if hi <= lo {
                return Err(RmsfError::InvalidSelection(format!("empty range '{}'", arg)));
            }
            Ok(IndexSpec::Range(lo, hi))
        }
        None => Ok(IndexSpec::Single(parse(arg)?)),
    }
}

impl fmt::Display for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => write!(f, "all"),
            Selection::Names(names) => write!(f, "name {}", names.join(" ")),
            Selection::Indices(specs) => {
                write!(f, "index")?;
                for spec in specs {
                    match spec {
                        IndexSpec::Single(i) => write!(f, " {}", i)?,
                        IndexSpec::Range(lo, hi) => write!(f, " {}:{}", lo, hi)?,
                    }
                }
                Ok(())
            }
        }
    }
}

/// Restricts every frame of `inner` to the selected particles.
pub struct SelectedSource<S> {
    inner: S,
    indices: Vec<usize>,
    topology: Topology,
}

impl<S: FrameSource> SelectedSource<S> {
    pub fn new(inner: S, selection: &Selection) -> RmsfResult<Self> {
        let indices = selection.resolve(inner.topology())?;
        let topology = inner.topology().subset(&indices);
        Ok(Self {
            inner,
            indices,
            topology,
        })
    }

    /// Positions of the selected particles in the unrestricted trajectory.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }
}

impl<S: FrameSource> FrameSource for SelectedSource<S> {
    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn n_frames(&self) -> Option<usize> {
        self.inner.n_frames()
    }

    fn next_frame(&mut self) -> RmsfResult<Option<Frame>> {
        let Some(frame) = self.inner.next_frame()? else {
            return Ok(None);
        };

        let expected = (self.inner.particle_count(), 3);
        if frame.positions.dim() != expected {
            return Err(RmsfError::ShapeMismatch {
                expected,
                found: frame.positions.dim(),
            });
        }

        let positions = CoordsHelper::gather(frame.positions.view(), &self.indices);
        Ok(Some(Frame::new(frame.index, frame.time, positions)))
    }
}
