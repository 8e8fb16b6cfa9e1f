use crate::math::coords::CoordsHelper;
use crate::prelude::{RmsfError, RmsfResult};
use crate::trajectory::frame::{Frame, FrameRecord, Topology, TrajectoryHeader};
use crate::trajectory::source::FrameSource;
use ndarray::ArrayView2;
use std::fs::File;
use std::io::{BufRead, BufReader, Write};
use std::path::Path;

/// Lazily reads a JSON Lines trajectory:
///
/// ```text
/// {"particles": ["N", "CA"], "n_frames": 2}
/// {"time": 0.0, "positions": [[0.0, 0.0, 0.0], [1.5, 0.0, 0.0]]}
/// ```
///
/// `n_frames` and `time` are optional; blank lines are ignored.
pub struct JsonlTrajectoryReader<R> {
    reader: R,
    topology: Topology,
    declared_frames: Option<usize>,
    next_index: usize,
    line_number: usize,
    line: String,
}

impl JsonlTrajectoryReader<BufReader<File>> {
    pub fn open<P: AsRef<Path>>(path: P) -> RmsfResult<Self> {
        let file = File::open(path.as_ref())?;
        Self::new(BufReader::new(file))
    }
}

impl<R: BufRead> JsonlTrajectoryReader<R> {
    pub fn new(reader: R) -> RmsfResult<Self> {
        let mut this = Self {
            reader,
            topology: Topology::default(),
            declared_frames: None,
            next_index: 0,
            line_number: 0,
            line: String::new(),
        };

        if !this.read_content_line()? {
            return Err(RmsfError::Trajectory("missing header line".into()));
        }
        let header: TrajectoryHeader = serde_json::from_str(&this.line).map_err(|err| {
            RmsfError::Trajectory(format!("line {}: bad header: {}", this.line_number, err))
        })?;
        if header.particles.is_empty() {
            return Err(RmsfError::Trajectory("header lists no particles".into()));
        }

        this.topology = Topology::new(header.particles);
        this.declared_frames = header.n_frames;
        Ok(this)
    }

    /// Reads up to the next non-blank line; `false` at end of input.
    fn read_content_line(&mut self) -> RmsfResult<bool> {
        loop {
            self.line.clear();
            if self.reader.read_line(&mut self.line)? == 0 {
                return Ok(false);
            }
            self.line_number += 1;
            if !self.line.trim().is_empty() {
                return Ok(true);
            }
        }
    }
}

impl<R: BufRead> FrameSource for JsonlTrajectoryReader<R> {
    fn topology(&self) -> &Topology {
        &self.topology
    }

    fn n_frames(&self) -> Option<usize> {
        self.declared_frames
            .map(|total| total.saturating_sub(self.next_index))
    }

    fn next_frame(&mut self) -> RmsfResult<Option<Frame>> {
        if !self.read_content_line()? {
            return Ok(None);
        }

        let record: FrameRecord = serde_json::from_str(&self.line).map_err(|err| {
            RmsfError::Trajectory(format!("line {}: bad frame: {}", self.line_number, err))
        })?;
        if record.positions.len() != self.topology.len() {
            return Err(RmsfError::Trajectory(format!(
                "line {}: frame has {} positions, header lists {} particles",
                self.line_number,
                record.positions.len(),
                self.topology.len()
            )));
        }

        let frame = record.into_frame(self.next_index);
        self.next_index += 1;
        Ok(Some(frame))
    }
}

pub struct JsonlTrajectoryWriter<W: Write> {
    writer: W,
    particle_count: usize,
    frames_written: usize,
}

impl<W: Write> JsonlTrajectoryWriter<W> {
    pub fn new(mut writer: W, topology: &Topology, n_frames: Option<usize>) -> RmsfResult<Self> {
        let header = TrajectoryHeader {
            particles: topology.names().to_vec(),
            n_frames,
        };
        write_json_line(&mut writer, &header)?;
        Ok(Self {
            writer,
            particle_count: topology.len(),
            frames_written: 0,
        })
    }

    pub fn write_frame(&mut self, positions: ArrayView2<f64>, time: Option<f64>) -> RmsfResult<()> {
        if positions.dim() != (self.particle_count, 3) {
            return Err(RmsfError::ShapeMismatch {
                expected: (self.particle_count, 3),
                found: positions.dim(),
            });
        }
        let record = FrameRecord {
            time,
            positions: CoordsHelper::to_rows(positions),
        };
        write_json_line(&mut self.writer, &record)?;
        self.frames_written += 1;
        Ok(())
    }

    pub fn frames_written(&self) -> usize {
        self.frames_written
    }

    pub fn finish(mut self) -> RmsfResult<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }
}

fn write_json_line<W: Write, T: serde::Serialize>(writer: &mut W, value: &T) -> RmsfResult<()> {
    serde_json::to_writer(&mut *writer, value)
        .map_err(|err| RmsfError::Trajectory(format!("encoding failed: {}", err)))?;
    writer.write_all(b"\n")?;
    Ok(())
}
