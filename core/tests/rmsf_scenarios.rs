use ndarray::{array, Array2};
use rmsfcore::math::CoordsHelper;
use rmsfcore::prelude::{AnalysisConfig, AnalysisStage};
use rmsfcore::trajectory::{
    FrameSource, FrameWindow, InMemoryTrajectory, JsonlTrajectoryReader, JsonlTrajectoryWriter,
    SelectedSource, Selection, Topology, WindowedSource,
};
use rmsfcore::{FrameAccumulator, RmsfAnalysis, RmsfError, RmsfProfile};
use std::io::Cursor;

const TOLERANCE: f64 = 1e-5;

fn accumulate(frames: &[Array2<f64>]) -> RmsfProfile {
    let mut acc = FrameAccumulator::new(frames[0].nrows()).unwrap();
    for (k, frame) in frames.iter().enumerate() {
        acc.update(frame.view(), k).unwrap();
    }
    acc.finalize().unwrap()
}

/// Two-pass reference: mean first, then squared distances from it.
fn two_pass_rmsf(frames: &[Array2<f64>]) -> Vec<f64> {
    let n_frames = frames.len() as f64;
    let mut mean = Array2::<f64>::zeros(frames[0].dim());
    for frame in frames {
        mean += frame;
    }
    mean /= n_frames;

    (0..mean.nrows())
        .map(|particle| {
            let sum: f64 = frames
                .iter()
                .map(|frame| {
                    (0..3)
                        .map(|axis| (frame[[particle, axis]] - mean[[particle, axis]]).powi(2))
                        .sum::<f64>()
                })
                .sum();
            (sum / n_frames).sqrt()
        })
        .collect()
}

/// Deterministic small displacements, a few tenths of a unit in size.
fn jitter(particle: usize, frame: usize, axis: usize) -> f64 {
    let seed = (particle * 31 + frame * 7 + axis * 3) as f64;
    0.3 * (seed * 0.7).sin() + 0.1 * (seed * 1.3).cos()
}

fn jittered_frames(particles: usize, frames: usize, offset: f64) -> Vec<Array2<f64>> {
    (0..frames)
        .map(|f| {
            Array2::from_shape_fn((particles, 3), |(p, axis)| {
                offset + p as f64 + jitter(p, f, axis)
            })
        })
        .collect()
}

fn run_stage<S: FrameSource>(source: &mut S) -> RmsfProfile {
    let mut stage = RmsfAnalysis::new();
    stage
        .prepare(&AnalysisConfig {
            particle_count: source.particle_count(),
            total_frames: source.n_frames(),
            verbose: false,
        })
        .unwrap();
    while let Some(frame) = source.next_frame().unwrap() {
        stage.process_frame(frame.input()).unwrap();
    }
    stage.conclude().unwrap()
}

#[test]
fn three_particles_three_frames() {
    let frames = vec![
        array![[0.0, 0.0, 0.0], [1.0, 1.0, 1.0], [5.0, 0.0, 0.0]],
        array![[2.0, 0.0, 0.0], [1.0, 1.0, 1.0], [5.0, 1.0, 0.0]],
        array![[4.0, 0.0, 0.0], [1.0, 1.0, 1.0], [5.0, 2.0, 0.0]],
    ];

    let mut acc = FrameAccumulator::new(3).unwrap();
    for (k, frame) in frames.iter().enumerate() {
        acc.update(frame.view(), k).unwrap();
    }
    assert_eq!(acc.mean().row(0).to_vec(), vec![2.0, 0.0, 0.0]);
    assert_eq!(acc.frames_seen(), 3);

    let profile = acc.finalize().unwrap();
    assert_eq!(profile.n_frames(), 3);
    assert!((profile.rmsf()[0] - (8.0f64 / 3.0).sqrt()).abs() < TOLERANCE);
    assert!((profile.rmsf()[0] - 1.63299).abs() < TOLERANCE);
    assert!(profile.rmsf()[1].abs() < TOLERANCE);
    assert!((profile.rmsf()[2] - (2.0f64 / 3.0).sqrt()).abs() < TOLERANCE);
}

#[test]
fn identical_frames_have_zero_fluctuation() {
    let frame = CoordsHelper::from_rows(&[[12.5, -3.0, 7.25], [0.1, 0.2, 0.3], [1e3, 2e3, 3e3]]);
    let frames = vec![frame; 25];
    let profile = accumulate(&frames);
    assert!(profile.rmsf().iter().all(|&v| v.abs() < TOLERANCE));
}

#[test]
fn single_frame_has_zero_fluctuation() {
    let profile = accumulate(&jittered_frames(4, 1, 10.0));
    assert_eq!(profile.n_frames(), 1);
    assert!(profile.rmsf().iter().all(|&v| v.abs() < TOLERANCE));
}

#[test]
fn matches_two_pass_reference() {
    let frames = jittered_frames(6, 40, 0.0);
    let profile = accumulate(&frames);
    for (online, reference) in profile.rmsf().iter().zip(two_pass_rmsf(&frames)) {
        assert!((online - reference).abs() < 1e-10);
    }
}

#[test]
fn large_offset_does_not_degrade_result() {
    let plain = accumulate(&jittered_frames(5, 200, 0.0));
    let shifted = accumulate(&jittered_frames(5, 200, 1e6));
    assert!(plain.rmsf().iter().all(|&v| v > 0.01));
    for (a, b) in plain.rmsf().iter().zip(shifted.rmsf().iter()) {
        assert!((a - b).abs() < TOLERANCE, "plain {} shifted {}", a, b);
    }
}

#[test]
fn reversed_order_gives_same_result() {
    let frames = jittered_frames(3, 30, 5.0);
    let mut reversed = frames.clone();
    reversed.reverse();
    let forward = accumulate(&frames);
    let backward = accumulate(&reversed);
    for (a, b) in forward.rmsf().iter().zip(backward.rmsf().iter()) {
        assert!((a - b).abs() < 1e-10);
    }
}

#[test]
fn skipped_frame_index_is_rejected() {
    let frame = CoordsHelper::from_rows(&[[0.0; 3]]);
    let mut acc = FrameAccumulator::new(1).unwrap();
    acc.update(frame.view(), 0).unwrap();
    assert!(matches!(
        acc.update(frame.view(), 2),
        Err(RmsfError::FrameIndexOrderViolation {
            expected: 1,
            found: 2
        })
    ));
}

#[test]
fn short_snapshot_is_rejected() {
    let mut acc = FrameAccumulator::new(4).unwrap();
    let frame = Array2::<f64>::zeros((3, 3));
    assert!(matches!(
        acc.update(frame.view(), 0),
        Err(RmsfError::ShapeMismatch { .. })
    ));
}

#[test]
fn finalize_before_any_frame_yields_zeros() {
    let profile = FrameAccumulator::new(2).unwrap().finalize().unwrap();
    assert_eq!(profile.n_frames(), 0);
    assert_eq!(profile.to_vec(), vec![0.0, 0.0]);
}

#[test]
fn non_finite_coordinates_fault_at_finalization() {
    let mut acc = FrameAccumulator::new(2).unwrap();
    let frame = CoordsHelper::from_rows(&[[1.0, 2.0, 3.0], [f64::INFINITY, 0.0, 0.0]]);
    acc.update(frame.view(), 0).unwrap();
    acc.update(frame.view(), 1).unwrap();
    assert!(matches!(
        acc.finalize(),
        Err(RmsfError::NumericalFault { particle: 1, .. })
    ));
}

#[test]
fn single_frame_window_over_selection() {
    let topology = Topology::new(
        (0..4)
            .map(|i| if i % 2 == 0 { "CA".into() } else { "CB".into() })
            .collect(),
    );
    let trajectory = InMemoryTrajectory::from_positions(topology, jittered_frames(4, 10, 0.0));
    let selected = SelectedSource::new(trajectory, &"name CA".parse::<Selection>().unwrap())
        .unwrap();
    let mut source =
        WindowedSource::new(selected, FrameWindow::new(5, Some(6), 1).unwrap()).unwrap();

    let profile = run_stage(&mut source);
    assert_eq!(profile.len(), 2);
    assert_eq!(profile.n_frames(), 1);
    assert!(profile.rmsf().iter().all(|&v| v.abs() < TOLERANCE));
}

#[test]
fn jsonl_trajectory_drives_analysis() {
    let frames = jittered_frames(3, 12, 2.0);
    let topology = Topology::new(vec!["N".into(), "CA".into(), "C".into()]);
    let mut writer =
        JsonlTrajectoryWriter::new(Vec::new(), &topology, Some(frames.len())).unwrap();
    for (i, frame) in frames.iter().enumerate() {
        writer.write_frame(frame.view(), Some(i as f64)).unwrap();
    }
    let bytes = writer.finish().unwrap();

    let mut reader = JsonlTrajectoryReader::new(Cursor::new(bytes)).unwrap();
    let profile = run_stage(&mut reader);
    assert_eq!(profile.n_frames(), 12);
    for (online, reference) in profile.rmsf().iter().zip(two_pass_rmsf(&frames)) {
        assert!((online - reference).abs() < 1e-10);
    }
}
