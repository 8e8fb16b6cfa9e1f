use anyhow::Context;
use clap::{Parser, Subcommand};
use generator::profile::{write_trajectory, GeneratorConfig};
use std::path::PathBuf;
use workflow::config::WorkflowConfig;
use workflow::runner::Runner;

mod generator;
mod report;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Per-particle RMSF over aligned trajectories")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Compute the RMSF of selected particles across a trajectory
    Run(RunArgs),
    /// Write a synthetic JSON Lines trajectory
    Generate(GenerateArgs),
}

#[derive(clap::Args)]
struct RunArgs {
    /// Load a workflow config from YAML instead of flags
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// JSON Lines trajectory to analyse
    #[arg(long, required_unless_present = "workflow")]
    trajectory: Option<PathBuf>,
    /// Particle selection: `all`, `name CA ...` or `index 0 3:9 ...`
    #[arg(long, default_value = "all")]
    selection: String,
    #[arg(long, default_value_t = 0)]
    start: usize,
    #[arg(long)]
    stop: Option<usize>,
    #[arg(long, default_value_t = 1)]
    step: usize,
    /// Log progress for every frame
    #[arg(long, default_value_t = false)]
    verbose: bool,
    /// Write the per-particle RMSF report as JSON
    #[arg(long)]
    output: Option<PathBuf>,
}

#[derive(clap::Args)]
struct GenerateArgs {
    #[arg(long)]
    output: PathBuf,
    #[arg(long, default_value_t = 64)]
    particles: usize,
    #[arg(long, default_value_t = 100)]
    frames: usize,
    #[arg(long, default_value_t = 0.5)]
    amplitude: f64,
    #[arg(long, default_value_t = 0.0)]
    offset: f64,
    #[arg(long, default_value_t = 0)]
    seed: u64,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run(args),
        Command::Generate(args) => generate(args),
    }
}

fn run(args: RunArgs) -> anyhow::Result<()> {
    let mut config = match (args.workflow, args.trajectory) {
        (Some(path), _) => WorkflowConfig::load(path)?,
        (None, Some(trajectory)) => WorkflowConfig::from_args(
            trajectory,
            &args.selection,
            args.start,
            args.stop,
            args.step,
        ),
        (None, None) => anyhow::bail!("either --workflow or --trajectory is required"),
    };
    config.verbose |= args.verbose;
    if args.output.is_some() {
        config.output = args.output;
    }

    let runner = Runner::new(config.clone());
    let result = runner
        .execute()
        .with_context(|| format!("running RMSF on {}", config.trajectory.display()))?;

    for ((index, name), rmsf) in result
        .indices
        .iter()
        .zip(&result.names)
        .zip(result.profile.rmsf().iter())
    {
        println!("{:>6} {:<6} {:.5}", index, name, rmsf);
    }
    println!(
        "RMSF over {} frames for {} particles (skipped {} frames)",
        result.profile.n_frames(),
        result.profile.len(),
        result.metrics.frames_skipped
    );

    if let Some(output) = config.output.as_ref() {
        result.to_report(&config.selection).write_json(output)?;
        println!("report written to {}", output.display());
    }

    Ok(())
}

fn generate(args: GenerateArgs) -> anyhow::Result<()> {
    let config = GeneratorConfig {
        particles: args.particles,
        frames: args.frames,
        amplitude: args.amplitude,
        offset: args.offset,
        seed: args.seed,
    };
    let frames = write_trajectory(&config, &args.output)?;
    println!(
        "wrote {} frames of {} particles to {}",
        frames,
        config.particles.max(1),
        args.output.display()
    );
    Ok(())
}
