use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ml_reversal_learning::config::AppConfig;
use ml_reversal_learning::persistence::JsonFileSink;
use ml_reversal_learning::simulation::{LogProgress, Simulation};

/// Simulate Q-learning agents on a probabilistic reversal-learning task.
#[derive(Parser)]
#[command(name = "simulate", about = "Run the reversal-learning simulation")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Override the condition label
    #[arg(long)]
    condition: Option<String>,

    /// Override the base random seed
    #[arg(long)]
    seed: Option<u64>,

    /// Override the number of agents per model
    #[arg(long)]
    agents: Option<usize>,

    /// Override the number of trials per agent
    #[arg(long)]
    trials: Option<usize>,

    /// Run the agents of each model in parallel
    #[arg(long)]
    parallel: bool,

    /// Override the output directory
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    debug: bool,

    /// Print the default configuration as TOML and exit
    #[arg(long)]
    print_default_config: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.print_default_config {
        print!("{}", AppConfig::default_toml()?);
        return Ok(());
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(if cli.debug { "debug" } else { "info" })
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    // Load configuration
    let mut app_config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    // Apply CLI overrides
    let sim = &mut app_config.simulation;
    if let Some(condition) = cli.condition {
        sim.condition = condition;
    }
    if let Some(seed) = cli.seed {
        sim.seed = seed;
    }
    if let Some(agents) = cli.agents {
        sim.n_agents = agents;
    }
    if let Some(trials) = cli.trials {
        sim.t_max = trials;
    }
    if cli.parallel {
        sim.parallel = true;
    }
    if let Some(data_dir) = cli.data_dir {
        app_config.output.data_dir = data_dir;
    }
    app_config.validate().context("validating configuration")?;

    let simulation =
        Simulation::new(app_config.simulation.clone()).context("setting up simulation")?;
    let progress = LogProgress::new(
        app_config.simulation.condition.clone(),
        app_config.simulation.total_trials(),
        app_config.output.log_interval,
    );
    let mut sink = JsonFileSink::new(app_config.output.data_dir.clone());

    let results = simulation
        .run_and_persist(&progress, &mut sink)
        .context("running simulation")?;

    for (model, model_results) in &results.results {
        let summary = model_results.summary();
        info!(
            "{model}: correct {:.1}% | risky {:.1}% | mean reward {:.3}",
            summary.correct_rate * 100.0,
            summary.risky_rate * 100.0,
            summary.mean_reward
        );

        let rates = model_results.correct_rate_by_trial();
        for &t in simulation.setup().reversal_trials() {
            if let Some(before) = t.checked_sub(1).map(|prev| rates[prev]) {
                info!(
                    "{model}: reversal at trial {t}, correct {:.1}% -> {:.1}%",
                    before * 100.0,
                    rates[t] * 100.0
                );
            }
        }
    }
    info!(
        "Results written to {}",
        sink.path_for(&results.condition).display()
    );

    Ok(())
}
