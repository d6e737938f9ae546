//! Command-line driver for the simulation kernel
//!
//! Loads a scenario XML file, runs the engine for a fixed number of
//! ticks, and writes the per-tick and (optionally) bouncer trace files.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use snsim_core::bouncer::Bouncer;
use snsim_core::policy::Policy;
use snsim_core::scenario::loader::load_scenario;
use snsim_core::trace::{write_bouncer_trace, write_trace};
use snsim_core::{Engine, ScenarioConfig};

#[derive(Parser, Debug)]
#[command(name = "snsim", version, about = "Discrete-time service-network simulator")]
struct Cli {
    /// Path to the scenario XML file.
    #[arg(long, value_name = "FILE")]
    scenario: PathBuf,

    /// Scheduling policy for the Prioritise phase.
    #[arg(long, value_enum, default_value_t = PolicyArg::Fcfs)]
    policy: PolicyArg,

    /// Admission controller for the Admit phase.
    #[arg(long, value_enum, default_value_t = BouncerArg::None)]
    bouncer: BouncerArg,

    /// Number of ticks to run.
    #[arg(long, default_value_t = 1000)]
    max_ticks: usize,

    /// Where to write the per-tick trace file.
    #[arg(long, value_name = "FILE", default_value = "trace.txt")]
    trace_out: PathBuf,

    /// Where to write the bouncer trace file (only written when
    /// `--bouncer` is not `none`).
    #[arg(long, value_name = "FILE", default_value = "bouncer_trace.txt")]
    bouncer_trace_out: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum PolicyArg {
    Fcfs,
    Ratio,
    Revenue,
    Penalty,
    ClassifiedPenalty,
    FailedAttempts,
}

impl From<PolicyArg> for Policy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::Fcfs => Policy::Fcfs,
            PolicyArg::Ratio => Policy::RatioBased,
            PolicyArg::Revenue => Policy::RevenueBased,
            PolicyArg::Penalty => Policy::PenaltyBased,
            PolicyArg::ClassifiedPenalty => Policy::ClassifiedPenaltyBased,
            PolicyArg::FailedAttempts => Policy::FailedAttemptsBased,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "kebab-case")]
enum BouncerArg {
    None,
    Null,
    Tendency,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let xml = fs::read_to_string(&cli.scenario)
        .with_context(|| format!("reading scenario file {}", cli.scenario.display()))?;
    let scenario = load_scenario(&xml)?;

    let policy: Policy = cli.policy.into();
    let bouncer = match cli.bouncer {
        BouncerArg::None => None,
        BouncerArg::Null => Some(Bouncer::null()),
        BouncerArg::Tendency => Some(Bouncer::tendency()),
    };

    let config = ScenarioConfig::new(policy, bouncer, cli.max_ticks);
    let mut engine = Engine::from_config(scenario, config)?;
    engine.start(cli.max_ticks);

    let mut trace_file = fs::File::create(&cli.trace_out)
        .with_context(|| format!("creating trace file {}", cli.trace_out.display()))?;
    write_trace(&mut trace_file, engine.trace())
        .with_context(|| format!("writing trace file {}", cli.trace_out.display()))?;

    if cli.bouncer != BouncerArg::None {
        let mut bouncer_file = fs::File::create(&cli.bouncer_trace_out)
            .with_context(|| format!("creating bouncer trace file {}", cli.bouncer_trace_out.display()))?;
        write_bouncer_trace(&mut bouncer_file, engine.bouncer_trace())
            .with_context(|| format!("writing bouncer trace file {}", cli.bouncer_trace_out.display()))?;
    }

    Ok(())
}
