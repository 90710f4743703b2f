//! VCU supervision core simulation runner.
//!
//! Loads the configuration, constructs the core, and drives it with a
//! scripted operator scenario at the configured tick rate (as fast as
//! possible, not wall-clock paced). Intended for commissioning checks
//! and for exercising the timing chain end to end.

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use vcu_common::input::InputId;
use vcu_common::mode::OperationMode;

use vcu_core::config::{LoadedConfig, load_config};
use vcu_core::cycle::{TickInputs, VcuCore};

#[derive(Parser, Debug)]
#[command(name = "vcu_core", about = "VCU input supervision and vigilance timing core")]
struct Args {
    /// Configuration file (TOML); defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of ticks to simulate (0 = run until interrupted).
    #[arg(short, long, default_value_t = 0)]
    ticks: u64,

    /// Acknowledge the vigilance timer every N seconds of simulated
    /// time; 0 leaves the button untouched so the penalty engages.
    #[arg(long, default_value_t = 30)]
    ack_period_s: u64,

    /// Log as JSON lines instead of compact text.
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

fn init_logging(args: &Args) {
    let default = match args.verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if args.json {
        builder.json().init();
    } else {
        builder.compact().init();
    }
}

fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args);

    let cfg = match &args.config {
        Some(path) => match load_config(path) {
            Ok(cfg) => cfg,
            Err(e) => {
                tracing::error!(error = %e, "configuration rejected");
                return ExitCode::FAILURE;
            }
        },
        None => LoadedConfig::default_config(),
    };
    tracing::info!(
        tick_ns = cfg.tick_ns,
        cycle_ticks = cfg.vigilance_cycle_ticks,
        "core configured"
    );

    let running = Arc::new(AtomicBool::new(true));
    {
        let running = running.clone();
        if let Err(e) = ctrlc::set_handler(move || running.store(false, Ordering::SeqCst)) {
            tracing::error!(error = %e, "failed to install signal handler");
            return ExitCode::FAILURE;
        }
    }

    let ticks_per_s = 1_000_000_000 / cfg.tick_ns;
    let ack_period_ticks = args.ack_period_s * ticks_per_s;
    let press_ticks = 2 * cfg.debounce_ticks[InputId::VigilancePushButton.index()] as u64;

    let mut core = VcuCore::new(cfg);
    let mut inputs = TickInputs::default();
    // Cab occupied, vehicle at standstill is not claimed: plain running.
    inputs.digital[InputId::CabActive.index()] = [true, true];

    let mut prev_mode = OperationMode::Suppressed;
    let mut prev_stage = None;
    let mut tick: u64 = 0;
    while running.load(Ordering::SeqCst) && (args.ticks == 0 || tick < args.ticks) {
        // Scripted acknowledgment: a clean press-release of the button.
        let vpb = if ack_period_ticks > 0 {
            let phase = tick % ack_period_ticks;
            phase >= ack_period_ticks.saturating_sub(2 * press_ticks)
                && phase < ack_period_ticks.saturating_sub(press_ticks)
        } else {
            false
        };
        inputs.digital[InputId::VigilancePushButton.index()] = [vpb, vpb];

        let out = core.tick(&inputs);
        if out.mode != prev_mode {
            tracing::info!(tick, mode = ?out.mode, "mode changed");
            prev_mode = out.mode;
        }
        if out.stage != prev_stage {
            tracing::info!(tick, stage = ?out.stage, penalty = out.penalty_brake, "stage changed");
            prev_stage = out.stage;
        }
        tick += 1;
    }

    let stats = core.stats();
    tracing::info!(
        ticks = stats.ticks,
        accepted_resets = stats.accepted_resets,
        penalty_entries = stats.penalty_entries,
        "simulation finished"
    );
    ExitCode::SUCCESS
}
