//! kickstart - main entry point

use anyhow::{Context, Result};
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::process::ExitCode;
use std::sync::Mutex;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use kickstart::branding::{header_lines, status_row_below};
use kickstart::cli::{Cli, Commands};
use kickstart::{Config, DisplayController, Lifecycle, Plan, ProcessGuard, process_guard, run_plan};

/// Initialize logging.
///
/// stdout belongs to the display, so logs go to `log_file` when given and
/// otherwise to stderr at `warn`. `RUST_LOG` overrides the level.
fn init_logging(log_file: Option<&Path>) -> Result<()> {
    let default_level = if log_file.is_some() { "info" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match log_file {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("Failed to create log file {:?}", path))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

/// Merge the config file (if any) with command-line overrides
fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from_file(path)?,
        None => Config::default(),
    };

    if cli.dry {
        config.dry_run = true;
    }
    if let Some(distro) = cli.distro {
        config.distro = distro;
    }
    if let Some(accent) = cli.accent {
        config.accent = Some(accent);
    }
    if let Some(rows) = cli.min_scroll_rows {
        config.min_scroll_rows = rows;
    }

    config.validate()?;
    Ok(config)
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    if let Err(e) = init_logging(cli.log_file.as_deref()) {
        eprintln!("✗ {:#}", e);
        return ExitCode::FAILURE;
    }
    info!("kickstart starting up");

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!();
            eprintln!("✗ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = load_config(cli)?;

    let plan = match &cli.command {
        Commands::Run { plan } => {
            let plan = Plan::load_from_file(plan)?;
            plan.validate()?;
            plan
        }
        Commands::Demo => {
            config.dry_run = true;
            Plan::preview()
        }
    };
    debug!("Loaded plan with {} step(s)", plan.steps.len());

    // terminates any step command still running when we leave
    let _guard = ProcessGuard::new();

    let mut display = DisplayController::stdout(config.display_config());
    let header = header_lines(config.distro, config.dry_run);
    display.set_header_content(header.clone(), status_row_below(&header))?;
    display.initialize()?;

    let mut out = display.writer();
    match display.lifecycle()? {
        Lifecycle::Active | Lifecycle::Redrawing => {}
        Lifecycle::Uninitialized => {
            // too small for the fixed layout; show the header once and scroll
            for line in &header {
                writeln!(out, "{line}")?;
            }
            writeln!(out)?;
        }
        Lifecycle::Disabled => {
            writeln!(out, "{}", config.distro.welcome())?;
            if config.dry_run {
                writeln!(out, "DRY RUN MODE - No actual changes will be made to your system")?;
            }
            writeln!(out)?;
        }
    }

    if let Err(e) = process_guard::init_signal_handlers(display.cleanup_hook()) {
        warn!("Failed to initialize signal handlers: {}", e);
    }

    let result = run_plan(&display, &plan, config.dry_run);
    display.cleanup()?;
    result.context("Installation cannot continue")?;

    info!("All steps completed");
    Ok(())
}
