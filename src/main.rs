use clap::Parser;
use prosync::config::Cli;
use prosync::ui::ProgressReporter;
use prosync::{Config, SyncEvent};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.quiet {
        "error"
    } else {
        match cli.verbose {
            0 => "warn",
            1 => "debug",
            _ => "trace",
        }
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    // Convert CLI args to Config - this validates immediately
    let config = Config::try_from(cli)?;

    let reporter = Mutex::new(ProgressReporter::new(config.quiet));
    if let Ok(progress) = reporter.lock() {
        progress.println(format!("prosync v{}", prosync::VERSION));
        progress.println(prosync::commands::sync::format_config_summary(&config));
    }

    let on_event = |event: &SyncEvent| {
        if let Ok(mut progress) = reporter.lock() {
            progress.handle(event);
        }
    };
    let reports = prosync::run(&config, Some(&on_event))?;

    if let Ok(progress) = reporter.lock() {
        progress.finish(&reports);
    }

    Ok(())
}
