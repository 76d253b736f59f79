use std::path::PathBuf;

use clap::ArgMatches;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

use surfer_core::{
    PanelRegistry, RunOutcome, RunRequest, RunTarget, ShutdownSignal, SurferConfig, SurferError,
};

/// Load configuration with warning on errors.
///
/// Falls back to defaults if config loading fails, but notifies the user via:
/// - stderr message for immediate visibility
/// - structured log event `cli.config.load_failed` for debugging
fn load_config_with_warning() -> SurferConfig {
    match SurferConfig::load_hierarchy() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Could not load config: {}. Using defaults.\n\
                 Tip: Check ~/.surfer/config.toml and ./.surfer/config.toml for syntax errors.",
                e
            );
            warn!(
                event = "cli.config.load_failed",
                error = %e,
                error_code = e.error_code(),
                "Config load failed, using defaults"
            );
            SurferConfig::default()
        }
    }
}

fn target_from_matches(matches: &ArgMatches) -> Option<RunTarget> {
    if let Some(dir) = matches.get_one::<PathBuf>("watch-directory") {
        return Some(RunTarget::Watch(dir.clone()));
    }
    matches
        .get_one::<PathBuf>("image")
        .map(|image| RunTarget::Once(image.clone()))
}

/// Build the run request: config first, then CLI overrides.
pub(crate) fn build_request(matches: &ArgMatches, config: &SurferConfig) -> Option<RunRequest> {
    let target = target_from_matches(matches)?;
    let mut request = RunRequest::from_config(config, target);
    if let Some(model) = matches.get_one::<String>("display") {
        request.model = model.clone();
    }
    Some(request)
}

pub fn run_command(matches: &ArgMatches) -> Result<(), Box<dyn std::error::Error>> {
    let config = load_config_with_warning();
    let Some(request) = build_request(matches, &config) else {
        // Unreachable with the required input group, kept for direct callers
        return Err("either an image or --watch-directory is required".into());
    };
    let factory = PanelRegistry::new(config.panel.output_dir());

    let runtime = tokio::runtime::Runtime::new()?;
    let token = CancellationToken::new();

    // Handlers must be in place before the panel is acquired, or an early
    // Ctrl-C would skip the clean-up
    let signal = {
        let _guard = runtime.enter();
        ShutdownSignal::install().map_err(|e| {
            eprintln!("Error: Could not install signal handlers: {}", e);
            error!(event = "cli.signal.install_failed", error = %e);
            e
        })?
    };

    let result = runtime.block_on(async {
        tokio::spawn(signal.wait(token.clone()));
        surfer_core::runner::run(&request, &factory, &token).await
    });

    match result {
        Ok(outcome) => {
            print_outcome(&request, &outcome);
            info!(event = "cli.run_completed", model = %request.model);
            Ok(())
        }
        Err(e) => {
            eprintln!("Error: {}", e);
            if e.is_user_error() {
                warn!(event = "cli.run_failed", error = %e, error_code = e.error_code());
            } else {
                error!(event = "cli.run_failed", error = %e, error_code = e.error_code());
            }
            Err(Box::new(e))
        }
    }
}

fn print_outcome(request: &RunRequest, outcome: &RunOutcome) {
    match (outcome, &request.target) {
        (RunOutcome::Displayed(mode), RunTarget::Once(image)) => {
            println!(
                "Displayed {} on {} ({} refresh)",
                image.display(),
                request.model,
                mode
            );
        }
        (RunOutcome::Watched(summary), RunTarget::Watch(dir)) => {
            println!(
                "Stopped watching {}: {} drawn, {} failed",
                dir.display(),
                summary.drawn,
                summary.failed
            );
        }
        (RunOutcome::Interrupted, _) => println!("Interrupted"),
        _ => {}
    }
}
