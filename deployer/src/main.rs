//! asdeploy - Entry Point
//!
//! Builds a project and deploys it to a configured application server.
//!
//! ```text
//! asdeploy --settings=asdeploy.json --target=<name> --project=<path>
//!          [--debug] [--auto] [--metadata-changed] [--sources=A.java,B.java]
//! ```

use std::collections::HashMap;
use std::env;
use std::path::{Path, PathBuf};

use asdeploy::app::options::DeployCommand;
use asdeploy::app::run::run;
use asdeploy::deploy::fsm::DeploymentState;
use asdeploy::logs::{init_logging, LogOptions};
use asdeploy::models::deployment::DeployFlags;
use asdeploy::storage::settings::Settings;
use asdeploy::utils::version_info;

use colored::Colorize;
use tracing::{error, info};

const DEFAULT_SETTINGS_FILE: &str = "asdeploy.json";

#[tokio::main(flavor = "current_thread")]
async fn main() {
    // Parse command line arguments
    let args: Vec<String> = env::args().collect();
    let mut cli_args: HashMap<String, String> = HashMap::new();

    for arg in args.iter().skip(1) {
        if let Some((key, value)) = arg.split_once('=') {
            // Handle --key=value format
            let clean_key = key.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), value.to_string());
        } else if arg.starts_with("--") {
            // Handle standalone flags like --version
            let clean_key = arg.trim_start_matches('-');
            cli_args.insert(clean_key.to_string(), "true".to_string());
        }
    }

    // Print version and exit
    if cli_args.contains_key("version") {
        match serde_json::to_string_pretty(&version_info()) {
            Ok(version) => println!("{}", version),
            Err(e) => eprintln!("Failed to render version: {}", e),
        }
        return;
    }

    let settings_path = cli_args
        .get("settings")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SETTINGS_FILE));
    let settings = match Settings::load(Path::new(&settings_path)).await {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Unable to read settings file {}: {}", settings_path.display(), e);
            std::process::exit(2);
        }
    };

    // Initialize logging
    let log_options = LogOptions {
        log_level: settings.log_level.clone(),
        json_format: settings.json_logs,
        log_dir: settings.log_dir.clone(),
        ..Default::default()
    };
    let _log_guard = match init_logging(log_options) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e}");
            None
        }
    };

    let command = match parse_command(&cli_args) {
        Ok(command) => command,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(2);
        }
    };

    info!("Running asdeploy with {:?}", command);
    match run(settings, command).await {
        Ok(attempt) => {
            let state = format!("{:?}", attempt.state).to_lowercase();
            let state = match attempt.state {
                DeploymentState::Deployed => state.green(),
                DeploymentState::Ignored => state.yellow(),
                _ => state.red(),
            };
            println!(
                "{} {} -> {} [{}]",
                "deployment".bold(),
                attempt.application_name.as_deref().unwrap_or("-"),
                attempt.target,
                state
            );
            if let Some(message) = &attempt.error_message {
                println!("  {}", message);
            }
            if attempt.state != DeploymentState::Deployed {
                std::process::exit(1);
            }
        }
        Err(e) => {
            error!("Failed to run the deployment: {e}");
            std::process::exit(1);
        }
    }
}

fn parse_command(cli_args: &HashMap<String, String>) -> Result<DeployCommand, String> {
    let target = cli_args
        .get("target")
        .cloned()
        .ok_or("Missing --target=<name>")?;
    let project = cli_args
        .get("project")
        .map(PathBuf::from)
        .ok_or("Missing --project=<path>")?;

    let flag = |name: &str| cli_args.get(name).map(|v| v == "true").unwrap_or(false);
    let sources_changed = cli_args
        .get("sources")
        .map(|s| {
            s.split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    Ok(DeployCommand {
        target,
        project,
        debug: flag("debug"),
        flags: DeployFlags {
            auto_deploy: flag("auto"),
            metadata_changed: flag("metadata-changed"),
            sources_changed,
        },
    })
}
