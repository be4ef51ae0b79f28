//! ratcycle CLI: snapshot settings and cycle profiles of a Logitech G mouse.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use ratcycle_core::{ErrorClass, MouseSession, SessionConfig, Settings};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(
    name = "ratcycle",
    version,
    about = "Cycle ratbagctl profile scripts for Logitech G mice"
)]
struct Cli {
    /// Directory holding one profile directory per mouse model.
    /// Defaults to <config dir>/ratcycle/models.
    #[arg(long, env = "RATCYCLE_MODELS_DIR", global = true)]
    models_dir: Option<PathBuf>,

    /// Device-configuration client to invoke.
    #[arg(long, env = "RATCYCLE_TOOL", default_value = "ratbagctl", global = true)]
    tool: String,

    /// Seconds to wait for each client invocation before giving up.
    #[arg(
        long,
        env = "RATCYCLE_TIMEOUT",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..),
        global = true
    )]
    timeout: u64,

    /// Increase log verbosity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Show the connected mouse's alias, model, and button count.
    Identify,
    /// Show current report rate, resolutions, button bindings, and LEDs.
    Show {
        /// Print as JSON.
        #[arg(long)]
        json: bool,
    },
    /// Apply the next profile script and remember it.
    Cycle,
    /// List profile scripts for the connected model.
    Profiles,
    /// Apply a specific profile script and remember it.
    Activate {
        /// Profile file name, with or without the .sh extension.
        name: String,
    },
}

fn init_logging(verbose: u8) {
    let default_directive = match verbose {
        0 => "warn",
        1 => "ratcycle=debug,ratcycle_core=debug",
        _ => "ratcycle=trace,ratcycle_core=trace",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn session_config(cli: &Cli) -> Result<SessionConfig> {
    let models_dir = match &cli.models_dir {
        Some(dir) => dir.clone(),
        None => dirs::config_dir()
            .context("cannot determine the user config directory; pass --models-dir")?
            .join("ratcycle")
            .join("models"),
    };
    Ok(SessionConfig {
        models_dir,
        program: cli.tool.clone(),
        timeout: Duration::from_secs(cli.timeout),
    })
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_settings(settings: &Settings) {
    println!("Report rate: {} Hz", settings.report_rate);
    println!("Resolutions:");
    for (i, dpi) in settings.resolutions.iter().enumerate() {
        println!("  {i}: {dpi} dpi");
    }
    println!("Buttons:");
    for (i, binding) in settings.buttons.iter().enumerate() {
        println!("  {i}: {binding}");
    }
    println!("LEDs:");
    for led in &settings.leds {
        let mut line = format!("  {}: {}", led.index, led.mode);
        if let Some(color) = &led.color {
            line.push_str(&format!(", color #{color}"));
        }
        if let Some(duration) = led.duration {
            line.push_str(&format!(", duration {duration} ms"));
        }
        if let Some(brightness) = led.brightness {
            line.push_str(&format!(", brightness {brightness}"));
        }
        println!("{line}");
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = session_config(&cli)?;
    let session = MouseSession::connect(&config).context("identifying the connected mouse")?;

    match cli.command {
        Commands::Identify => {
            let id = session.identity();
            println!("Alias:   {}", id.alias);
            println!("Model:   {}", id.model);
            println!("Buttons: {}", id.button_count);
            println!("Profiles: {}", session.store().dir().display());
        }
        Commands::Show { json } => {
            let settings = session.snapshot().context("reading current settings")?;
            if json {
                println!("{}", serde_json::to_string_pretty(&settings)?);
            } else {
                print_settings(&settings);
            }
        }
        Commands::Cycle => {
            let applied = session.cycle_profile().with_context(|| {
                format!(
                    "cycling profiles in {}",
                    session.store().dir().display()
                )
            })?;
            println!("Applied profile: {}", file_name(&applied));
        }
        Commands::Profiles => {
            let active = session.active_profile().context("reading active profile")?;
            if session.profiles().is_empty() {
                println!(
                    "No profile scripts in {}.",
                    session.store().dir().display()
                );
            }
            for profile in session.profiles() {
                let marker = if *profile == active { "*" } else { " " };
                println!("{marker} {}", file_name(profile));
            }
        }
        Commands::Activate { name } => {
            let applied = session
                .activate(&name)
                .with_context(|| format!("activating profile '{name}'"))?;
            println!("Applied profile: {}", file_name(&applied));
        }
    }

    Ok(())
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            let class = err
                .chain()
                .find_map(|cause| cause.downcast_ref::<ratcycle_core::Error>())
                .map(ErrorClass::classify);
            if class == Some(ErrorClass::Profile) {
                eprintln!("hint: run `ratcycle profiles` and `ratcycle activate <name>` to pick a profile");
            }
            ExitCode::from(class.map_or(1, |c| c.exit_code()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn explicit_models_dir_wins() {
        let cli = Cli::parse_from(["ratcycle", "--models-dir", "/tmp/models", "cycle"]);
        let config = session_config(&cli).unwrap();
        assert_eq!(config.models_dir, PathBuf::from("/tmp/models"));
        assert_eq!(config.program, "ratbagctl");
        assert_eq!(config.timeout, Duration::from_secs(10));
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["ratcycle", "show", "--json", "--timeout", "3", "-vv"]);
        assert!(matches!(cli.command, Commands::Show { json: true }));
        assert_eq!(cli.timeout, 3);
        assert_eq!(cli.verbose, 2);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let err = Cli::try_parse_from(["ratcycle", "--timeout", "0", "identify"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn file_name_strips_directory() {
        assert_eq!(file_name(std::path::Path::new("/m/g403/fps.sh")), "fps.sh");
    }
}
