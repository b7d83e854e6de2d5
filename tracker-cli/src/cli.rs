use anyhow::Context;
use clap::{Parser, Subcommand};
use inquire::{Confirm, InquireError, Password, PasswordDisplayMode, Select, Text};
use log::{debug, info};
use std::sync::Arc;
use tracker_core::{
    Config, ErrorCategory, FilePreferences, Phase, PreferenceStore, PresentationState,
    WeatherController, WeatherGateway,
};

use crate::render;

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "weather-tracker", version, about = "Current weather for a city")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the WeatherAPI.com API key.
    Configure,

    /// Show weather for a city, or for the saved city when none is given.
    Show {
        /// City name or any query WeatherAPI.com accepts.
        city: Option<String>,

        /// Remember this city for the next launch.
        #[arg(long, requires = "city")]
        save: bool,
    },

    /// Interactively search cities and optionally save one.
    Search,

    /// Print the saved city, if any.
    Saved,
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Show { city, save } => show(city, save).await,
            Command::Search => search().await,
            Command::Saved => {
                let prefs = FilePreferences::open_default()?;
                debug!("Reading preferences from {}", prefs.path().display());
                match prefs.load() {
                    Some(city) => println!("{city}"),
                    None => println!("{}", render::no_city_selected()),
                }
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut cfg = Config::load()?;

    let api_key = Password::new("WeatherAPI.com API key:")
        .with_display_mode(PasswordDisplayMode::Masked)
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    cfg.set_api_key(api_key.trim().to_string());
    let path = cfg.save()?;
    info!("Wrote API key to {}", path.display());

    println!("Configuration saved to {}", path.display());
    Ok(())
}

/// Builds the controller. With `load_saved` it starts loading the saved city
/// right away.
fn controller(load_saved: bool) -> anyhow::Result<WeatherController> {
    let cfg = Config::load()?;
    let gateway = Arc::new(WeatherGateway::from_config(&cfg)?);
    let prefs = Arc::new(FilePreferences::open_default()?);
    debug!("Using preferences at {}", prefs.path().display());

    if load_saved {
        Ok(WeatherController::new(gateway, prefs))
    } else {
        Ok(WeatherController::idle(gateway, prefs))
    }
}

async fn show(city: Option<String>, save: bool) -> anyhow::Result<()> {
    let controller = controller(city.is_none())?;

    match city {
        Some(city) if save => controller.save_and_fetch(&city).await?,
        Some(city) => controller.fetch(&city).await?,
        None => match controller.saved_city() {
            // Already loading.
            Some(saved) => info!("Showing saved city {saved:?}"),
            None => {
                println!("{}", render::no_city_selected());
                return Ok(());
            }
        },
    }

    print_state(&controller.settled().await);
    Ok(())
}

fn print_state(state: &PresentationState) {
    match state.phase() {
        Phase::Loaded(weather) => println!("{}", render::full_details(weather)),
        Phase::Failed(error) => eprintln!("{}", render::error_dialog(&error.dialog())),
        Phase::Idle => println!("{}", render::no_city_selected()),
        Phase::Loading => {}
    }
}

async fn search() -> anyhow::Result<()> {
    let controller = controller(true)?;

    if let Some(saved) = controller.saved_city() {
        info!("Showing saved city {saved:?}");
        print_state(&controller.settled().await);
        println!();
    }

    loop {
        let query = match Text::new("Search city:").with_help_message("Esc to quit").prompt() {
            Ok(query) => query,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => break,
            Err(err) => return Err(err).context("Failed to read city"),
        };

        let query = query.trim();
        if query.is_empty() {
            continue;
        }

        controller.fetch(query).await?;

        match controller.state().phase() {
            Phase::Loaded(weather) => {
                println!("{}", render::search_card(weather));

                if Confirm::new("Save this city?").with_default(false).prompt()? {
                    info!("Saving city {query:?}");
                    controller.save_and_fetch(query).await?;
                    println!();
                    print_state(&controller.state());
                }
            }
            Phase::Failed(error) => retry_dialog(error)?,
            Phase::Idle | Phase::Loading => {}
        }
    }

    Ok(())
}

/// Shows the dialog for `error`; its only action returns to an empty prompt.
fn retry_dialog(error: &ErrorCategory) -> anyhow::Result<()> {
    let dialog = error.dialog();
    eprintln!("{}", render::error_dialog(&dialog));

    match Select::new("", vec![dialog.action]).prompt() {
        Ok(_) | Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => Ok(()),
        Err(err) => Err(err).context("Failed to read dialog action"),
    }
}
