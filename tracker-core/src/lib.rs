//! Core library for the weather tracker.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com client and the gateway that classifies its failures
//! - Persistence of the last saved city
//! - Presentation state, its reducer, and the controller that drives it
//!
//! It is used by `tracker-cli`, but any front end that can observe a
//! `tokio::sync::watch` channel can drive it.

pub mod client;
pub mod config;
pub mod connectivity;
pub mod controller;
pub mod error;
pub mod gateway;
pub mod model;
pub mod prefs;
pub mod state;

#[cfg(test)]
mod testing;

pub use client::{HttpResponse, WeatherApiClient, WeatherClient};
pub use config::Config;
pub use connectivity::{Connectivity, TcpProbe};
pub use controller::WeatherController;
pub use error::{ErrorCategory, ErrorDialog};
pub use gateway::WeatherGateway;
pub use model::{Condition, Current, Location, WeatherResponse};
pub use prefs::{FilePreferences, MemoryPreferences, PreferenceStore};
pub use state::{Action, Phase, PresentationState};
