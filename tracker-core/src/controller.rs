use log::info;
use std::sync::Arc;
use tokio::{sync::watch, task::JoinHandle};

use crate::{
    gateway::WeatherGateway,
    prefs::PreferenceStore,
    state::{Action, PresentationState},
};

/// Owns the [`PresentationState`] and publishes every transition through a
/// watch channel.
///
/// Fetches are spawned on the current tokio runtime and are never cancelled
/// or deduplicated; overlapping lookups race, and only the most recently
/// issued one may update the state.
#[derive(Debug, Clone)]
pub struct WeatherController {
    gateway: Arc<WeatherGateway>,
    prefs: Arc<dyn PreferenceStore>,
    state: Arc<watch::Sender<PresentationState>>,
}

impl WeatherController {
    /// Creates the controller and, if a city was saved earlier, immediately
    /// starts loading it. Must be called from within a tokio runtime.
    pub fn new(gateway: Arc<WeatherGateway>, prefs: Arc<dyn PreferenceStore>) -> Self {
        let controller = Self::idle(gateway, prefs);

        if let Some(city) = controller.saved_city() {
            info!("Loading saved city {city:?}");
            controller.fetch(&city);
        }

        controller
    }

    /// Creates the controller without loading the saved city, for callers
    /// that are about to fetch a city of their own.
    pub fn idle(gateway: Arc<WeatherGateway>, prefs: Arc<dyn PreferenceStore>) -> Self {
        let (state, _) = watch::channel(PresentationState::default());
        Self { gateway, prefs, state: Arc::new(state) }
    }

    pub fn fetch(&self, city: &str) -> JoinHandle<()> {
        let generation = dispatch(&self.state, Action::FetchStarted);

        let gateway = self.gateway.clone();
        let state = self.state.clone();
        let city = city.to_owned();

        tokio::spawn(async move {
            let result = gateway.get_weather(&city).await;
            dispatch(&state, Action::FetchFinished { generation, result });
        })
    }

    pub fn save_and_fetch(&self, city: &str) -> JoinHandle<()> {
        self.prefs.save(city);
        self.fetch(city)
    }

    pub fn saved_city(&self) -> Option<String> {
        self.prefs.load()
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> PresentationState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PresentationState> {
        self.state.subscribe()
    }

    /// Waits until no fetch is in flight and returns the resulting state.
    pub async fn settled(&self) -> PresentationState {
        let mut rx = self.subscribe();
        match rx.wait_for(|state| !state.loading).await {
            Ok(state) => state.clone(),
            // The sender lives in `self`, so the channel cannot be closed here.
            Err(_) => self.state(),
        }
    }
}

/// Applies `action` and returns the generation of the resulting state.
fn dispatch(state: &watch::Sender<PresentationState>, action: Action) -> u64 {
    let mut generation = 0;
    state.send_modify(|current| {
        *current = std::mem::take(current).reduce(action);
        generation = current.generation();
    });
    generation
}
