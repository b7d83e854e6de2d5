//! Presentation state and the reducer that drives it.
//!
//! The state is an immutable value; every change goes through
//! [`PresentationState::reduce`]. Each started fetch bumps a generation
//! counter, and a completion carrying an older generation is dropped, so the
//! last *issued* lookup wins even if an earlier one resolves later.

use log::debug;

use crate::{error::ErrorCategory, model::WeatherResponse};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PresentationState {
    pub weather: Option<WeatherResponse>,
    pub loading: bool,
    pub error: Option<ErrorCategory>,
    generation: u64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Phase<'a> {
    Idle,
    Loading,
    Loaded(&'a WeatherResponse),
    Failed(&'a ErrorCategory),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    FetchStarted,
    FetchFinished { generation: u64, result: Result<WeatherResponse, ErrorCategory> },
}

impl PresentationState {
    /// Generation of the most recently started fetch.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn phase(&self) -> Phase<'_> {
        if self.loading {
            return Phase::Loading;
        }

        match (&self.error, &self.weather) {
            (Some(error), _) => Phase::Failed(error),
            (None, Some(weather)) => Phase::Loaded(weather),
            (None, None) => Phase::Idle,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn reduce(self, action: Action) -> Self {
        match action {
            Action::FetchStarted => Self {
                loading: true,
                error: None,
                generation: self.generation + 1,
                ..self
            },
            Action::FetchFinished { generation, .. } if generation != self.generation => {
                debug!("Dropping stale result for fetch #{generation} (latest #{})", self.generation);
                self
            }
            Action::FetchFinished { result: Ok(weather), .. } => Self {
                weather: Some(weather),
                loading: false,
                error: None,
                ..self
            },
            Action::FetchFinished { result: Err(error), .. } => Self {
                weather: None,
                loading: false,
                error: Some(error),
                ..self
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::sample_weather;

    fn finished(generation: u64, result: Result<WeatherResponse, ErrorCategory>) -> Action {
        Action::FetchFinished { generation, result }
    }

    #[test]
    fn default_is_idle() {
        let state = PresentationState::default();
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.generation(), 0);
    }

    #[test]
    fn start_sets_loading_and_clears_error() {
        let failed = PresentationState::default()
            .reduce(Action::FetchStarted)
            .reduce(finished(1, Err(ErrorCategory::CityNotFound)));
        assert_eq!(failed.phase(), Phase::Failed(&ErrorCategory::CityNotFound));

        let loading = failed.reduce(Action::FetchStarted);
        assert!(loading.loading);
        assert!(loading.error.is_none());
        assert_eq!(loading.phase(), Phase::Loading);
        assert_eq!(loading.generation(), 2);
    }

    #[test]
    fn success_populates_weather() {
        let weather = sample_weather("Paris");
        let state = PresentationState::default()
            .reduce(Action::FetchStarted)
            .reduce(finished(1, Ok(weather.clone())));

        assert!(!state.loading);
        assert_eq!(state.phase(), Phase::Loaded(&weather));
        assert!(state.error_message().is_none());
    }

    #[test]
    fn failure_clears_weather_and_sets_message() {
        let state = PresentationState::default()
            .reduce(Action::FetchStarted)
            .reduce(finished(1, Ok(sample_weather("Paris"))))
            .reduce(Action::FetchStarted)
            .reduce(finished(2, Err(ErrorCategory::NoConnectivity)));

        assert!(!state.loading);
        assert!(state.weather.is_none());
        assert_eq!(state.error_message().as_deref(), Some("No Internet Connection"));
    }

    #[test]
    fn previous_weather_kept_while_loading() {
        let state = PresentationState::default()
            .reduce(Action::FetchStarted)
            .reduce(finished(1, Ok(sample_weather("Paris"))))
            .reduce(Action::FetchStarted);

        assert_eq!(state.phase(), Phase::Loading);
        assert_eq!(state.weather, Some(sample_weather("Paris")));
    }

    #[test]
    fn stale_completion_is_ignored() {
        let state = PresentationState::default()
            .reduce(Action::FetchStarted)
            .reduce(Action::FetchStarted);

        let after_stale = state.clone().reduce(finished(1, Ok(sample_weather("Paris"))));
        assert_eq!(after_stale, state);
        assert!(after_stale.loading);

        let done = after_stale.reduce(finished(2, Ok(sample_weather("Oslo"))));
        assert_eq!(done.phase(), Phase::Loaded(&sample_weather("Oslo")));
    }
}
