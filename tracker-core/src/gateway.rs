use anyhow::anyhow;
use log::{debug, warn};
use std::{fmt, sync::Arc};

use crate::{
    Config,
    client::{HttpResponse, WeatherApiClient, WeatherClient},
    connectivity::{Connectivity, TcpProbe},
    error::ErrorCategory,
    model::WeatherResponse,
};

/// Boundary between the transport and the rest of the app: every outcome of a
/// lookup, including transport errors, leaves here as an [`ErrorCategory`].
#[derive(Clone)]
pub struct WeatherGateway {
    client: Arc<dyn WeatherClient>,
    connectivity: Arc<dyn Connectivity>,
    api_key: String,
}

impl WeatherGateway {
    pub fn new(
        client: Arc<dyn WeatherClient>,
        connectivity: Arc<dyn Connectivity>,
        api_key: String,
    ) -> Self {
        Self { client, connectivity, api_key }
    }

    /// Construct the production gateway: WeatherAPI.com client plus a TCP
    /// reachability probe against the same host.
    pub fn from_config(config: &Config) -> anyhow::Result<Self> {
        let api_key = config.resolve_api_key().ok_or_else(|| {
            anyhow!(
                "No WeatherAPI.com API key configured.\n\
                 Hint: run `weather-tracker configure` or set WEATHER_API_KEY."
            )
        })?;

        let client = WeatherApiClient::with_base_url(config.base_url.clone());
        let probe = TcpProbe::for_base_url(&config.base_url, config.connectivity_timeout())?;

        Ok(Self::new(Arc::new(client), Arc::new(probe), api_key))
    }

    pub async fn get_weather(&self, location: &str) -> Result<WeatherResponse, ErrorCategory> {
        if !self.connectivity.is_available().await {
            warn!("Network unavailable, skipping lookup for {location:?}");
            return Err(ErrorCategory::NoConnectivity);
        }

        debug!("Making API call for {location:?}");

        match self.client.fetch(&self.api_key, location).await {
            Ok(response) => classify(location, response),
            Err(err) => {
                warn!("Error fetching weather for {location:?}: {err:#}");
                Err(ErrorCategory::Generic(format!("{err:#}")))
            }
        }
    }
}

impl fmt::Debug for WeatherGateway {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeatherGateway")
            .field("client", &self.client)
            .field("connectivity", &self.connectivity)
            .field("api_key", &"<redacted>")
            .finish()
    }
}

fn classify(location: &str, response: HttpResponse) -> Result<WeatherResponse, ErrorCategory> {
    if response.is_success() {
        return match response.body {
            Some(body) => {
                debug!("Response: {body:?}");
                Ok(body)
            }
            None => {
                warn!("Empty response body for {location:?}");
                Err(ErrorCategory::CityNotFound)
            }
        };
    }

    warn!("Error fetching weather for {location:?}: {} {}", response.status, response.message);

    match response.status {
        400 => Err(ErrorCategory::CityNotFound),
        status if response.message.is_empty() => {
            Err(ErrorCategory::Generic(format!("HTTP {status}")))
        }
        _ => Err(ErrorCategory::Generic(response.message)),
    }
}
