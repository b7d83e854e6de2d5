use serde::{Deserialize, Serialize};

/// Current conditions for one location, as returned by `current.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResponse {
    pub location: Location,
    pub current: Current,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    pub region: String,
    pub country: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
    /// Protocol-relative, e.g. `//cdn.weatherapi.com/weather/64x64/day/116.png`.
    pub icon: String,
}

impl Condition {
    /// Absolute URL for the condition icon.
    pub fn icon_url(&self) -> String {
        if self.icon.starts_with("//") {
            format!("https:{}", self.icon)
        } else {
            self.icon.clone()
        }
    }
}

/// Temperatures are Fahrenheit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Current {
    #[serde(rename = "temp_f")]
    pub temperature: f64,
    pub humidity: u8,
    pub condition: Condition,
    pub uv: f64,
    #[serde(rename = "feelslike_f")]
    pub feels_like: f64,
}
