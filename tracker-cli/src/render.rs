use tracker_core::{ErrorDialog, WeatherResponse};

/// Whole degrees, truncated toward zero.
fn whole(value: f64) -> i64 {
    value.trunc() as i64
}

/// Full-screen view for the saved city.
pub fn full_details(weather: &WeatherResponse) -> String {
    let location = &weather.location;
    let current = &weather.current;

    format!(
        "{name}\n\
         {region}, {country}\n\
         \n\
         {temp}°  {condition}\n\
         \n\
         Humidity    {humidity}%\n\
         UV          {uv}\n\
         Feels Like  {feels}°\n\
         \n\
         {icon}",
        name = location.name,
        region = location.region,
        country = location.country,
        temp = whole(current.temperature),
        condition = current.condition.text,
        humidity = current.humidity,
        uv = whole(current.uv),
        feels = whole(current.feels_like),
        icon = current.condition.icon_url(),
    )
}

/// Compact card shown for a search result before it is saved.
pub fn search_card(weather: &WeatherResponse) -> String {
    format!(
        "{}  {}°  {}",
        weather.location.name,
        whole(weather.current.temperature),
        weather.current.condition.text,
    )
}

pub fn error_dialog(dialog: &ErrorDialog) -> String {
    format!("{}\n{}", dialog.title, dialog.message)
}

pub fn no_city_selected() -> &'static str {
    "No City Selected\nPlease Search For A City"
}
