use thiserror::Error;

/// Coarse classification of why a lookup failed, as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ErrorCategory {
    #[error("No Internet Connection")]
    NoConnectivity,

    #[error("City Not Found")]
    CityNotFound,

    #[error("Something Went Wrong: {0}")]
    Generic(String),
}

/// Fixed dialog shown for an [`ErrorCategory`]. The single action clears the
/// query and dismisses the dialog; it never re-issues the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorDialog {
    pub title: &'static str,
    pub message: &'static str,
    pub action: &'static str,
}

pub const RETRY_ACTION: &str = "Retry";

impl ErrorCategory {
    pub fn dialog(&self) -> ErrorDialog {
        let (title, message) = match self {
            ErrorCategory::NoConnectivity => (
                "No Internet Connection",
                "This app requires an active internet connection to function. \
                 Please check your connection and restart the app.",
            ),
            ErrorCategory::CityNotFound => (
                "City Not Found",
                "We couldn't find the city. Please check the city name and try again.",
            ),
            ErrorCategory::Generic(_) => ("Try Again", "Something Went Wrong"),
        };

        ErrorDialog { title, message, action: RETRY_ACTION }
    }
}
