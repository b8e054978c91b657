use crate::consts::dashboard_consts::DEFAULT_API_URL;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Where the dashboard API is served from.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Environment {
    /// Backend running on this machine.
    #[default]
    Local,
    /// Any other backend, identified by its base URL.
    Custom { api_url: String },
}

impl Environment {
    /// Returns the base URL of the dashboard API.
    pub fn api_url(&self) -> String {
        match self {
            Environment::Local => DEFAULT_API_URL.to_string(),
            Environment::Custom { api_url } => api_url.clone(),
        }
    }

    /// Picks `Local` for the default URL and `Custom` for anything else.
    pub fn from_api_url(api_url: &str) -> Self {
        let trimmed = api_url.trim().trim_end_matches('/');
        if trimmed.is_empty() || trimmed == DEFAULT_API_URL {
            Environment::Local
        } else {
            Environment::Custom {
                api_url: trimmed.to_string(),
            }
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        if lowered == "local" {
            return Ok(Environment::Local);
        }
        if lowered.starts_with("http://") || lowered.starts_with("https://") {
            return Ok(Environment::from_api_url(s));
        }
        Err(format!(
            "Invalid API URL: {}. It should start with http:// or https://",
            s
        ))
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Custom { .. } => write!(f, "Custom"),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.api_url())
    }
}
