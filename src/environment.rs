use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

use crate::consts::cli_consts::DEFAULT_API_URL;

/// Represents the player service the CLI talks to.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Environment {
    /// The player service running on this machine.
    #[default]
    Local,
    /// A player service reachable at an explicit origin.
    Custom { api_url: String },
}

impl Environment {
    /// Returns the service origin associated with the environment.
    pub fn api_url(&self) -> String {
        match self {
            Environment::Local => DEFAULT_API_URL.to_string(),
            Environment::Custom { api_url } => api_url.trim_end_matches('/').to_string(),
        }
    }
}

impl FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("local") {
            return Ok(Environment::Local);
        }
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            return Ok(Environment::Custom {
                api_url: trimmed.trim_end_matches('/').to_string(),
            });
        }
        Err(format!(
            "Invalid API origin '{}': expected 'local' or an http(s) URL",
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
