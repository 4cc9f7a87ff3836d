use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents the different deployment environments available for the CLI.
#[derive(Clone, Default, PartialEq, Eq)]
pub enum Environment {
    /// Local development instance of the quality system.
    Local,
    /// The plant-floor server on the factory network.
    #[default]
    Plant,
    /// Any other deployment, addressed by an explicit base URL.
    Custom(String),
}

impl Environment {
    /// Returns the quality-system base URL associated with the environment.
    pub fn base_url(&self) -> String {
        match self {
            Environment::Local => "http://localhost:5000".to_string(),
            Environment::Plant => "http://qcs.plant.local:5000".to_string(),
            Environment::Custom(url) => url.trim_end_matches('/').to_string(),
        }
    }

    /// Builds an environment from the optional override the config file or
    /// command line may carry.
    pub fn from_override(url: Option<String>) -> Self {
        match url {
            Some(url) if !url.trim().is_empty() => Environment::Custom(url),
            _ => Environment::default(),
        }
    }
}

impl FromStr for Environment {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "local" => Ok(Environment::Local),
            "plant" => Ok(Environment::Plant),
            s if s.starts_with("http://") || s.starts_with("https://") => {
                Ok(Environment::Custom(s.to_string()))
            }
            _ => Err(()),
        }
    }
}

impl Display for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Local => write!(f, "Local"),
            Environment::Plant => write!(f, "Plant"),
            Environment::Custom(url) => write!(f, "Custom({})", url),
        }
    }
}

impl Debug for Environment {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "Environment::{}, URL: {}", self, self.base_url())
    }
}
