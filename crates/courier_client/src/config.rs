pub const API_URL_ENV_VAR: &str = "COURIER_API_URL";
pub const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";

#[derive(Debug, Clone, PartialEq)]
pub struct ClientConfig {
    /// Base URL serving `/customers`, `/storages` and `/optimize`
    pub api_url: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: String::from(DEFAULT_API_URL),
        }
    }
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(API_URL_ENV_VAR) {
            Some(api_url) if !api_url.trim().is_empty() => Self {
                api_url: api_url.trim().to_owned(),
            },
            _ => Self::default(),
        }
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}
