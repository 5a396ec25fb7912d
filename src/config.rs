use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://pokeapi.co/api/v2";
/// Default number of entries requested by the card grid.
pub const DEFAULT_LIMIT: usize = 50;
pub const DEFAULT_DISMISS_AFTER: Duration = Duration::from_secs(4);

/// How the terminal alert platform answers permission queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlertMode {
    /// Undecided until the user answers the first prompt.
    #[default]
    Prompt,
    Granted,
    Denied,
    /// No alert capability at all.
    Off,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub limit: usize,
    pub alerts: AlertMode,
    pub dismiss_after: Duration,
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            limit: DEFAULT_LIMIT,
            alerts: AlertMode::default(),
            dismiss_after: DEFAULT_DISMISS_AFTER,
            user_agent: concat!("dex_catalog/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

impl Config {
    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        self.base_url.trim_end_matches('/')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = Config::default();
        assert_eq!(c.base_url(), "https://pokeapi.co/api/v2");
        assert_eq!(c.limit, 50);
        assert_eq!(c.dismiss_after, Duration::from_secs(4));
        assert_eq!(c.alerts, AlertMode::Prompt);
        assert!(c.user_agent.starts_with("dex_catalog/"));
    }

    #[test]
    fn base_url_trims_trailing_slash() {
        let c = Config {
            base_url: "http://localhost:8080/api/".into(),
            ..Config::default()
        };
        assert_eq!(c.base_url(), "http://localhost:8080/api");
    }
}
