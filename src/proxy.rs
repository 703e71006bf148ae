// src/proxy.rs

//! Proxy settings forwarded to the supervised executable.

/// Proxy endpoint and bypass list. Empty strings mean "not set".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProxySettings {
    pub url: String,
    pub no_proxy: String,
}

impl ProxySettings {
    /// Parse `key=value` entries. `http_proxy` sets the url, `no_proxy` the
    /// bypass list; anything else is ignored. Later entries win.
    pub fn parse<S: AsRef<str>>(values: &[S]) -> Self {
        let mut settings = Self::default();
        for entry in values {
            let Some((key, value)) = entry.as_ref().split_once('=') else {
                continue;
            };
            match key.trim() {
                "http_proxy" => settings.url = value.trim().to_string(),
                "no_proxy" => settings.no_proxy = value.trim().to_string(),
                _ => {}
            }
        }
        settings
    }

    pub fn from_env() -> Self {
        let var = |upper: &str, lower: &str| {
            std::env::var(upper)
                .or_else(|_| std::env::var(lower))
                .unwrap_or_default()
        };
        Self {
            url: var("HTTP_PROXY", "http_proxy"),
            no_proxy: var("NO_PROXY", "no_proxy"),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.url.is_empty() && self.no_proxy.is_empty()
    }

    /// Arguments appended to the launch command line.
    ///
    /// A bypass list without an endpoint is dropped.
    pub fn launch_arguments(&self) -> Vec<String> {
        match (self.url.is_empty(), self.no_proxy.is_empty()) {
            (false, false) => vec![self.url.clone(), self.no_proxy.clone()],
            (false, true) => vec![self.url.clone()],
            _ => Vec::new(),
        }
    }
}
