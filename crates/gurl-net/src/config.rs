//! Transfer configuration.

use std::path::PathBuf;

/// Default `User-Agent` header value.
pub const DEFAULT_USER_AGENT: &str = concat!("gurl/", env!("CARGO_PKG_VERSION"));

/// Everything a single retrieval needs, built once and then only read.
#[derive(Clone, Debug)]
pub struct FetchConfig {
    /// Request target.
    pub url: Option<String>,
    /// Explicit method; wins over the default derived from `data`.
    pub method: Option<String>,
    /// `User-Agent` header value.
    pub user_agent: String,
    /// Inline request body.
    pub data: Option<String>,
    /// Write the body here instead of standard output.
    pub output: Option<PathBuf>,
    /// Dump the status line and headers before the body.
    pub show_headers: bool,
    /// Show a progress bar while writing to `output`.
    pub show_progress: bool,
    /// PKCS#12 bundle presented as the client certificate.
    pub credential_path: Option<PathBuf>,
    /// PEM bundle replacing the default trust roots.
    pub trust_root_path: Option<PathBuf>,
    /// Honour `HTTP_PROXY`/`HTTPS_PROXY` from the environment.
    pub use_env_proxy: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            url: None,
            method: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            data: None,
            output: None,
            show_headers: false,
            show_progress: false,
            credential_path: None,
            trust_root_path: None,
            use_env_proxy: true,
        }
    }
}

impl FetchConfig {
    /// Create a configuration for the given target.
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            ..Self::default()
        }
    }

    /// Override the request method.
    pub fn method(mut self, method: impl Into<String>) -> Self {
        self.method = Some(method.into());
        self
    }

    /// Set the user agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Send `data` as the request body.
    pub fn data(mut self, data: impl Into<String>) -> Self {
        self.data = Some(data.into());
        self
    }

    /// Write the body to a file.
    pub fn output(mut self, path: impl Into<PathBuf>) -> Self {
        self.output = Some(path.into());
        self
    }

    /// Dump response headers.
    pub fn show_headers(mut self, show: bool) -> Self {
        self.show_headers = show;
        self
    }

    /// Show transfer progress.
    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Present the client certificate from a PKCS#12 bundle.
    pub fn credential_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.credential_path = Some(path.into());
        self
    }

    /// Trust only the CA certificates in a PEM bundle.
    pub fn trust_root_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.trust_root_path = Some(path.into());
        self
    }

    /// Ignore proxy settings from the environment.
    pub fn no_proxy(mut self) -> Self {
        self.use_env_proxy = false;
        self
    }
}
