use std::path::PathBuf;

use clap::{ArgAction, Parser};
use gurl_net::{DEFAULT_USER_AGENT, FetchConfig};

/// Fetch a URL over HTTP(S), optionally presenting a PKCS#12 client
/// certificate and trusting a private CA.
#[derive(Clone, Debug, Parser)]
#[command(name = "gurl", version = env!("CARGO_PKG_VERSION"), about, long_about = None)]
pub struct Cli {
    /// URL to fetch
    pub url: Option<String>,

    /// Print the status line and response headers before the body
    #[arg(short = 'i', long = "header")]
    pub show_headers: bool,

    /// Show a progress bar (only when writing to a file)
    #[arg(short = 's', long = "status")]
    pub show_progress: bool,

    /// User-Agent header to send
    #[arg(short = 'A', long = "user-agent", value_name = "UA", default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// PKCS#12 bundle to present as the client certificate
    #[arg(long = "p12", value_name = "PATH")]
    pub p12: Option<PathBuf>,

    /// PEM file of CA certificates to trust instead of the built-in roots
    #[arg(long = "caroot", value_name = "PATH")]
    pub caroot: Option<PathBuf>,

    /// Write the body to this file instead of standard output
    #[arg(short = 'o', long = "output", value_name = "PATH")]
    pub output: Option<PathBuf>,

    /// Send this string as the request body (implies POST)
    #[arg(short = 'd', long = "data", value_name = "DATA")]
    pub data: Option<String>,

    /// Request method to use
    #[arg(short = 'X', long = "request", value_name = "METHOD")]
    pub method: Option<String>,

    /// Ignore HTTP_PROXY/HTTPS_PROXY from the environment
    #[arg(long = "no-proxy")]
    pub no_proxy: bool,

    /// Log more; repeat for debug output
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// Turn the parsed flags into a transfer configuration.
    pub fn fetch_config(&self) -> FetchConfig {
        FetchConfig {
            url: self.url.clone(),
            method: self.method.clone(),
            user_agent: self.user_agent.clone(),
            data: self.data.clone(),
            output: self.output.clone(),
            show_headers: self.show_headers,
            show_progress: self.show_progress,
            credential_path: self.p12.clone(),
            trust_root_path: self.caroot.clone(),
            use_env_proxy: !self.no_proxy,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("gurl").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_defaults() {
        let config = parse(&["https://example.com/"]).fetch_config();
        assert_eq!(config.url.as_deref(), Some("https://example.com/"));
        assert_eq!(config.user_agent, DEFAULT_USER_AGENT);
        assert!(config.method.is_none());
        assert!(config.output.is_none());
        assert!(!config.show_headers);
        assert!(!config.show_progress);
        assert!(config.use_env_proxy);
    }

    #[test]
    fn test_url_is_optional_at_parse_time() {
        let cli = parse(&["-i"]);
        assert!(cli.url.is_none());
        assert!(cli.fetch_config().url.is_none());
    }

    #[test]
    fn test_all_flags() {
        let cli = parse(&[
            "-i",
            "-s",
            "-A",
            "probe/1",
            "--p12",
            "client.p12",
            "--caroot",
            "ca.pem",
            "-o",
            "out.bin",
            "-d",
            "a=1",
            "-X",
            "PUT",
            "--no-proxy",
            "-vv",
            "https://example.com/upload",
        ]);
        assert_eq!(cli.verbose, 2);

        let config = cli.fetch_config();
        assert!(config.show_headers);
        assert!(config.show_progress);
        assert_eq!(config.user_agent, "probe/1");
        assert_eq!(config.credential_path, Some(PathBuf::from("client.p12")));
        assert_eq!(config.trust_root_path, Some(PathBuf::from("ca.pem")));
        assert_eq!(config.output, Some(PathBuf::from("out.bin")));
        assert_eq!(config.data.as_deref(), Some("a=1"));
        assert_eq!(config.method.as_deref(), Some("PUT"));
        assert!(!config.use_env_proxy);
    }

    #[test]
    fn test_unknown_flag_is_rejected() {
        assert!(Cli::try_parse_from(["gurl", "--frobnicate", "https://example.com/"]).is_err());
    }
}
