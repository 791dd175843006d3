//! Outbound request composition.

use bytes::Bytes;
use http::{HeaderValue, Method};
use url::Url;

use crate::config::FetchConfig;
use crate::error::{NetworkError, Result};

/// A fully resolved request, ready to be sent.
#[derive(Clone, Debug)]
pub struct RequestDescriptor {
    /// The HTTP method.
    pub method: Method,
    /// The request URL.
    pub url: Url,
    /// `User-Agent` header value.
    pub user_agent: HeaderValue,
    /// Request body, present only when inline data was supplied.
    pub body: Option<Bytes>,
}

impl RequestDescriptor {
    /// Resolve the request described by `config`.
    ///
    /// The method is `GET`, or `POST` when inline data is present; an
    /// explicit method always wins.
    pub fn compose(config: &FetchConfig) -> Result<Self> {
        let raw_url = config.url.as_deref().ok_or(NetworkError::MissingUrl)?;
        let url = Url::parse(raw_url)?;
        match url.scheme() {
            "http" | "https" => {}
            other => {
                return Err(NetworkError::InvalidUrl(format!(
                    "unsupported scheme '{other}'"
                )));
            }
        }

        let method = match config.method.as_deref() {
            Some(method) => Method::from_bytes(method.as_bytes())?,
            None if config.data.is_some() => Method::POST,
            None => Method::GET,
        };

        let user_agent = HeaderValue::from_str(&config.user_agent)?;
        let body = config.data.as_ref().map(|data| Bytes::from(data.clone()));

        Ok(Self {
            method,
            url,
            user_agent,
            body,
        })
    }
}
