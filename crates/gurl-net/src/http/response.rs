//! HTTP response head: status line, headers and the declared body length.

use std::collections::BTreeMap;
use std::io::Write;

use http::{HeaderMap, StatusCode, Version};

/// Status line and headers of a response, captured before the body is read.
#[derive(Clone, Debug)]
pub struct ResponseHead {
    /// Protocol version.
    pub version: Version,
    /// Status code.
    pub status: StatusCode,
    /// Response headers.
    pub headers: HeaderMap,
}

impl ResponseHead {
    /// Create a head from its parts.
    pub fn new(version: Version, status: StatusCode, headers: HeaderMap) -> Self {
        Self {
            version,
            status,
            headers,
        }
    }

    /// Capture the head of a blocking reqwest response.
    pub(crate) fn from_reqwest(response: &reqwest::blocking::Response) -> Self {
        Self::new(
            response.version(),
            response.status(),
            response.headers().clone(),
        )
    }

    /// The status line, e.g. `HTTP/1.1 200 OK`.
    pub fn status_line(&self) -> String {
        match self.status.canonical_reason() {
            Some(reason) => format!("{:?} {} {}", self.version, self.status.as_u16(), reason),
            None => format!("{:?} {}", self.version, self.status.as_u16()),
        }
    }

    /// Header lines as `Name: v1,v2`, one per distinct name, sorted by name.
    ///
    /// Names use canonical MIME casing; values that are not visible ASCII are
    /// rendered lossily.
    pub fn header_lines(&self) -> Vec<String> {
        let mut grouped: BTreeMap<String, Vec<String>> = BTreeMap::new();
        for (name, value) in &self.headers {
            grouped
                .entry(canonical_header_name(name.as_str()))
                .or_default()
                .push(String::from_utf8_lossy(value.as_bytes()).into_owned());
        }

        grouped
            .into_iter()
            .map(|(name, values)| format!("{}: {}", name, values.join(",")))
            .collect()
    }

    /// Write the status line, the header lines and one blank line.
    pub fn write_to<W: Write + ?Sized>(&self, out: &mut W) -> std::io::Result<()> {
        writeln!(out, "{}", self.status_line())?;
        for line in self.header_lines() {
            writeln!(out, "{line}")?;
        }
        writeln!(out)?;
        out.flush()
    }

    /// The body length declared by `Content-Length`, if usable.
    pub fn declared_length(&self) -> Option<u64> {
        declared_content_length(&self.headers)
    }
}

/// Parse `Content-Length`.
///
/// A missing, empty or malformed value yields `None`; the transfer then
/// proceeds without a known total.
pub fn declared_content_length(headers: &HeaderMap) -> Option<u64> {
    let value = headers.get(http::header::CONTENT_LENGTH)?;
    let text = match value.to_str() {
        Ok(text) => text.trim(),
        Err(_) => {
            tracing::debug!(target: "gurl_net::http", "Content-Length is not visible ASCII");
            return None;
        }
    };
    if text.is_empty() {
        return None;
    }
    match text.parse::<u64>() {
        Ok(len) => Some(len),
        Err(e) => {
            tracing::debug!(target: "gurl_net::http", "Ignoring malformed Content-Length {:?}: {}", text, e);
            None
        }
    }
}

/// Canonical MIME header casing: the first letter and every letter following
/// a hyphen are upper-cased, the rest lower-cased (`x-request-id` becomes
/// `X-Request-Id`).
pub fn canonical_header_name(name: &str) -> String {
    let mut upper = true;
    name.chars()
        .map(|c| {
            let mapped = if upper {
                c.to_ascii_uppercase()
            } else {
                c.to_ascii_lowercase()
            };
            upper = c == '-';
            mapped
        })
        .collect()
}
