// src/manager/url.rs
// =============================================================================
// Input validation: which lines are allowed into the work queue.
//
// A line is accepted when it parses as an absolute URL with a scheme and a
// non-empty host written as "scheme://host...". Everything else
// ("not a url", "example.com", "mailto:me@x", "file:///tmp") is rejected
// before it reaches a worker.
//
// The exact input text is kept and used for output, because url::Url
// normalises ("http://a" becomes "http://a/").
// =============================================================================

use std::fmt;
use url::Url;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedUrl {
    raw: String,
    url: Url,
}

impl ParsedUrl {
    /// Returns `None` if `line` is not an absolute URL with a host
    pub fn parse(line: &str) -> Option<Self> {
        let url = Url::parse(line).ok()?;

        let has_host = url.host_str().is_some_and(|host| !host.is_empty());
        if url.scheme().is_empty() || !has_host || !has_authority(line, url.scheme()) {
            return None;
        }

        Some(Self {
            raw: line.to_string(),
            url,
        })
    }

    /// The line exactly as it was read
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

impl fmt::Display for ParsedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

// The url crate repairs "http:host" and " http://host" into valid URLs;
// we only accept input that already spells out "scheme://"
fn has_authority(line: &str, scheme: &str) -> bool {
    match line.get(..scheme.len()) {
        Some(prefix) => {
            prefix.eq_ignore_ascii_case(scheme) && line[scheme.len()..].starts_with("://")
        }
        None => false,
    }
}
