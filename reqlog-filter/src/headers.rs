//! Header allow-listing and masking for the access line.
//!
//! A header reaches the log only when its name is on the allow-list.
//! Allow-listed headers that are also in the mask set are recorded as
//! [`MASK`]. Name comparison is case-insensitive and the logged name uses
//! the allow-list spelling.

use http::{HeaderMap, HeaderValue};
use reqlog_core::LoggerConfig;
use std::fmt;

/// Replacement string used for masked header values.
pub const MASK: &str = "****";

/// Allow-listed request headers in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoggedHeaders {
    entries: Vec<(String, String)>,
}

impl LoggedHeaders {
    /// Filter and mask `headers` according to `config`.
    ///
    /// ```
    /// use http::HeaderMap;
    /// use reqlog_core::LoggerConfig;
    /// use reqlog_filter::headers::LoggedHeaders;
    ///
    /// let mut headers = HeaderMap::new();
    /// headers.insert("authorization", "Bearer xyz".parse().unwrap());
    /// headers.insert("cookie", "session=1".parse().unwrap());
    ///
    /// let config = LoggerConfig {
    ///     headers: vec!["Authorization".into()],
    ///     mask_headers: vec!["Authorization".into()],
    ///     ..Default::default()
    /// };
    /// let logged = LoggedHeaders::collect(&headers, &config);
    /// assert_eq!(logged.to_string(), "{Authorization=****}");
    /// ```
    pub fn collect(headers: &HeaderMap, config: &LoggerConfig) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();
        if config.headers.is_empty() {
            return Self { entries };
        }
        for name in headers.keys() {
            let Some(label) = config.allowed_header(name.as_str()) else {
                continue;
            };
            if entries.iter().any(|(k, _)| k == label) {
                continue;
            }
            let value = if config.is_masked(name.as_str()) {
                MASK.to_string()
            } else {
                headers.get(name).map(header_text).unwrap_or_default()
            };
            entries.push((label.to_string(), value));
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Renders as `{Name=value, Other=value}`.
impl fmt::Display for LoggedHeaders {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (name, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{name}={value}")?;
        }
        f.write_str("}")
    }
}

fn header_text(value: &HeaderValue) -> String {
    String::from_utf8_lossy(value.as_bytes()).into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(&'static str, &'static str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (k, v) in pairs {
            map.append(*k, HeaderValue::from_static(v));
        }
        map
    }

    fn config(allow: &[&str], mask: &[&str]) -> LoggerConfig {
        LoggerConfig {
            headers: allow.iter().map(|s| s.to_string()).collect(),
            mask_headers: mask.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    #[test]
    fn masked_header_never_shows_value() {
        let map = headers(&[("authorization", "Bearer xyz")]);
        let logged = LoggedHeaders::collect(&map, &config(&["Authorization"], &["Authorization"]));
        assert_eq!(logged.get("Authorization"), Some(MASK));
        assert!(!logged.to_string().contains("xyz"));
    }

    #[test]
    fn headers_off_the_allow_list_are_dropped() {
        let map = headers(&[("cookie", "session=1"), ("user-agent", "curl/8")]);
        let logged = LoggedHeaders::collect(&map, &config(&["User-Agent"], &["Cookie"]));
        assert_eq!(logged.len(), 1);
        assert!(logged.get("cookie").is_none());
        assert_eq!(logged.to_string(), "{User-Agent=curl/8}");
    }

    #[test]
    fn empty_allow_list_logs_nothing() {
        let map = headers(&[("authorization", "Bearer xyz")]);
        let logged = LoggedHeaders::collect(&map, &LoggerConfig::default());
        assert!(logged.is_empty());
        assert_eq!(logged.to_string(), "{}");
    }

    #[test]
    fn entries_follow_request_order() {
        let map = headers(&[("x-request-id", "r-1"), ("accept", "*/*")]);
        let logged = LoggedHeaders::collect(&map, &config(&["Accept", "X-Request-Id"], &[]));
        assert_eq!(logged.to_string(), "{X-Request-Id=r-1, Accept=*/*}");
    }

    #[test]
    fn repeated_header_logs_first_value() {
        let map = headers(&[("accept", "text/html"), ("accept", "application/json")]);
        let logged = LoggedHeaders::collect(&map, &config(&["Accept"], &[]));
        assert_eq!(logged.get("accept"), Some("text/html"));
    }

    #[test]
    fn non_utf8_value_is_rendered_lossily() {
        let mut map = HeaderMap::new();
        map.insert("x-raw", HeaderValue::from_bytes(&[b'a', 0xfe]).unwrap());
        let logged = LoggedHeaders::collect(&map, &config(&["X-Raw"], &[]));
        assert_eq!(logged.get("x-raw"), Some("a\u{fffd}"));
    }
}
