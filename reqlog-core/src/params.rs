use std::fmt;

/// Ordered query/form parameter multimap.
///
/// Keys keep the order in which they were first seen; repeated keys append
/// to the existing value list instead of creating a second entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    entries: Vec<(String, Vec<String>)>,
}

impl QueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse an `application/x-www-form-urlencoded` query string (no leading `?`).
    pub fn parse(query: &str) -> Self {
        let mut params = Self::new();
        params.extend_encoded(query.as_bytes());
        params
    }

    /// Parameters carried in the query component of `uri`.
    pub fn from_uri(uri: &http::Uri) -> Self {
        uri.query().map(Self::parse).unwrap_or_default()
    }

    /// Decode url-encoded pairs from `input` and append them.
    pub fn extend_encoded(&mut self, input: &[u8]) {
        for (key, value) in url::form_urlencoded::parse(input) {
            self.append(key.into_owned(), value.into_owned());
        }
    }

    pub fn append(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => self.entries.push((key, vec![value])),
        }
    }

    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_slice())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Renders as `key=[v1, v2] other=[v]`.
impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (key, values)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}=[{}]", key, values.join(", "))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_groups_repeated_keys_in_first_seen_order() {
        let params = QueryParams::parse("b=1&a=x&b=2");
        let keys: Vec<&str> = params.iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(params.get("b").unwrap(), ["1", "2"]);
        assert_eq!(params.to_string(), "b=[1, 2] a=[x]");
    }

    #[test]
    fn parse_decodes_percent_and_plus() {
        let params = QueryParams::parse("q=hello+world&path=%2Fapi%2Fv1");
        assert_eq!(params.get("q").unwrap(), ["hello world"]);
        assert_eq!(params.get("path").unwrap(), ["/api/v1"]);
    }

    #[test]
    fn flag_without_value_renders_empty_list() {
        let params = QueryParams::parse("debug");
        assert_eq!(params.to_string(), "debug=[]");
    }

    #[test]
    fn from_uri_without_query_is_empty() {
        let uri: http::Uri = "/api/users/42".parse().unwrap();
        let params = QueryParams::from_uri(&uri);
        assert!(params.is_empty());
        assert_eq!(params.to_string(), "");
    }

    #[test]
    fn from_uri_reads_query() {
        let uri: http::Uri = "/api/users/42?verbose=true".parse().unwrap();
        let params = QueryParams::from_uri(&uri);
        assert_eq!(params.len(), 1);
        assert_eq!(params.to_string(), "verbose=[true]");
    }

    #[test]
    fn extend_appends_to_existing_keys() {
        let mut params = QueryParams::parse("tag=a");
        params.extend_encoded(b"tag=b&name=Billy");
        assert_eq!(params.to_string(), "tag=[a, b] name=[Billy]");
    }
}
