//! Locations and resolved router URLs.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use url::form_urlencoded;

/// A browser location split into its parts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Location {
    /// Path component, always starting with `/`.
    pub pathname: String,
    /// Query string without the leading `?`.
    pub search: String,
    /// Fragment without the leading `#`.
    pub hash: String,
}

impl Location {
    pub fn new(pathname: impl Into<String>) -> Self {
        Self {
            pathname: pathname.into(),
            ..Default::default()
        }
    }

    /// Split an href such as `/blog/post-1?tab=2#comments`.
    ///
    /// Absolute URLs keep only their path, query and fragment.
    pub fn parse(href: &str) -> Self {
        let href = match href.find("://") {
            Some(i) => {
                let rest = &href[i + 3..];
                rest.find('/').map(|j| &rest[j..]).unwrap_or("/")
            }
            None => href,
        };
        let (rest, hash) = match href.split_once('#') {
            Some((r, h)) => (r, h.to_string()),
            None => (href, String::new()),
        };
        let (pathname, search) = match rest.split_once('?') {
            Some((p, s)) => (p, s.to_string()),
            None => (rest, String::new()),
        };
        let pathname = if pathname.starts_with('/') {
            pathname.to_string()
        } else {
            format!("/{}", pathname)
        };
        Self {
            pathname,
            search,
            hash,
        }
    }

    /// Render back to an href.
    pub fn href(&self) -> String {
        let mut out = self.pathname.clone();
        if !self.search.is_empty() {
            out.push('?');
            out.push_str(&self.search);
        }
        if !self.hash.is_empty() {
            out.push('#');
            out.push_str(&self.hash);
        }
        out
    }
}

/// The logical route currently active.
///
/// An empty `page_path` means no route matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RouterUrl {
    pub page_path: String,
    pub pathname: String,
    pub params: HashMap<String, String>,
    pub query: HashMap<String, Vec<String>>,
}

impl RouterUrl {
    /// A no-match URL for the given pathname.
    pub fn not_found(pathname: impl Into<String>, query: HashMap<String, Vec<String>>) -> Self {
        Self {
            page_path: String::new(),
            pathname: pathname.into(),
            params: HashMap::new(),
            query,
        }
    }

    pub fn is_match(&self) -> bool {
        !self.page_path.is_empty()
    }

    /// Cache key for page data: pathname plus the query in sorted order.
    pub fn data_key(&self) -> String {
        if self.query.is_empty() {
            return self.pathname.clone();
        }
        let sorted: BTreeMap<_, _> = self.query.iter().collect();
        let mut ser = form_urlencoded::Serializer::new(String::new());
        for (k, values) in sorted {
            for v in values {
                ser.append_pair(k, v);
            }
        }
        format!("{}?{}", self.pathname, ser.finish())
    }
}

/// Parse a query string into a multi-map, preserving value order.
pub fn parse_query(search: &str) -> HashMap<String, Vec<String>> {
    let mut query: HashMap<String, Vec<String>> = HashMap::new();
    let search = search.strip_prefix('?').unwrap_or(search);
    for (k, v) in form_urlencoded::parse(search.as_bytes()) {
        query.entry(k.into_owned()).or_default().push(v.into_owned());
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_href() {
        let loc = Location::parse("/blog/post-1?tab=2&tab=3#comments");
        assert_eq!(loc.pathname, "/blog/post-1");
        assert_eq!(loc.search, "tab=2&tab=3");
        assert_eq!(loc.hash, "comments");
        assert_eq!(loc.href(), "/blog/post-1?tab=2&tab=3#comments");

        let abs = Location::parse("https://example.com/about?x=1");
        assert_eq!(abs.pathname, "/about");
        assert_eq!(abs.search, "x=1");

        assert_eq!(Location::parse("https://example.com").pathname, "/");
        assert_eq!(Location::parse("docs").pathname, "/docs");
    }

    #[test]
    fn test_parse_query_multi_values() {
        let q = parse_query("?a=1&b=x%20y&a=2");
        assert_eq!(q["a"], vec!["1", "2"]);
        assert_eq!(q["b"], vec!["x y"]);
        assert!(parse_query("").is_empty());
    }

    #[test]
    fn test_data_key_is_order_independent() {
        let a = RouterUrl {
            page_path: "/blog".into(),
            pathname: "/blog".into(),
            params: HashMap::new(),
            query: parse_query("b=2&a=1"),
        };
        let b = RouterUrl {
            query: parse_query("a=1&b=2"),
            ..a.clone()
        };
        assert_eq!(a.data_key(), b.data_key());
        assert_eq!(a.data_key(), "/blog?a=1&b=2");

        let bare = RouterUrl {
            query: HashMap::new(),
            ..a
        };
        assert_eq!(bare.data_key(), "/blog");
    }
}
