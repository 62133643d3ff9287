//! Route pattern compilation and matching.
//!
//! # Responsibilities
//! - Compile a page module URL into a route pattern
//! - Match request path segments, extracting parameters
//! - Rank candidate patterns deterministically
//!
//! # Design Decisions
//! - Path matching is case-sensitive
//! - Static segments beat `[param]` segments, which beat `[...rest]`
//! - No regex; matching is a single pass over the segments

use std::cmp::Ordering;
use std::collections::HashMap;

use crate::routing::module::PAGES_PREFIX;

/// One segment of a compiled route pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    Static(String),
    Dynamic(String),
    CatchAll(String),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        match raw.strip_prefix('[').and_then(|s| s.strip_suffix(']')) {
            Some(inner) => match inner.strip_prefix("...") {
                Some(name) => Segment::CatchAll(name.to_string()),
                None => Segment::Dynamic(inner.to_string()),
            },
            None => Segment::Static(raw.to_string()),
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Segment::Static(_) => 3,
            Segment::Dynamic(_) => 2,
            Segment::CatchAll(_) => 1,
        }
    }
}

/// A compiled route pattern for one page module.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoutePattern {
    page_path: String,
    segments: Vec<Segment>,
    /// Module path without extension, used for layout detection.
    stem: String,
}

impl RoutePattern {
    /// Compile a page module URL (`/pages/blog/[slug].tsx`).
    ///
    /// Returns `None` for URLs outside the pages namespace.
    pub fn compile(module_url: &str) -> Option<Self> {
        let rel = module_url.strip_prefix(PAGES_PREFIX)?;
        let stem_rel = match rel.rfind('.') {
            Some(dot) if !rel[dot..].contains('/') => &rel[..dot],
            _ => rel,
        };
        let mut raw: Vec<&str> = stem_rel.split('/').filter(|s| !s.is_empty()).collect();
        if raw.last() == Some(&"index") {
            raw.pop();
        }
        let segments: Vec<Segment> = raw.iter().map(|s| Segment::parse(s)).collect();
        let page_path = format!("/{}", raw.join("/"));

        Some(Self {
            page_path,
            segments,
            stem: format!("{}{}", PAGES_PREFIX, stem_rel),
        })
    }

    /// The route's page path, e.g. `/blog/[slug]`.
    pub fn page_path(&self) -> &str {
        &self.page_path
    }

    /// Match path segments, returning the extracted parameters.
    pub fn matches(&self, path: &[&str]) -> Option<HashMap<String, String>> {
        let mut params = HashMap::new();
        for (i, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Static(expected) => {
                    if path.get(i) != Some(&expected.as_str()) {
                        return None;
                    }
                }
                Segment::Dynamic(name) => {
                    let value = path.get(i)?;
                    params.insert(name.clone(), value.to_string());
                }
                Segment::CatchAll(name) => {
                    if path.len() <= i {
                        return None;
                    }
                    params.insert(name.clone(), path[i..].join("/"));
                    return Some(params);
                }
            }
        }
        if path.len() == self.segments.len() {
            Some(params)
        } else {
            None
        }
    }

    /// True when this module wraps `other` as a layout
    /// (`/pages/blog.js` wraps `/pages/blog/[slug].js`).
    pub fn is_layout_of(&self, other: &RoutePattern) -> bool {
        other.stem.len() > self.stem.len()
            && other.stem.starts_with(&self.stem)
            && other.stem.as_bytes()[self.stem.len()] == b'/'
    }

    /// Nesting depth of the module file.
    pub fn depth(&self) -> usize {
        self.stem.matches('/').count()
    }

    /// Compare specificity; `Greater` means `self` should win.
    pub fn specificity(&self, other: &RoutePattern) -> Ordering {
        let a = self.segments.iter().map(Segment::rank);
        let b = other.segments.iter().map(Segment::rank);
        a.cmp(b).then_with(|| self.depth().cmp(&other.depth()))
    }
}

/// Split a pathname into non-empty segments.
pub fn split_path(pathname: &str) -> Vec<&str> {
    pathname.split('/').filter(|s| !s.is_empty()).collect()
}
