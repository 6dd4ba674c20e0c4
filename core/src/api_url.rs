//! URL builder bound to the API host.
//!
//! Path templates may contain `:name` placeholders that `param` fills in
//! (percent-encoded as a single path segment). `Display` renders the final
//! URL, which is what the request builder consumes.

use std::fmt;
use std::sync::Arc;

use url::Url;

use crate::http::UrlLike;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiUrl {
    base: Url,
    segments: Vec<String>,
    params: Vec<(String, String)>,
    query: Vec<(String, String)>,
}

impl ApiUrl {
    pub fn new(base: Url) -> Self {
        Self {
            base,
            segments: Vec::new(),
            params: Vec::new(),
            query: Vec::new(),
        }
    }

    pub fn parse(base: &str) -> Result<Self, url::ParseError> {
        Url::parse(base).map(Self::new)
    }

    /// Append a path template such as `/users/:id/posts`.
    pub fn path(mut self, template: &str) -> Self {
        self.segments
            .extend(template.split('/').filter(|s| !s.is_empty()).map(str::to_string));
        self
    }

    pub fn param(mut self, name: &str, value: impl ToString) -> Self {
        self.params.push((name.to_string(), value.to_string()));
        self
    }

    pub fn query(mut self, name: &str, value: impl ToString) -> Self {
        self.query.push((name.to_string(), value.to_string()));
        self
    }

    pub fn to_url(&self) -> Url {
        let mut url = self.base.clone();
        if !self.segments.is_empty() {
            if let Ok(mut path) = url.path_segments_mut() {
                path.pop_if_empty();
                for segment in &self.segments {
                    path.push(self.fill(segment));
                }
            }
        }
        if !self.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (name, value) in &self.query {
                pairs.append_pair(name, value);
            }
        }
        url
    }

    fn fill<'a>(&'a self, segment: &'a str) -> &'a str {
        match segment.strip_prefix(':') {
            Some(name) => self
                .params
                .iter()
                .rev()
                .find(|(key, _)| key == name)
                .map(|(_, value)| value.as_str())
                .unwrap_or(segment),
            None => segment,
        }
    }
}

impl fmt::Display for ApiUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.to_url().as_str())
    }
}

impl From<ApiUrl> for UrlLike {
    fn from(url: ApiUrl) -> Self {
        UrlLike::Stringifiable(Arc::new(url))
    }
}

impl From<&ApiUrl> for UrlLike {
    fn from(url: &ApiUrl) -> Self {
        UrlLike::Stringifiable(Arc::new(url.clone()))
    }
}
