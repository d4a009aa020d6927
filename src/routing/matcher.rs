//! Origin-path rules and URI mappers.
//!
//! # Responsibilities
//! - Accept rules as a pattern string, a compiled pattern, or a pattern with mapper
//! - Normalize every rule into one `OriginPath` shape at construction
//! - Provide the async mapper seam used to rewrite a matched URI
//!
//! # Design Decisions
//! - Pattern strings are compiled as unanchored regular expressions
//! - Matching is against the path only, never the query string
//! - A rule without a mapper forwards the request unchanged

use async_trait::async_trait;
use regex::Regex;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use thiserror::Error;

use crate::config::OriginPathConfig;
use crate::dispatch::types::{AdapterError, BoxError};

/// The URI mapper rejected or failed.
#[derive(Debug, Error)]
#[error("uri mapper failed: {0}")]
pub struct MapperError(#[source] pub BoxError);

impl MapperError {
    pub fn new(error: impl Into<BoxError>) -> Self {
        Self(error.into())
    }
}

/// Rewrites the URI of a request that matched an origin path.
#[async_trait]
pub trait UriMapper: Send + Sync {
    async fn map_uri(&self, uri: String) -> Result<String, MapperError>;
}

#[async_trait]
impl<F, Fut> UriMapper for F
where
    F: Fn(String) -> Fut + Send + Sync,
    Fut: Future<Output = Result<String, MapperError>> + Send + 'static,
{
    async fn map_uri(&self, uri: String) -> Result<String, MapperError> {
        (self)(uri).await
    }
}

/// Regex replacement mapper, e.g. `^/assets/(.*)$` → `/static/$1`.
#[derive(Debug, Clone)]
pub struct RegexRewrite {
    pattern: Regex,
    replacement: String,
}

impl RegexRewrite {
    pub fn new(pattern: Regex, replacement: impl Into<String>) -> Self {
        Self {
            pattern,
            replacement: replacement.into(),
        }
    }
}

#[async_trait]
impl UriMapper for RegexRewrite {
    async fn map_uri(&self, uri: String) -> Result<String, MapperError> {
        Ok(self
            .pattern
            .replace(&uri, self.replacement.as_str())
            .into_owned())
    }
}

/// A configured origin-path rule, before normalization.
pub enum OriginPathRule {
    /// Pattern source, compiled when the router is built.
    Literal(String),
    /// Precompiled pattern.
    Pattern(Regex),
    /// Pattern with an optional URI mapper.
    Mapped {
        pattern: Regex,
        mapper: Option<Arc<dyn UriMapper>>,
    },
}

impl OriginPathRule {
    /// Pattern whose matches are rewritten by `mapper` before pass-through.
    pub fn mapped(pattern: Regex, mapper: impl UriMapper + 'static) -> Self {
        OriginPathRule::Mapped {
            pattern,
            mapper: Some(Arc::new(mapper)),
        }
    }

    /// Rule described by a config entry. A `rewrite` template becomes a
    /// [`RegexRewrite`] mapper over the same pattern.
    pub fn from_config(config: &OriginPathConfig) -> Result<Self, AdapterError> {
        let pattern = compile(&config.pattern)?;
        Ok(match &config.rewrite {
            Some(template) => {
                let mapper = RegexRewrite::new(pattern.clone(), template.clone());
                OriginPathRule::mapped(pattern, mapper)
            }
            None => OriginPathRule::Pattern(pattern),
        })
    }
}

impl fmt::Debug for OriginPathRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OriginPathRule::Literal(s) => f.debug_tuple("Literal").field(s).finish(),
            OriginPathRule::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            OriginPathRule::Mapped { pattern, mapper } => f
                .debug_struct("Mapped")
                .field("pattern", &pattern.as_str())
                .field("mapper", &mapper.is_some())
                .finish(),
        }
    }
}

impl From<&str> for OriginPathRule {
    fn from(pattern: &str) -> Self {
        OriginPathRule::Literal(pattern.to_string())
    }
}

impl From<String> for OriginPathRule {
    fn from(pattern: String) -> Self {
        OriginPathRule::Literal(pattern)
    }
}

impl From<Regex> for OriginPathRule {
    fn from(pattern: Regex) -> Self {
        OriginPathRule::Pattern(pattern)
    }
}

/// Normalized rule: one matcher, at most one mapper.
#[derive(Clone)]
pub struct OriginPath {
    test: Regex,
    mapper: Option<Arc<dyn UriMapper>>,
}

impl OriginPath {
    pub fn matches(&self, uri: &str) -> bool {
        self.test.is_match(uri)
    }

    pub fn pattern(&self) -> &str {
        self.test.as_str()
    }

    pub fn mapper(&self) -> Option<&Arc<dyn UriMapper>> {
        self.mapper.as_ref()
    }
}

impl fmt::Debug for OriginPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OriginPath")
            .field("test", &self.test.as_str())
            .field("mapper", &self.mapper.is_some())
            .finish()
    }
}

impl TryFrom<OriginPathRule> for OriginPath {
    type Error = AdapterError;

    fn try_from(rule: OriginPathRule) -> Result<Self, Self::Error> {
        Ok(match rule {
            OriginPathRule::Literal(source) => OriginPath {
                test: compile(&source)?,
                mapper: None,
            },
            OriginPathRule::Pattern(test) => OriginPath { test, mapper: None },
            OriginPathRule::Mapped { pattern, mapper } => OriginPath {
                test: pattern,
                mapper,
            },
        })
    }
}

fn compile(source: &str) -> Result<Regex, AdapterError> {
    Regex::new(source).map_err(|source_err| AdapterError::InvalidPattern {
        pattern: source.to_string(),
        source: source_err,
    })
}
