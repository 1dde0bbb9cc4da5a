//! Pollution masking
//!
//! Hospital exports carry recurring template noise: information
//! paragraphs, bar runs, page footers, links. This tagger finds them with
//! per-category regexes, records the spans and marks their tokens
//! excluded so matchers configured with `ignore_excluded` skip them.

use crate::doc::{Doc, Entity, POLLUTIONS};
use crate::error::{EngineError, Result};
use crate::terms;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for [`PollutionTagger`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PollutionConfig {
    /// Built-in categories to toggle; unknown names are rejected.
    pub enabled: BTreeMap<String, bool>,
    /// Extra category to regex patterns, always active.
    pub extra: BTreeMap<String, Vec<String>>,
}

impl Default for PollutionConfig {
    fn default() -> Self {
        Self {
            enabled: terms::default_pollution_enabled(),
            extra: BTreeMap::new(),
        }
    }
}

/// Detects pollution spans and excludes their tokens.
#[derive(Debug, Clone)]
pub struct PollutionTagger {
    /// Category name and compiled pattern, in configuration order.
    patterns: Vec<(String, Regex)>,
}

impl PollutionTagger {
    /// Builds the tagger with the default categories.
    pub fn new() -> Result<Self> {
        Self::with_config(PollutionConfig::default())
    }

    /// Builds the tagger from a configuration.
    pub fn with_config(config: PollutionConfig) -> Result<Self> {
        let builtin = terms::pollution();
        let mut patterns = Vec::new();
        for (category, enabled) in &config.enabled {
            let Some(raw) = builtin.get(category) else {
                return Err(EngineError::Config(format!(
                    "unknown pollution category '{category}'"
                )));
            };
            if !enabled {
                continue;
            }
            for pattern in raw {
                patterns.push((category.clone(), Regex::new(pattern)?));
            }
        }
        for (category, raw) in &config.extra {
            for pattern in raw {
                patterns.push((category.clone(), Regex::new(pattern)?));
            }
        }
        Ok(Self { patterns })
    }

    /// Marks pollution in one document.
    ///
    /// Detected spans are appended to `doc.spans["pollutions"]` and every
    /// covered token is flagged excluded. Text and offsets are untouched.
    pub fn process(&self, doc: &mut Doc) -> Result<()> {
        let mut found = Vec::new();
        for (category, regex) in &self.patterns {
            for hit in regex.find_iter(doc.text()) {
                if let Some(span) = doc.token_span_for_bytes(hit.start(), hit.end()) {
                    found.push(Entity::new(span, category.clone()));
                }
            }
        }
        found.sort_by_key(|e| (e.span().start, e.span().end));
        tracing::debug!(spans = found.len(), "pollution spans");

        for entity in &found {
            doc.mark_excluded(entity.span());
        }
        if !found.is_empty() {
            doc.spans
                .entry(POLLUTIONS.to_string())
                .or_default()
                .extend(found);
        }
        Ok(())
    }

    /// Annotates a batch of documents, in parallel when the `parallel`
    /// feature is enabled.
    pub fn pipe(&self, docs: &mut [Doc]) -> Result<()> {
        #[cfg(feature = "parallel")]
        {
            use rayon::prelude::*;
            docs.par_iter_mut().try_for_each(|doc| self.process(doc))
        }
        #[cfg(not(feature = "parallel"))]
        {
            docs.iter_mut().try_for_each(|doc| self.process(doc))
        }
    }
}
