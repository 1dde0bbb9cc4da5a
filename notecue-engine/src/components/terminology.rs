//! Terminology matching against concept synonym tables
//!
//! Every hit becomes an entity with a fixed label and the concept its
//! synonym resolved to. Hits are merged into the primary collection;
//! entities displaced by a longer overlapping hit move to the discarded
//! group, where the context taggers still see them.

use crate::doc::{Doc, Entity, DISCARDED};
use crate::error::{EngineError, Result};
use crate::matcher::{MatchAttr, Matcher};
use crate::terms;
use notecue_core::{filter_overlaps, filter_overlaps_discarding};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Configuration for [`TerminologyMatcher`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminologyConfig {
    /// Entity label assigned to every hit.
    pub label: String,
    /// Token attribute used for term comparison.
    pub attr: MatchAttr,
    /// Skip pollution-excluded tokens while matching.
    pub ignore_excluded: bool,
    /// Concept key to its term synonyms.
    pub terms: BTreeMap<String, Vec<String>>,
    /// Concept key to its regex patterns.
    pub regex: BTreeMap<String, Vec<String>>,
}

impl Default for TerminologyConfig {
    fn default() -> Self {
        Self {
            label: String::new(),
            attr: MatchAttr::Text,
            ignore_excluded: false,
            terms: BTreeMap::new(),
            regex: BTreeMap::new(),
        }
    }
}

/// Recognizes entities from a terminology and merges them into the
/// document.
#[derive(Debug, Clone)]
pub struct TerminologyMatcher {
    label: String,
    matcher: Matcher,
}

impl TerminologyMatcher {
    /// Builds the component from a configuration.
    pub fn with_config(config: TerminologyConfig) -> Result<Self> {
        if config.label.is_empty() {
            return Err(EngineError::Config(
                "terminology label must not be empty".into(),
            ));
        }
        let has_patterns = config.terms.values().any(|p| !p.is_empty())
            || config.regex.values().any(|p| !p.is_empty());
        if !has_patterns {
            return Err(EngineError::Config(
                "at least one term or regex pattern is required".into(),
            ));
        }

        let mut builder = Matcher::builder(config.attr).ignore_excluded(config.ignore_excluded);
        for (concept, patterns) in &config.terms {
            builder = builder.concept_terms(&config.label, concept, patterns.iter().cloned());
        }
        for (concept, patterns) in &config.regex {
            builder = builder.concept_regex(&config.label, concept, patterns.iter().cloned());
        }

        Ok(Self {
            label: config.label,
            matcher: builder.build()?,
        })
    }

    /// Drug-name matcher over the built-in synonym table: label `"drug"`,
    /// matched on the normalized attribute.
    pub fn drugs() -> Result<Self> {
        Self::with_config(TerminologyConfig {
            label: "drug".to_string(),
            terms: terms::drugs(),
            attr: MatchAttr::Norm,
            ..TerminologyConfig::default()
        })
    }

    /// The label assigned to hits.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Matches the terminology and merges the hits into `doc.ents`.
    ///
    /// The full hit list also lands in `doc.spans[label]`, so hits ousted
    /// from the primary collection remain reachable.
    pub fn process(&self, doc: &mut Doc) -> Result<()> {
        let matches = self.matcher.find_matches(doc);
        let hits: Vec<Entity> = filter_overlaps(
            matches
                .into_iter()
                .map(|m| {
                    let entity = Entity::new(m.span, self.label.clone());
                    match m.concept {
                        Some(concept) => entity.with_concept(concept),
                        None => entity,
                    }
                })
                .collect(),
        );
        tracing::debug!(label = %self.label, hits = hits.len(), "terminology hits");

        doc.spans.insert(self.label.clone(), hits.clone());

        let mut pool = std::mem::take(&mut doc.ents);
        pool.extend(hits);
        let (kept, displaced) = filter_overlaps_discarding(pool);
        doc.ents = kept;
        if !displaced.is_empty() {
            doc.spans
                .entry(DISCARDED.to_string())
                .or_default()
                .extend(displaced);
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
