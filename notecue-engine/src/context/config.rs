//! Configuration surface for the context taggers

use crate::error::Result;
use crate::matcher::MatchAttr;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

/// Options shared by the context-tagging components.
///
/// A configuration is immutable once handed to a tagger; to change
/// behavior, build a new tagger. Missing fields take the defaults below
/// when deserialized, so a TOML file only has to name what it overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextConfig {
    /// Term patterns closing a boundary window.
    pub termination: Vec<String>,
    /// Token attribute used for term comparison.
    pub attr: MatchAttr,
    /// Overlap-filter the raw matches inside the matcher.
    pub filter_matches: bool,
    /// Record the responsible cues on each tagged entity.
    pub explain: bool,
    /// Only tag entities; windows without entities are skipped and token
    /// flags are left untouched.
    pub entities_only: bool,
    /// Treat host-supplied sections labeled `section_label` as cues.
    pub use_sections: bool,
    /// Section label consumed when `use_sections` is set.
    pub section_label: String,
    /// Skip pollution-excluded tokens while matching.
    pub ignore_excluded: bool,
    /// Merge host-supplied sentence starts into the boundary starts.
    pub use_sentence_boundaries: bool,
    // Map-valued fields last so serialized TOML keeps plain values ahead
    // of tables.
    /// Term patterns by cue category. The reserved categories
    /// [`TERMINATION`](crate::context::TERMINATION) and
    /// [`PSEUDO`](crate::context::PSEUDO) never contribute cues.
    pub cue_terms: BTreeMap<String, Vec<String>>,
    /// Regex patterns by cue category.
    pub regex: BTreeMap<String, Vec<String>>,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            termination: Vec::new(),
            attr: MatchAttr::Norm,
            filter_matches: false,
            explain: false,
            entities_only: true,
            use_sections: false,
            section_label: String::new(),
            ignore_excluded: false,
            use_sentence_boundaries: false,
            cue_terms: BTreeMap::new(),
            regex: BTreeMap::new(),
        }
    }
}

impl ContextConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        Ok(toml::from_str(raw)?)
    }

    /// Loads a configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    pub(crate) fn validate(&self) -> Result<()> {
        let has_terms = self.cue_terms.values().any(|patterns| !patterns.is_empty());
        let has_regex = self.regex.values().any(|patterns| !patterns.is_empty());
        if !has_terms && !has_regex {
            return Err(crate::error::EngineError::Config(
                "at least one cue term or regex pattern is required".into(),
            ));
        }
        if self.use_sections && self.section_label.is_empty() {
            return Err(crate::error::EngineError::Config(
                "use_sections requires a section label".into(),
            ));
        }
        Ok(())
    }
}
