//! Medical-history (antecedent) detection
//!
//! Flags statements about the patient's past rather than the current
//! visit. Temporal markers and dedicated history sections act as cues.

use crate::context::{ContextConfig, ContextTagger};
use crate::doc::{ContextKind, Doc};
use crate::error::Result;
use crate::matcher::MatchAttr;
use crate::terms;
use std::collections::BTreeMap;

/// Tags the history qualifier on entities (and optionally tokens).
#[derive(Debug, Clone)]
pub struct AntecedentContext {
    tagger: ContextTagger,
}

impl AntecedentContext {
    /// Cue category matched by the built-in temporal markers.
    pub const CUE_LABEL: &'static str = "antecedent";
    /// Section label treated as an implicit cue.
    pub const SECTION_LABEL: &'static str = "antécédents";

    /// Builds the component with its default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(Self::default_config())
    }

    /// Default configuration: built-in temporal markers and year regexes,
    /// matched on the lowercased attribute, with sections enabled.
    pub fn default_config() -> ContextConfig {
        let mut cue_terms = BTreeMap::new();
        cue_terms.insert(Self::CUE_LABEL.to_string(), terms::antecedents());
        let mut regex = BTreeMap::new();
        regex.insert(Self::CUE_LABEL.to_string(), terms::antecedents_regex());
        ContextConfig {
            cue_terms,
            regex,
            termination: terms::termination(),
            attr: MatchAttr::Lower,
            use_sections: true,
            section_label: Self::SECTION_LABEL.to_string(),
            ..ContextConfig::default()
        }
    }

    /// Builds the component from an explicit configuration.
    pub fn with_config(config: ContextConfig) -> Result<Self> {
        Ok(Self {
            tagger: ContextTagger::from_config(ContextKind::History, config)?,
        })
    }

    /// Annotates one document in place.
    pub fn process(&self, doc: &mut Doc) -> Result<()> {
        self.tagger.process(doc)
    }

    /// Annotates a batch of documents.
    pub fn pipe(&self, docs: &mut [Doc]) -> Result<()> {
        self.tagger.pipe(docs)
    }
}
