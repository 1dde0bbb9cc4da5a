//! Family-context detection
//!
//! Flags statements that concern a relative rather than the patient, e.g.
//! "son père a eu un cancer". Kinship terms act as cues; adversative
//! connectors and hard punctuation terminate their reach.

use crate::context::{ContextConfig, ContextTagger};
use crate::doc::{ContextKind, Doc};
use crate::error::Result;
use crate::matcher::MatchAttr;
use crate::terms;
use std::collections::BTreeMap;

/// Tags the family qualifier on entities (and optionally tokens).
#[derive(Debug, Clone)]
pub struct FamilyContext {
    tagger: ContextTagger,
}

impl FamilyContext {
    /// Cue category matched by the built-in kinship terms.
    pub const CUE_LABEL: &'static str = "family";
    /// Section label treated as an implicit cue when sections are enabled.
    pub const SECTION_LABEL: &'static str = "antécédents familiaux";

    /// Builds the component with its default configuration.
    pub fn new() -> Result<Self> {
        Self::with_config(Self::default_config())
    }

    /// Default configuration: built-in kinship and termination terms,
    /// matched on the normalized attribute.
    pub fn default_config() -> ContextConfig {
        let mut cue_terms = BTreeMap::new();
        cue_terms.insert(Self::CUE_LABEL.to_string(), terms::family());
        ContextConfig {
            cue_terms,
            termination: terms::termination(),
            attr: MatchAttr::Norm,
            section_label: Self::SECTION_LABEL.to_string(),
            ..ContextConfig::default()
        }
    }

    /// Builds the component from an explicit configuration.
    pub fn with_config(config: ContextConfig) -> Result<Self> {
        Ok(Self {
            tagger: ContextTagger::from_config(ContextKind::Family, config)?,
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
