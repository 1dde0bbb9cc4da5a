//! Serializable annotation snapshots
//!
//! Flat DTOs decoupled from the in-memory model, so results can be
//! exported through any serde format without dragging the document along.

use crate::doc::{Cue, Doc, Entity};
use serde::{Deserialize, Serialize};

/// Snapshot of a document's annotated entities.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocAnnotations {
    /// Entities from the primary collection, in document order.
    pub entities: Vec<EntityAnnotation>,
    /// Entities displaced into the discarded group.
    pub discarded: Vec<EntityAnnotation>,
}

/// One annotated entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityAnnotation {
    /// First token index.
    pub start: usize,
    /// One past the last token index.
    pub end: usize,
    /// Covered text.
    pub text: String,
    /// Entity label.
    pub label: String,
    /// Canonical concept, for terminology hits.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub concept: Option<String>,
    /// Family-context flag.
    pub family: bool,
    /// History-context flag.
    pub history: bool,
    /// Cues recorded for the family flag.
    pub family_cues: Vec<CueAnnotation>,
    /// Cues recorded for the history flag.
    pub history_cues: Vec<CueAnnotation>,
}

/// One recorded cue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CueAnnotation {
    /// First token index.
    pub start: usize,
    /// One past the last token index.
    pub end: usize,
    /// Category that produced the cue.
    pub label: String,
}

impl CueAnnotation {
    fn from_cue(cue: &Cue) -> Self {
        Self {
            start: cue.span.start,
            end: cue.span.end,
            label: cue.label.clone(),
        }
    }
}

impl EntityAnnotation {
    fn from_entity(doc: &Doc, entity: &Entity) -> Self {
        Self {
            start: entity.span().start,
            end: entity.span().end,
            text: doc.span_text(entity.span()).to_string(),
            label: entity.label().to_string(),
            concept: entity.concept.clone(),
            family: entity.family,
            history: entity.history,
            family_cues: entity.family_cues.iter().map(CueAnnotation::from_cue).collect(),
            history_cues: entity.history_cues.iter().map(CueAnnotation::from_cue).collect(),
        }
    }
}

impl Doc {
    /// Snapshot of the current annotations.
    pub fn annotations(&self) -> DocAnnotations {
        let mut entities: Vec<EntityAnnotation> = self
            .ents
            .iter()
            .map(|e| EntityAnnotation::from_entity(self, e))
            .collect();
        entities.sort_by_key(|e| (e.start, e.end));
        let mut discarded: Vec<EntityAnnotation> = self
            .discarded()
            .iter()
            .map(|e| EntityAnnotation::from_entity(self, e))
            .collect();
        discarded.sort_by_key(|e| (e.start, e.end));
        DocAnnotations {
            entities,
            discarded,
        }
    }
}
