//! Qualifier and terminology annotation for clinical documents
//!
//! Hospital notes mix statements about the patient with statements about
//! relatives and the past. This crate annotates pre-tokenized documents
//! with those qualifiers: kinship cues flag family context, temporal cues
//! flag medical history, and both stop at termination cues that open a
//! fresh boundary window. A terminology matcher recognizes drug names and
//! a pollution tagger masks template noise beforehand.
//!
//! The window algebra itself lives in `notecue-core`; this crate adds the
//! document model, the matchers and the concrete components.
//!
//! # Example
//!
//! ```rust
//! use notecue_engine::{Doc, Entity, FamilyContext, Span};
//!
//! let mut doc = Doc::from_words(&[
//!     "Le", "patient", ",", "dont", "le", "père", "a", "eu", "un", "cancer", ",",
//!     "se", "sent", "bien", ".",
//! ])
//! .unwrap();
//! doc.ents.push(Entity::new(Span::new(8, 10), "disease"));
//!
//! let family = FamilyContext::new().unwrap();
//! family.process(&mut doc).unwrap();
//!
//! // The kinship cue reaches the entity: the cancer is the father's.
//! assert!(doc.ents[0].family);
//! assert!(!doc.tokens()[9].family); // entities-only by default
//! ```

#![warn(missing_docs)]

pub mod annotations;
pub mod components;
pub mod context;
pub mod doc;
pub mod error;
pub mod matcher;
pub mod terms;

pub use annotations::{CueAnnotation, DocAnnotations, EntityAnnotation};
pub use components::{
    AntecedentContext, FamilyContext, PollutionConfig, PollutionTagger, TerminologyConfig,
    TerminologyMatcher,
};
pub use context::{ContextConfig, ContextTagger};
pub use doc::{ContextKind, Cue, Doc, DocBuilder, Entity, Token};
pub use error::{EngineError, Result};
pub use matcher::{Match, MatchAttr, Matcher, MatcherBuilder};

// Span primitives re-exported for convenience.
pub use notecue_core::{Span, Window};
