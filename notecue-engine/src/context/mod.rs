//! Window-scoped context tagging
//!
//! The shared engine behind the qualifier components. One pass per
//! document: match cue and termination patterns, cut the token range into
//! boundary windows at each termination start, then consume entities,
//! cues and sections window by window and propagate the qualifier flag.
//!
//! An entity crossing a window boundary is consumed by the first window it
//! overlaps and re-offered to the next one, so a cue on either side of the
//! boundary can still qualify it.

mod config;

pub use config::ContextConfig;

use crate::doc::{ContextKind, Cue, Doc, EntitySlot, SECTIONS};
use crate::error::Result;
use crate::matcher::Matcher;
use notecue_core::{consume, filter_overlaps, spans_with_label, windows, Span};

/// Reserved category for termination patterns; never contributes cues.
pub const TERMINATION: &str = "termination";
/// Reserved category for false-trigger patterns: its matches contribute no
/// cues but still shadow overlapping ones during filtering.
pub const PSEUDO: &str = "pseudo";

type EntityHandle = (EntitySlot, usize, Span);

/// Propagates one qualifier dimension from cue matches to entities and
/// tokens, window by window.
#[derive(Debug, Clone)]
pub struct ContextTagger {
    kind: ContextKind,
    matcher: Matcher,
    /// Configured categories contributing cues, sorted.
    cue_labels: Vec<String>,
    config: ContextConfig,
}

impl ContextTagger {
    /// Builds a tagger for `kind` from a validated configuration.
    pub fn from_config(kind: ContextKind, config: ContextConfig) -> Result<Self> {
        config.validate()?;

        let mut builder = Matcher::builder(config.attr)
            .ignore_excluded(config.ignore_excluded)
            .filter_matches(config.filter_matches);
        for (label, patterns) in &config.cue_terms {
            builder = builder.terms(label, patterns.iter().cloned());
        }
        if !config.termination.is_empty() {
            builder = builder.terms(TERMINATION, config.termination.iter().cloned());
        }
        for (label, patterns) in &config.regex {
            builder = builder.regex(label, patterns.iter().cloned());
        }
        let matcher = builder.build()?;

        let mut cue_labels: Vec<String> = config
            .cue_terms
            .keys()
            .chain(config.regex.keys())
            .filter(|label| label.as_str() != TERMINATION && label.as_str() != PSEUDO)
            .cloned()
            .collect();
        cue_labels.sort_unstable();
        cue_labels.dedup();

        Ok(Self {
            kind,
            matcher,
            cue_labels,
            config,
        })
    }

    /// The qualifier dimension this tagger writes.
    pub fn kind(&self) -> ContextKind {
        self.kind
    }

    /// The configuration the tagger was built from.
    pub fn config(&self) -> &ContextConfig {
        &self.config
    }

    /// Annotates one document in place.
    ///
    /// Reruns are idempotent: flags are only ever raised and recorded cues
    /// are deduplicated.
    pub fn process(&self, doc: &mut Doc) -> Result<()> {
        if doc.is_empty() {
            return Ok(());
        }

        let found = self.matcher.find_matches(doc);

        let mut boundary_starts: Vec<usize> = spans_with_label(&found, TERMINATION)
            .into_iter()
            .map(|m| m.span.start)
            .collect();
        if self.config.use_sentence_boundaries {
            boundary_starts.extend(doc.sent_starts.iter().copied());
        }
        let windows = windows(doc.len(), boundary_starts)?;
        tracing::debug!(
            kind = ?self.kind,
            matches = found.len(),
            windows = windows.len(),
            "derived boundary windows"
        );

        let mut matches = filter_overlaps(found);

        let mut entities: Vec<EntityHandle> = doc.entity_slots();

        let mut sections: Vec<Cue> = if self.config.use_sections {
            doc.spans
                .get(SECTIONS)
                .map(|sections| {
                    sections
                        .iter()
                        .filter(|s| s.label() == self.config.section_label)
                        .map(|s| Cue {
                            span: s.span(),
                            label: s.label().to_string(),
                        })
                        .collect()
                })
                .unwrap_or_default()
        } else {
            Vec::new()
        };

        let mut previous: Option<Vec<EntityHandle>> = None;
        for window in &windows {
            let (ents, rest) = consume(
                entities,
                |(_, _, span)| span.overlaps(window.start, window.end),
                previous.take(),
            );
            entities = rest;

            let (in_window, rest) = consume(
                matches,
                |m| m.span.starts_within(window.start, window.end),
                None,
            );
            matches = rest;

            let (in_window_sections, rest) =
                consume(sections, |cue| cue.span.contains_token(window.start), None);
            sections = rest;

            previous = Some(ents.clone());

            if self.config.entities_only && ents.is_empty() {
                continue;
            }

            let mut cues: Vec<Cue> = in_window
                .into_iter()
                .filter(|m| self.cue_labels.iter().any(|label| label == &m.label))
                .map(|m| Cue {
                    span: m.span,
                    label: m.label,
                })
                .collect();
            cues.extend(in_window_sections);

            if cues.is_empty() {
                continue;
            }
            tracing::debug!(
                start = window.start,
                end = window.end,
                entities = ents.len(),
                cues = cues.len(),
                "tagging window"
            );

            if !self.config.entities_only {
                doc.mark_tokens(window.start, window.end, self.kind);
            }
            for &(slot, index, span) in &ents {
                if let Some(entity) = doc.entity_mut(slot, index) {
                    entity.set_context(self.kind);
                    if self.config.explain {
                        for cue in &cues {
                            entity.push_cue(self.kind, cue.clone());
                        }
                    }
                }
                if !self.config.entities_only {
                    doc.mark_tokens(span.start, span.end, self.kind);
                }
            }
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

#[cfg(test)]
mod tests {
    use super::*;
    use notecue_core::Span;
    use std::collections::BTreeMap;

    fn tagger(cues: &[&str], terminations: &[&str]) -> ContextTagger {
        let mut cue_terms = BTreeMap::new();
        cue_terms.insert(
            "family".to_string(),
            cues.iter().map(|s| s.to_string()).collect(),
        );
        let config = ContextConfig {
            cue_terms,
            termination: terminations.iter().map(|s| s.to_string()).collect(),
            explain: true,
            ..Default::default()
        };
        ContextTagger::from_config(ContextKind::Family, config).unwrap()
    }

    #[test]
    fn test_cue_in_window_flags_the_entity() {
        let mut doc = Doc::builder("son père a un cancer")
            .token("son", 0)
            .token("père", 4)
            .token("a", 9)
            .token("un", 11)
            .token("cancer", 14)
            .entity(4, 5, "disease")
            .build()
            .unwrap();
        tagger(&["père"], &[]).process(&mut doc).unwrap();
        assert!(doc.ents[0].family);
        assert_eq!(doc.ents[0].family_cues[0].span, Span::new(1, 2));
        assert_eq!(doc.ents[0].family_cues[0].label, "family");
    }

    #[test]
    fn test_termination_matches_are_not_cues() {
        let mut doc = Doc::from_words(&["mais", "le", "diabète"]).unwrap();
        doc.ents
            .push(crate::doc::Entity::new(Span::new(2, 3), "disease"));
        tagger(&["père"], &["mais"]).process(&mut doc).unwrap();
        assert!(!doc.ents[0].family);
    }

    #[test]
    fn test_pseudo_matches_are_not_cues() {
        let mut cue_terms = BTreeMap::new();
        cue_terms.insert("family".to_string(), vec!["père".to_string()]);
        cue_terms.insert("pseudo".to_string(), vec!["père noël".to_string()]);
        let config = ContextConfig {
            cue_terms,
            ..Default::default()
        };
        let tagger = ContextTagger::from_config(ContextKind::Family, config).unwrap();
        assert_eq!(tagger.cue_labels, vec!["family".to_string()]);

        let mut doc = Doc::from_words(&["le", "père", "noël", "et", "son", "asthme"]).unwrap();
        doc.ents
            .push(crate::doc::Entity::new(Span::new(5, 6), "disease"));
        tagger.process(&mut doc).unwrap();
        // The longer pseudo match shadows the kinship cue.
        assert!(!doc.ents[0].family);
    }

    #[test]
    fn test_token_flags_follow_when_not_entities_only() {
        let mut cue_terms = BTreeMap::new();
        cue_terms.insert("family".to_string(), vec!["mère".to_string()]);
        let config = ContextConfig {
            cue_terms,
            termination: vec!["mais".to_string()],
            entities_only: false,
            ..Default::default()
        };
        let tagger = ContextTagger::from_config(ContextKind::Family, config).unwrap();
        let mut doc =
            Doc::from_words(&["sa", "mère", "fume", "mais", "lui", "non"]).unwrap();
        tagger.process(&mut doc).unwrap();
        let flags: Vec<bool> = doc.tokens().iter().map(|t| t.family).collect();
        assert_eq!(flags, vec![true, true, true, false, false, false]);
    }

    #[test]
    fn test_section_qualifies_only_the_window_holding_its_start() {
        let mut cue_terms = BTreeMap::new();
        cue_terms.insert("family".to_string(), vec!["père".to_string()]);
        let config = ContextConfig {
            cue_terms,
            termination: vec!["mais".to_string(), "donc".to_string()],
            explain: true,
            use_sections: true,
            section_label: "antécédents familiaux".to_string(),
            ..Default::default()
        };
        let tagger = ContextTagger::from_config(ContextKind::Family, config).unwrap();

        // Windows [0, 1), [1, 3) and [3, 6); the section spans all three.
        let mut doc = Doc::builder("asthme mais diabète donc toux sèche")
            .token("asthme", 0)
            .token("mais", 7)
            .token("diabète", 12)
            .token("donc", 20)
            .token("toux", 25)
            .token("sèche", 30)
            .entity(0, 1, "disease")
            .entity(2, 3, "disease")
            .section(0, 6, "antécédents familiaux")
            .build()
            .unwrap();
        tagger.process(&mut doc).unwrap();

        // The section is spent on the window holding its start token.
        assert!(doc.ents[0].family);
        assert_eq!(doc.ents[0].family_cues[0].span, Span::new(0, 6));
        assert_eq!(doc.ents[0].family_cues[0].label, "antécédents familiaux");
        assert!(!doc.ents[1].family);
        assert!(doc.ents[1].family_cues.is_empty());
    }

    #[test]
    fn test_empty_document_is_a_no_op() {
        let mut doc = Doc::builder("").build().unwrap();
        tagger(&["père"], &[]).process(&mut doc).unwrap();
        assert!(doc.ents.is_empty());
    }
}
