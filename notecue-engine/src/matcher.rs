//! Term and regex matching over tokenized documents
//!
//! Term patterns are compared token-by-token against a configurable text
//! attribute, with a first-word index so documents are scanned once.
//! Regex patterns run over the raw text and are aligned back to token
//! boundaries. Both kinds come back as one stream in document order.

use crate::doc::{Doc, Token};
use crate::error::{EngineError, Result};
use notecue_core::{filter_overlaps, Labeled, Span, Spanned};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;

/// Token attribute used for term comparison.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum MatchAttr {
    /// The exact surface form.
    #[default]
    Text,
    /// The normalized form supplied by the host (lowercased surface when
    /// the host supplies none).
    Norm,
    /// The lowercased surface form.
    Lower,
}

impl MatchAttr {
    fn token_value(self, token: &Token) -> Cow<'_, str> {
        match self {
            MatchAttr::Text => Cow::Borrowed(token.text.as_str()),
            MatchAttr::Norm => Cow::Borrowed(token.norm.as_str()),
            MatchAttr::Lower => Cow::Owned(token.text.to_lowercase()),
        }
    }

    fn normalize_pattern(self, pattern: &str) -> String {
        match self {
            MatchAttr::Text => pattern.to_string(),
            MatchAttr::Norm | MatchAttr::Lower => pattern.to_lowercase(),
        }
    }
}

/// A category-tagged hit returned by [`Matcher::find_matches`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    /// Token range of the hit.
    pub span: Span,
    /// Category that produced it.
    pub label: String,
    /// Concept key for terminology hits.
    pub concept: Option<String>,
}

impl Spanned for Match {
    fn span(&self) -> Span {
        self.span
    }
}

impl Labeled for Match {
    fn label(&self) -> &str {
        &self.label
    }
}

#[derive(Debug, Clone)]
struct CompiledTerm {
    label: String,
    concept: Option<String>,
    words: Vec<String>,
}

#[derive(Debug, Clone)]
struct CompiledRegex {
    label: String,
    concept: Option<String>,
    regex: Regex,
}

/// Combined term and regex matcher over a [`Doc`].
///
/// Built once per component and reused across documents; matching never
/// mutates the document.
#[derive(Debug, Clone)]
pub struct Matcher {
    attr: MatchAttr,
    terms: Vec<CompiledTerm>,
    /// First word of each term -> indices into `terms`.
    index: HashMap<String, Vec<usize>>,
    regexes: Vec<CompiledRegex>,
    ignore_excluded: bool,
    filter_matches: bool,
}

impl Matcher {
    /// Starts a builder using `attr` for term comparison.
    pub fn builder(attr: MatchAttr) -> MatcherBuilder {
        MatcherBuilder {
            attr,
            ..MatcherBuilder::default()
        }
    }

    /// All hits in document order.
    pub fn find_matches(&self, doc: &Doc) -> Vec<Match> {
        let mut matches = self.find_term_matches(doc);
        matches.extend(self.find_regex_matches(doc));
        matches.sort_by_key(|m| (m.span.start, m.span.end));
        tracing::debug!(count = matches.len(), "matched patterns");
        if self.filter_matches {
            filter_overlaps(matches)
        } else {
            matches
        }
    }

    fn find_term_matches(&self, doc: &Doc) -> Vec<Match> {
        if self.terms.is_empty() {
            return Vec::new();
        }
        // With excluded regions ignored, matching runs over the clean token
        // stream; a multi-word term may then span excluded tokens and the
        // reported range covers them.
        let stream: Vec<(usize, Cow<'_, str>)> = doc
            .tokens()
            .iter()
            .filter(|t| !(self.ignore_excluded && t.excluded))
            .map(|t| (t.i, self.attr.token_value(t)))
            .collect();

        let mut matches = Vec::new();
        for (pos, (_, first)) in stream.iter().enumerate() {
            let Some(candidates) = self.index.get(first.as_ref()) else {
                continue;
            };
            for &term_index in candidates {
                let term = &self.terms[term_index];
                let len = term.words.len();
                if pos + len > stream.len() {
                    continue;
                }
                let aligned = term
                    .words
                    .iter()
                    .zip(&stream[pos..pos + len])
                    .all(|(word, (_, value))| word.as_str() == value.as_ref());
                if aligned {
                    let span = Span::new(stream[pos].0, stream[pos + len - 1].0 + 1);
                    matches.push(Match {
                        span,
                        label: term.label.clone(),
                        concept: term.concept.clone(),
                    });
                }
            }
        }
        matches
    }

    fn find_regex_matches(&self, doc: &Doc) -> Vec<Match> {
        let mut matches = Vec::new();
        for compiled in &self.regexes {
            for hit in compiled.regex.find_iter(doc.text()) {
                let Some(span) = doc.token_span_for_bytes(hit.start(), hit.end()) else {
                    continue;
                };
                if self.ignore_excluded
                    && doc.tokens()[span.start..span.end].iter().any(|t| t.excluded)
                {
                    continue;
                }
                matches.push(Match {
                    span,
                    label: compiled.label.clone(),
                    concept: compiled.concept.clone(),
                });
            }
        }
        matches
    }
}

/// Builder for [`Matcher`].
#[derive(Debug, Default)]
pub struct MatcherBuilder {
    attr: MatchAttr,
    terms: Vec<(String, Option<String>, String)>,
    regexes: Vec<(String, Option<String>, String)>,
    ignore_excluded: bool,
    filter_matches: bool,
}

impl MatcherBuilder {
    /// Adds term patterns under a category.
    pub fn terms<I, S>(mut self, label: &str, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pattern in patterns {
            self.terms
                .push((label.to_string(), None, pattern.into()));
        }
        self
    }

    /// Adds term patterns under a category, resolving to a concept.
    pub fn concept_terms<I, S>(mut self, label: &str, concept: &str, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pattern in patterns {
            self.terms
                .push((label.to_string(), Some(concept.to_string()), pattern.into()));
        }
        self
    }

    /// Adds regex patterns under a category.
    pub fn regex<I, S>(mut self, label: &str, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pattern in patterns {
            self.regexes
                .push((label.to_string(), None, pattern.into()));
        }
        self
    }

    /// Adds regex patterns under a category, resolving to a concept.
    pub fn concept_regex<I, S>(mut self, label: &str, concept: &str, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for pattern in patterns {
            self.regexes
                .push((label.to_string(), Some(concept.to_string()), pattern.into()));
        }
        self
    }

    /// Skips tokens marked excluded while matching.
    pub fn ignore_excluded(mut self, ignore: bool) -> Self {
        self.ignore_excluded = ignore;
        self
    }

    /// Overlap-filters the matches before returning them.
    pub fn filter_matches(mut self, filter: bool) -> Self {
        self.filter_matches = filter;
        self
    }

    /// Compiles the patterns.
    pub fn build(self) -> Result<Matcher> {
        let mut terms = Vec::with_capacity(self.terms.len());
        let mut index: HashMap<String, Vec<usize>> = HashMap::new();
        for (label, concept, pattern) in self.terms {
            let words: Vec<String> = pattern
                .split_whitespace()
                .map(|w| self.attr.normalize_pattern(w))
                .collect();
            let Some(first) = words.first() else {
                return Err(EngineError::Config(format!(
                    "empty term pattern in category '{label}'"
                )));
            };
            index.entry(first.clone()).or_default().push(terms.len());
            terms.push(CompiledTerm {
                label,
                concept,
                words,
            });
        }

        let mut regexes = Vec::with_capacity(self.regexes.len());
        for (label, concept, pattern) in self.regexes {
            regexes.push(CompiledRegex {
                label,
                concept,
                regex: Regex::new(&pattern)?,
            });
        }

        Ok(Matcher {
            attr: self.attr,
            terms,
            index,
            regexes,
            ignore_excluded: self.ignore_excluded,
            filter_matches: self.filter_matches,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(words: &[&str]) -> Doc {
        Doc::from_words(words).unwrap()
    }

    fn spans(matches: &[Match]) -> Vec<(usize, usize)> {
        matches.iter().map(|m| (m.span.start, m.span.end)).collect()
    }

    #[test]
    fn test_single_word_term() {
        let matcher = Matcher::builder(MatchAttr::Norm)
            .terms("family", ["père"])
            .build()
            .unwrap();
        let matches = matcher.find_matches(&doc(&["le", "père", "du", "patient"]));
        assert_eq!(spans(&matches), vec![(1, 2)]);
        assert_eq!(matches[0].label, "family");
    }

    #[test]
    fn test_multi_word_term() {
        let matcher = Matcher::builder(MatchAttr::Lower)
            .terms("antecedent", ["il y a"])
            .build()
            .unwrap();
        let matches = matcher.find_matches(&doc(&["opéré", "Il", "y", "a", "dix", "ans"]));
        assert_eq!(spans(&matches), vec![(1, 4)]);
    }

    #[test]
    fn test_text_attr_is_case_sensitive() {
        let matcher = Matcher::builder(MatchAttr::Text)
            .terms("family", ["Père"])
            .build()
            .unwrap();
        assert!(matcher.find_matches(&doc(&["père"])).is_empty());
        assert_eq!(matcher.find_matches(&doc(&["Père"])).len(), 1);
    }

    #[test]
    fn test_norm_attr_reads_host_normalization() {
        let base = Doc::builder("Doliprane 500")
            .token_with_norm("Doliprane", 0, "doliprane")
            .token("500", 10)
            .build()
            .unwrap();
        let matcher = Matcher::builder(MatchAttr::Norm)
            .terms("drug", ["doliprane"])
            .build()
            .unwrap();
        assert_eq!(matcher.find_matches(&base).len(), 1);
    }

    #[test]
    fn test_regex_hits_snap_to_token_boundaries() {
        let matcher = Matcher::builder(MatchAttr::Text)
            .regex("antecedent", [r"(?i)en 19\d\d"])
            .build()
            .unwrap();
        let matches = matcher.find_matches(&doc(&["opérée", "en", "1998", "du", "genou"]));
        assert_eq!(spans(&matches), vec![(1, 3)]);
    }

    #[test]
    fn test_regex_between_tokens_is_dropped() {
        let base = Doc::builder("ab--cd")
            .token("ab", 0)
            .token("cd", 4)
            .build()
            .unwrap();
        let matcher = Matcher::builder(MatchAttr::Text)
            .regex("noise", ["--"])
            .build()
            .unwrap();
        assert!(matcher.find_matches(&base).is_empty());
    }

    #[test]
    fn test_ignore_excluded_matches_across_excluded_tokens() {
        let mut base = doc(&["le", "père", "======", "malade"]);
        base.mark_excluded(Span::new(2, 3));
        let matcher = Matcher::builder(MatchAttr::Norm)
            .terms("family", ["père malade"])
            .ignore_excluded(true)
            .build()
            .unwrap();
        let matches = matcher.find_matches(&base);
        // The reported span covers the excluded token in the middle.
        assert_eq!(spans(&matches), vec![(1, 4)]);
    }

    #[test]
    fn test_excluded_tokens_still_match_by_default() {
        let mut base = doc(&["le", "père"]);
        base.mark_excluded(Span::new(1, 2));
        let matcher = Matcher::builder(MatchAttr::Norm)
            .terms("family", ["père"])
            .build()
            .unwrap();
        assert_eq!(matcher.find_matches(&base).len(), 1);
    }

    #[test]
    fn test_filter_matches_keeps_longest() {
        let matcher = Matcher::builder(MatchAttr::Norm)
            .terms("family", ["grand père", "père"])
            .filter_matches(true)
            .build()
            .unwrap();
        let matches = matcher.find_matches(&doc(&["le", "grand", "père"]));
        assert_eq!(spans(&matches), vec![(1, 3)]);
    }

    #[test]
    fn test_concept_terms_carry_their_key() {
        let matcher = Matcher::builder(MatchAttr::Norm)
            .concept_terms("drug", "paracetamol", ["doliprane", "dafalgan"])
            .build()
            .unwrap();
        let matches = matcher.find_matches(&doc(&["sous", "dafalgan"]));
        assert_eq!(matches[0].concept.as_deref(), Some("paracetamol"));
    }

    #[test]
    fn test_matches_come_back_in_document_order() {
        let matcher = Matcher::builder(MatchAttr::Norm)
            .terms("family", ["mère"])
            .regex("antecedent", ["(?i)atcd"])
            .build()
            .unwrap();
        let matches = matcher.find_matches(&doc(&["ATCD", ":", "mère", "diabétique"]));
        assert_eq!(spans(&matches), vec![(0, 1), (2, 3)]);
    }

    #[test]
    fn test_empty_pattern_is_rejected() {
        let err = Matcher::builder(MatchAttr::Norm)
            .terms("family", ["  "])
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn test_invalid_regex_is_rejected() {
        let err = Matcher::builder(MatchAttr::Text)
            .regex("noise", ["("])
            .build()
            .unwrap_err();
        assert!(matches!(err, EngineError::Pattern(_)));
    }
}
