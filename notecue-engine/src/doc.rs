//! Document model: tokens, entities and named span groups
//!
//! The host pipeline tokenizes the text and proposes candidate entities;
//! this module owns them for the duration of an annotation run. Qualifier
//! flags are statically declared fields on [`Token`] and [`Entity`], not
//! runtime-registered attributes, so a flag read is a plain field access.

use crate::error::{EngineError, Result};
use notecue_core::{Labeled, Span, SpanError, Spanned};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Span group holding entities displaced by overlap filtering.
pub const DISCARDED: &str = "discarded";
/// Span group holding host-supplied section spans.
pub const SECTIONS: &str = "sections";
/// Span group holding detected pollution spans.
pub const POLLUTIONS: &str = "pollutions";

/// The qualifier dimension a context tagger writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContextKind {
    /// Family-member context: the statement concerns a relative.
    Family,
    /// Medical-history context: the statement concerns the patient's past.
    History,
}

impl ContextKind {
    /// Label rendered when the flag is set.
    pub const fn set_label(self) -> &'static str {
        match self {
            ContextKind::Family => "FAMILY",
            ContextKind::History => "ATCD",
        }
    }

    /// Label rendered when the flag is clear.
    pub const fn clear_label(self) -> &'static str {
        match self {
            ContextKind::Family => "PATIENT",
            ContextKind::History => "CURRENT",
        }
    }
}

/// A single token supplied by the host tokenizer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Position in the token sequence.
    pub i: usize,
    /// Character offset of the first character, inclusive.
    pub start: usize,
    /// Character offset one past the last character.
    pub end: usize,
    /// Surface form.
    pub text: String,
    /// Normalized form; defaults to the lowercased surface.
    pub norm: String,
    /// Set by the pollution tagger; matchers configured to ignore excluded
    /// regions skip these tokens.
    pub excluded: bool,
    /// Family-context flag.
    pub family: bool,
    /// History-context flag.
    pub history: bool,
}

impl Token {
    /// Reads the flag for a qualifier dimension.
    pub fn context(&self, kind: ContextKind) -> bool {
        match kind {
            ContextKind::Family => self.family,
            ContextKind::History => self.history,
        }
    }

    fn set_context(&mut self, kind: ContextKind) {
        match kind {
            ContextKind::Family => self.family = true,
            ContextKind::History => self.history = true,
        }
    }

    /// String view of a qualifier flag, e.g. `"FAMILY"` or `"PATIENT"`.
    pub fn context_label(&self, kind: ContextKind) -> &'static str {
        if self.context(kind) {
            kind.set_label()
        } else {
            kind.clear_label()
        }
    }

    /// String view of the family flag.
    pub fn family_label(&self) -> &'static str {
        self.context_label(ContextKind::Family)
    }

    /// String view of the history flag.
    pub fn history_label(&self) -> &'static str {
        self.context_label(ContextKind::History)
    }
}

/// A matched span recorded on an entity to explain why a flag was set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cue {
    /// Token range of the cue.
    pub span: Span,
    /// Category that produced it: a cue category such as `"family"`, or a
    /// section label.
    pub label: String,
}

/// A labeled token span carrying its qualifier annotations.
///
/// The extent and label are fixed at construction; taggers only ever touch
/// the flags and the cue lists.
#[derive(Debug, Clone)]
pub struct Entity {
    span: Span,
    label: String,
    /// Canonical concept for terminology hits, e.g. the drug a brand name
    /// resolved to.
    pub concept: Option<String>,
    /// Family-context flag.
    pub family: bool,
    /// History-context flag.
    pub history: bool,
    /// Cues responsible for the family flag, in tagging order.
    pub family_cues: SmallVec<[Cue; 2]>,
    /// Cues responsible for the history flag, in tagging order.
    pub history_cues: SmallVec<[Cue; 2]>,
}

impl Entity {
    /// Creates an unflagged entity over `span`.
    pub fn new(span: Span, label: impl Into<String>) -> Self {
        Self {
            span,
            label: label.into(),
            concept: None,
            family: false,
            history: false,
            family_cues: SmallVec::new(),
            history_cues: SmallVec::new(),
        }
    }

    /// Attaches a canonical concept.
    pub fn with_concept(mut self, concept: impl Into<String>) -> Self {
        self.concept = Some(concept.into());
        self
    }

    /// The token range covered.
    pub fn span(&self) -> Span {
        self.span
    }

    /// The entity label.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Reads the flag for a qualifier dimension.
    pub fn context(&self, kind: ContextKind) -> bool {
        match kind {
            ContextKind::Family => self.family,
            ContextKind::History => self.history,
        }
    }

    /// String view of a qualifier flag, e.g. `"FAMILY"` or `"PATIENT"`.
    pub fn context_label(&self, kind: ContextKind) -> &'static str {
        if self.context(kind) {
            kind.set_label()
        } else {
            kind.clear_label()
        }
    }

    /// The cues recorded for a qualifier dimension.
    pub fn cues(&self, kind: ContextKind) -> &[Cue] {
        match kind {
            ContextKind::Family => &self.family_cues,
            ContextKind::History => &self.history_cues,
        }
    }

    pub(crate) fn set_context(&mut self, kind: ContextKind) {
        match kind {
            ContextKind::Family => self.family = true,
            ContextKind::History => self.history = true,
        }
    }

    /// Appends a cue unless an identical one is already recorded, so a
    /// rerun of the same tagger leaves the entity unchanged.
    pub(crate) fn push_cue(&mut self, kind: ContextKind, cue: Cue) {
        let cues = match kind {
            ContextKind::Family => &mut self.family_cues,
            ContextKind::History => &mut self.history_cues,
        };
        if !cues.contains(&cue) {
            cues.push(cue);
        }
    }
}

impl Spanned for Entity {
    fn span(&self) -> Span {
        self.span
    }
}

impl Labeled for Entity {
    fn label(&self) -> &str {
        &self.label
    }
}

/// Which collection an entity lives in during a tagging run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum EntitySlot {
    /// `doc.ents`.
    Primary,
    /// The `"discarded"` span group.
    Discarded,
}

/// A pre-tokenized document with its annotations.
#[derive(Debug, Clone, Default)]
pub struct Doc {
    text: String,
    tokens: Vec<Token>,
    /// Byte range of each token, aligned with `tokens`.
    token_bytes: Vec<(usize, usize)>,
    /// Primary entity collection.
    pub ents: Vec<Entity>,
    /// Named span groups: [`DISCARDED`], [`SECTIONS`], [`POLLUTIONS`] and
    /// any terminology label.
    pub spans: HashMap<String, Vec<Entity>>,
    /// Host-supplied sentence start token indices; empty when unknown.
    pub sent_starts: Vec<usize>,
    /// Document-level family summary. The taggers leave it empty; it
    /// belongs to downstream consumers aggregating tagged entities.
    pub family_summary: Vec<Entity>,
    /// Document-level history summary, likewise consumer-owned.
    pub history_summary: Vec<Entity>,
}

impl Doc {
    /// Starts building a document over `text`.
    pub fn builder(text: impl Into<String>) -> DocBuilder {
        DocBuilder::new(text)
    }

    /// Builds a document from whitespace-joined words.
    ///
    /// Convenient for hosts and tests that already hold a token list; each
    /// word becomes one token with consistent character offsets.
    pub fn from_words<S: AsRef<str>>(words: &[S]) -> Result<Self> {
        let text = words
            .iter()
            .map(|w| w.as_ref())
            .collect::<Vec<_>>()
            .join(" ");
        let mut builder = DocBuilder::new(text);
        let mut start = 0;
        for word in words {
            let word = word.as_ref();
            builder = builder.token(word, start);
            start += word.chars().count() + 1;
        }
        builder.build()
    }

    /// The raw text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of tokens.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    /// True when the document has no tokens.
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// The token sequence.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// One token by position.
    pub fn token(&self, i: usize) -> &Token {
        &self.tokens[i]
    }

    /// The text slice covered by a token span; empty for an empty span.
    pub fn span_text(&self, span: Span) -> &str {
        if span.is_empty() || span.end > self.tokens.len() {
            return "";
        }
        let start = self.token_bytes[span.start].0;
        let end = self.token_bytes[span.end - 1].1;
        &self.text[start..end]
    }

    /// The entities displaced into the discarded group, if any.
    pub fn discarded(&self) -> &[Entity] {
        self.spans.get(DISCARDED).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Smallest token span covering the byte range `[start, end)`, or
    /// `None` when the range touches no token.
    pub(crate) fn token_span_for_bytes(&self, start: usize, end: usize) -> Option<Span> {
        let first = self.token_bytes.partition_point(|&(_, e)| e <= start);
        let last = self.token_bytes.partition_point(|&(s, _)| s < end);
        if first < last {
            Some(Span::new(first, last))
        } else {
            None
        }
    }

    /// Sets the qualifier flag on every token in `[start, end)`.
    pub(crate) fn mark_tokens(&mut self, start: usize, end: usize, kind: ContextKind) {
        let end = end.min(self.tokens.len());
        for token in &mut self.tokens[start..end] {
            token.set_context(kind);
        }
    }

    /// Marks every token in the span as excluded.
    pub(crate) fn mark_excluded(&mut self, span: Span) {
        let end = span.end.min(self.tokens.len());
        for token in &mut self.tokens[span.start..end] {
            token.excluded = true;
        }
    }

    /// Handles to every candidate entity: the primary collection first,
    /// then the discarded group, each in stored order.
    pub(crate) fn entity_slots(&self) -> Vec<(EntitySlot, usize, Span)> {
        let primary = self
            .ents
            .iter()
            .enumerate()
            .map(|(i, e)| (EntitySlot::Primary, i, e.span()));
        let discarded = self
            .discarded()
            .iter()
            .enumerate()
            .map(|(i, e)| (EntitySlot::Discarded, i, e.span()));
        primary.chain(discarded).collect()
    }

    /// Mutable access to an entity through its slot handle.
    pub(crate) fn entity_mut(&mut self, slot: EntitySlot, index: usize) -> Option<&mut Entity> {
        match slot {
            EntitySlot::Primary => self.ents.get_mut(index),
            EntitySlot::Discarded => self.spans.get_mut(DISCARDED)?.get_mut(index),
        }
    }
}

/// Builder validating the host-supplied token stream.
///
/// Tokens must arrive in document order with non-overlapping character
/// ranges; entity and section spans must be non-empty token ranges inside
/// the document. [`DocBuilder::build`] rejects anything else with
/// [`SpanError::InvalidSpanOrder`].
#[derive(Debug, Default)]
pub struct DocBuilder {
    text: String,
    tokens: Vec<Token>,
    ents: Vec<(Span, String)>,
    sections: Vec<(Span, String)>,
    sent_starts: Vec<usize>,
}

impl DocBuilder {
    /// Starts a builder over `text`.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }

    /// Appends a token whose surface starts at character `start`.
    ///
    /// The normalized form defaults to the lowercased surface; see
    /// [`DocBuilder::token_with_norm`] to supply one.
    pub fn token(self, text: &str, start: usize) -> Self {
        let norm = text.to_lowercase();
        self.token_with_norm(text, start, norm)
    }

    /// Appends a token with an explicit normalized form.
    pub fn token_with_norm(mut self, text: &str, start: usize, norm: impl Into<String>) -> Self {
        let end = start + text.chars().count();
        self.tokens.push(Token {
            i: self.tokens.len(),
            start,
            end,
            text: text.to_string(),
            norm: norm.into(),
            excluded: false,
            family: false,
            history: false,
        });
        self
    }

    /// Declares a candidate entity over the token range `[start, end)`.
    pub fn entity(mut self, start: usize, end: usize, label: impl Into<String>) -> Self {
        self.ents.push((Span { start, end }, label.into()));
        self
    }

    /// Declares a labeled section over the token range `[start, end)`.
    pub fn section(mut self, start: usize, end: usize, label: impl Into<String>) -> Self {
        self.sections.push((Span { start, end }, label.into()));
        self
    }

    /// Declares the sentence start token indices.
    pub fn sentence_starts(mut self, starts: impl IntoIterator<Item = usize>) -> Self {
        self.sent_starts.extend(starts);
        self
    }

    /// Validates the token stream and assembles the document.
    pub fn build(self) -> Result<Doc> {
        let char_count = self.text.chars().count();
        let mut previous_end = 0;
        for token in &self.tokens {
            if token.start >= token.end || token.start < previous_end || token.end > char_count {
                return Err(EngineError::Span(SpanError::InvalidSpanOrder {
                    position: token.i,
                }));
            }
            previous_end = token.end;
        }

        let token_count = self.tokens.len();
        for (span, _) in self.ents.iter().chain(self.sections.iter()) {
            if span.start >= span.end || span.end > token_count {
                return Err(EngineError::Span(SpanError::InvalidSpanOrder {
                    position: span.start,
                }));
            }
        }
        for &start in &self.sent_starts {
            if start >= token_count {
                return Err(EngineError::Span(SpanError::InvalidSpanOrder {
                    position: start,
                }));
            }
        }

        // Character offset -> byte offset, with a sentinel for the end.
        let mut byte_of_char: Vec<usize> = Vec::with_capacity(char_count + 1);
        byte_of_char.extend(self.text.char_indices().map(|(b, _)| b));
        byte_of_char.push(self.text.len());

        let token_bytes = self
            .tokens
            .iter()
            .map(|t| (byte_of_char[t.start], byte_of_char[t.end]))
            .collect();

        let mut spans: HashMap<String, Vec<Entity>> = HashMap::new();
        if !self.sections.is_empty() {
            spans.insert(
                SECTIONS.to_string(),
                self.sections
                    .into_iter()
                    .map(|(span, label)| Entity::new(span, label))
                    .collect(),
            );
        }

        Ok(Doc {
            text: self.text,
            tokens: self.tokens,
            token_bytes,
            ents: self
                .ents
                .into_iter()
                .map(|(span, label)| Entity::new(span, label))
                .collect(),
            spans,
            sent_starts: self.sent_starts,
            family_summary: Vec::new(),
            history_summary: Vec::new(),
        })
    }
}
