//! End-to-end tests for the family context tagger

use notecue_engine::{ContextConfig, Doc, Entity, FamilyContext, Span};
use std::collections::BTreeMap;

fn clinical_words() -> Vec<&'static str> {
    vec![
        "Le", "patient", ",", "dont", "le", "père", "a", "eu", "un", "cancer", ",", "se", "sent",
        "bien", ".",
    ]
}

fn custom_config(cues: &[&str], terminations: &[&str]) -> ContextConfig {
    let mut cue_terms = BTreeMap::new();
    cue_terms.insert(
        "family".to_string(),
        cues.iter().map(|s| s.to_string()).collect(),
    );
    ContextConfig {
        cue_terms,
        termination: terminations.iter().map(|s| s.to_string()).collect(),
        explain: true,
        ..ContextConfig::default()
    }
}

#[test]
fn test_kinship_cue_qualifies_the_entity() {
    let mut doc = Doc::from_words(&clinical_words()).unwrap();
    doc.ents.push(Entity::new(Span::new(8, 10), "disease"));

    let config = ContextConfig {
        explain: true,
        ..FamilyContext::default_config()
    };
    FamilyContext::with_config(config)
        .unwrap()
        .process(&mut doc)
        .unwrap();

    assert!(doc.ents[0].family);
    assert_eq!(doc.ents[0].family_cues.len(), 1);
    assert_eq!(doc.ents[0].family_cues[0].span, Span::new(5, 6));
    assert_eq!(doc.ents[0].family_cues[0].label, "family");
    // Entities-only by default: token flags stay untouched.
    assert!(doc.tokens().iter().all(|t| !t.family));
}

#[test]
fn test_explain_off_records_no_cues() {
    let mut doc = Doc::from_words(&clinical_words()).unwrap();
    doc.ents.push(Entity::new(Span::new(8, 10), "disease"));
    FamilyContext::new().unwrap().process(&mut doc).unwrap();
    assert!(doc.ents[0].family);
    assert!(doc.ents[0].family_cues.is_empty());
}

#[test]
fn test_termination_cuts_the_cue_reach() {
    let mut doc = Doc::from_words(&clinical_words()).unwrap();
    doc.ents.push(Entity::new(Span::new(8, 10), "disease"));
    doc.ents.push(Entity::new(Span::new(12, 14), "status"));

    // "se" terminates: windows are [0, 11) and [11, 15).
    FamilyContext::with_config(custom_config(&["père"], &["se"]))
        .unwrap()
        .process(&mut doc)
        .unwrap();

    assert!(doc.ents[0].family);
    assert!(!doc.ents[1].family);
}

#[test]
fn test_no_cue_means_no_flag() {
    let mut doc = Doc::from_words(&["Le", "patient", "va", "bien", "."]).unwrap();
    doc.ents.push(Entity::new(Span::new(1, 2), "person"));
    FamilyContext::new().unwrap().process(&mut doc).unwrap();
    assert!(doc.ents.iter().all(|e| !e.family));
    assert!(doc.tokens().iter().all(|t| !t.family));
}

#[test]
fn test_entity_crossing_a_boundary_gets_a_second_chance() {
    let mut doc = Doc::from_words(&["w0", "w1", "w2", "w3", "w4", "w5"]).unwrap();
    // Crosses the boundary opened at token 2 by one token.
    doc.ents.push(Entity::new(Span::new(1, 3), "disease"));
    // Fully inside the first window.
    doc.ents.push(Entity::new(Span::new(0, 1), "other"));

    // The only cue sits in the second window, at token 4.
    FamilyContext::with_config(custom_config(&["w4"], &["w2"]))
        .unwrap()
        .process(&mut doc)
        .unwrap();

    assert!(doc.ents[0].family);
    assert_eq!(doc.ents[0].family_cues[0].span, Span::new(4, 5));
    assert!(!doc.ents[1].family);
}

#[test]
fn test_rerunning_the_tagger_changes_nothing() {
    let mut doc = Doc::from_words(&clinical_words()).unwrap();
    doc.ents.push(Entity::new(Span::new(8, 10), "disease"));

    let family = FamilyContext::with_config(ContextConfig {
        explain: true,
        entities_only: false,
        ..FamilyContext::default_config()
    })
    .unwrap();

    family.process(&mut doc).unwrap();
    let first = doc.annotations();
    let first_flags: Vec<bool> = doc.tokens().iter().map(|t| t.family).collect();

    family.process(&mut doc).unwrap();
    assert_eq!(doc.annotations(), first);
    let second_flags: Vec<bool> = doc.tokens().iter().map(|t| t.family).collect();
    assert_eq!(second_flags, first_flags);
}

#[test]
fn test_windows_without_entities_are_skipped() {
    let mut doc = Doc::from_words(&clinical_words()).unwrap();
    FamilyContext::new().unwrap().process(&mut doc).unwrap();
    // A cue is present but there is no entity to qualify.
    assert!(doc.tokens().iter().all(|t| !t.family));
}

#[test]
fn test_token_flags_when_entities_only_is_off() {
    let mut doc = Doc::from_words(&clinical_words()).unwrap();
    let config = ContextConfig {
        entities_only: false,
        ..FamilyContext::default_config()
    };
    FamilyContext::with_config(config)
        .unwrap()
        .process(&mut doc)
        .unwrap();
    // No termination term in the text: one window, every token flagged.
    assert!(doc.tokens().iter().all(|t| t.family));
    assert_eq!(doc.tokens()[0].family_label(), "FAMILY");
}

#[test]
fn test_sentence_starts_can_bound_windows() {
    let words = ["le", "père", "fume", "le", "patient", "non"];
    let mut doc = Doc::from_words(&words).unwrap();
    doc.sent_starts = vec![0, 3];
    doc.ents.push(Entity::new(Span::new(4, 5), "person"));

    // Without sentence boundaries the cue reaches the second sentence.
    FamilyContext::with_config(custom_config(&["père"], &[]))
        .unwrap()
        .process(&mut doc)
        .unwrap();
    assert!(doc.ents[0].family);

    let mut doc = Doc::from_words(&words).unwrap();
    doc.sent_starts = vec![0, 3];
    doc.ents.push(Entity::new(Span::new(4, 5), "person"));
    let config = ContextConfig {
        use_sentence_boundaries: true,
        ..custom_config(&["père"], &[])
    };
    FamilyContext::with_config(config)
        .unwrap()
        .process(&mut doc)
        .unwrap();
    assert!(!doc.ents[0].family);
}
