//! Built-in French pattern tables
//!
//! Seed lists for the clinical components. Deliberately compact:
//! terminology curation belongs to the host, and every table can be
//! replaced or extended through the component configurations.

use std::collections::BTreeMap;

fn owned(terms: &[&str]) -> Vec<String> {
    terms.iter().map(|t| t.to_string()).collect()
}

/// Termination terms closing a boundary window: adversative and causal
/// connectors after which a cue no longer applies.
pub fn termination() -> Vec<String> {
    owned(&[
        "mais",
        "cependant",
        "néanmoins",
        "toutefois",
        "pourtant",
        "en revanche",
        "par contre",
        "malgré",
        "malgré tout",
        "sauf",
        "hormis",
        "en dehors de",
        "alors que",
        "tandis que",
        "bien que",
        "quoique",
        "sinon",
        "donc",
        "du coup",
        "par conséquent",
        "car",
        "puisque",
        "parce que",
        "en raison de",
        "du fait de",
    ])
}

/// Kinship terms acting as family cues.
pub fn family() -> Vec<String> {
    owned(&[
        "père",
        "pere",
        "mère",
        "mere",
        "papa",
        "maman",
        "frère",
        "frere",
        "frères",
        "sœur",
        "soeur",
        "sœurs",
        "soeurs",
        "fratrie",
        "grand-père",
        "grand-mère",
        "grands-parents",
        "oncle",
        "tante",
        "cousin",
        "cousine",
        "neveu",
        "nièce",
        "fils",
        "fille",
        "enfant",
        "enfants",
        "jumeau",
        "jumelle",
        "parents",
        "famille",
        "familial",
        "familiale",
        "familiaux",
        "familiales",
    ])
}

/// Temporal markers acting as medical-history cues.
pub fn antecedents() -> Vec<String> {
    owned(&[
        "antécédent",
        "antécédents",
        "atcd",
        "atcds",
        "histoire de",
        "ancien",
        "ancienne",
        "anciens",
        "anciennes",
        "il y a",
        "à l'âge de",
        "dans l'enfance",
        "dans sa jeunesse",
        "opéré de",
        "opérée de",
    ])
}

/// Regex patterns acting as medical-history cues, e.g. year mentions.
pub fn antecedents_regex() -> Vec<String> {
    vec![r"(?i)\ben (?:19|20)\d\d\b".to_string()]
}

/// Drug synonym table: canonical concept to its French names and common
/// brand names. Matched lowercase.
pub fn drugs() -> BTreeMap<String, Vec<String>> {
    let table: &[(&str, &[&str])] = &[
        (
            "paracetamol",
            &["paracétamol", "paracetamol", "doliprane", "dafalgan", "efferalgan"],
        ),
        (
            "aspirin",
            &["aspirine", "acide acétylsalicylique", "aspégic", "kardégic"],
        ),
        ("ibuprofen", &["ibuprofène", "ibuprofene", "advil", "nurofen"]),
        ("amoxicillin", &["amoxicilline", "clamoxyl", "augmentin"]),
        ("metformin", &["metformine", "glucophage", "stagid"]),
        ("warfarin", &["warfarine", "coumadine"]),
        ("insulin", &["insuline", "lantus", "levemir", "novorapid"]),
        ("salbutamol", &["salbutamol", "ventoline"]),
        ("omeprazole", &["oméprazole", "omeprazole", "mopral"]),
        ("atorvastatin", &["atorvastatine", "tahor"]),
        ("levothyroxine", &["lévothyroxine", "levothyrox"]),
        ("tramadol", &["tramadol", "topalgic", "contramal"]),
    ];
    table
        .iter()
        .map(|(concept, names)| (concept.to_string(), owned(names)))
        .collect()
}

/// Pollution regex patterns by category.
///
/// Categories map to recurring template noise in hospital exports; see
/// [`default_pollution_enabled`] for the ones active out of the box.
pub fn pollution() -> BTreeMap<String, Vec<String>> {
    let table: &[(&str, &[&str])] = &[
        (
            "information",
            &[r"(?i)information au patient[^\n]*", r"(?i)document (?:généré|établi) automatiquement[^\n]*"],
        ),
        ("bars", &[r"(?:[|_=–—-]\s*){5,}"]),
        ("spaces", &[r"[\x{A0}\x{2007}\x{202F}]{2,}"]),
        ("web", &[r"(?i)(?:https?://|www\.)\S+"]),
        (
            "footer",
            &[r"(?im)^page \d+(?: ?/ ?\d+| sur \d+)[^\n]*$"],
        ),
        (
            "biology",
            &[r"(?i)(?:\d+[.,]?\d* ?(?:g/l|mg/l|mmol/l|µmol/l|ui/l|%)[ ;,]*){3,}"],
        ),
        (
            "coding",
            &[r"(?i)codage(?: cim[- ]?10)? ?:[^\n]*"],
        ),
    ];
    table
        .iter()
        .map(|(category, patterns)| (category.to_string(), owned(patterns)))
        .collect()
}

/// Pollution categories active by default.
pub fn default_pollution_enabled() -> BTreeMap<String, bool> {
    [
        ("information", true),
        ("bars", true),
        ("spaces", true),
        ("web", true),
        ("footer", true),
        ("biology", false),
        ("coding", false),
    ]
    .into_iter()
    .map(|(category, enabled)| (category.to_string(), enabled))
    .collect()
}
