//! Concrete annotation components
//!
//! Thin bindings of the shared engines to fixed categories and built-in
//! tables: family context, medical history, drug terminology and
//! pollution masking.

mod antecedent;
mod family;
mod pollution;
mod terminology;

pub use antecedent::AntecedentContext;
pub use family::FamilyContext;
pub use pollution::{PollutionConfig, PollutionTagger};
pub use terminology::{TerminologyConfig, TerminologyMatcher};
