//! オントロジーローダーとフォーマッター
//!
//! 外部表現とモデルの境界。パーサー本体はこのクレートの範囲外なので、
//! ローダーはトレイトとして公開し、具象実装は呼び出し側が差し込みます。

use crate::ElError;
use mimizuku_core::model::{Axiom, Concept, InternedConcept, Ontology};

/// Ontology loader trait
///
/// Implementors parse some external representation into an [`Ontology`].
pub trait OntologyLoader {
    fn load(&self, source: &str) -> Result<Ontology, ElError>;
}

/// Concept and axiom rendering trait
pub trait ConceptFormatter {
    fn format_concept(&self, concept: &InternedConcept) -> String;

    fn format_axiom(&self, axiom: &Axiom) -> String {
        match axiom {
            Axiom::SubConceptOf(lhs, rhs) => format!(
                "{} ⊑ {}",
                self.format_concept(lhs),
                self.format_concept(rhs)
            ),
            Axiom::EquivalentConcepts(concepts) => concepts
                .iter()
                .map(|c| self.format_concept(c))
                .collect::<Vec<_>>()
                .join(" ≡ "),
        }
    }
}

/// DL-syntax formatter using the fragment of an IRI after `#` or the last `/`
#[derive(Debug, Default)]
pub struct DlFormatter;

impl DlFormatter {
    fn local_name(iri: &str) -> &str {
        iri.rsplit(['#', '/']).next().unwrap_or(iri)
    }
}

impl ConceptFormatter for DlFormatter {
    fn format_concept(&self, concept: &InternedConcept) -> String {
        match concept.as_concept() {
            Concept::Top => "⊤".to_string(),
            Concept::Name(name) => Self::local_name(name.as_str()).to_string(),
            Concept::Conjunction(operands) => {
                let parts: Vec<String> =
                    operands.iter().map(|c| self.format_concept(c)).collect();
                format!("({})", parts.join(" ⊓ "))
            }
            Concept::Existential { role, filler } => format!(
                "∃{}.{}",
                Self::local_name(role.as_str()),
                self.format_concept(filler)
            ),
        }
    }
}
