//! EL リーズナー
//!
//! 正規化・飽和・クエリをまとめたファサード。状態はこの値が明示的に
//! 保持し、グローバルなセッションは持ちません。

use crate::classify;
use crate::normalize::{normalize, NormalizedTBox};
use crate::saturate::{saturate, SaturationResult};
use crate::ElError;
use mimizuku_core::model::{Axiom, ConceptName, InternedConcept, Ontology};
use std::collections::{BTreeMap, BTreeSet};
use tracing::info;

/// EL subsumption reasoner
///
/// Load an ontology once with [`ElReasoner::set_ontology`]; all queries
/// afterwards are read-only against the frozen saturation state.
#[derive(Debug, Default)]
pub struct ElReasoner {
    tbox: Option<NormalizedTBox>,
    result: Option<SaturationResult>,
}

impl ElReasoner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize and saturate an ontology, replacing any previous state.
    ///
    /// All-or-nothing: on error the previously loaded ontology (if any)
    /// stays queryable.
    pub fn set_ontology(&mut self, ontology: &Ontology) -> Result<(), ElError> {
        let tbox = normalize(ontology)?;
        let result = saturate(&tbox);
        info!(
            axioms = tbox.axioms().len(),
            concepts = result.declared().len(),
            facts = result.facts_inserted(),
            "ontology saturated"
        );
        self.tbox = Some(tbox);
        self.result = Some(result);
        Ok(())
    }

    /// The normal-form TBox of the loaded ontology
    pub fn tbox(&self) -> Option<&NormalizedTBox> {
        self.tbox.as_ref()
    }

    /// The frozen saturation state of the loaded ontology
    pub fn saturation(&self) -> Option<&SaturationResult> {
        self.result.as_ref()
    }

    fn result(&self) -> Result<&SaturationResult, ElError> {
        self.result
            .as_ref()
            .ok_or_else(|| ElError::ReasoningError("no ontology loaded".to_string()))
    }

    /// All subsumers of `name` (⊤ included, `name` itself excluded)
    pub fn get_subsumers(&self, name: &ConceptName) -> Result<BTreeSet<ConceptName>, ElError> {
        classify::subsumers(self.result()?, name)
    }

    /// All declared concepts subsumed by `name`
    pub fn get_subsumees(&self, name: &ConceptName) -> Result<BTreeSet<ConceptName>, ElError> {
        classify::subsumees(self.result()?, name)
    }

    /// Whether `a ⊑ b`, i.e. `b ∈ S(a)`
    pub fn is_subsumed_by(&self, a: &ConceptName, b: &ConceptName) -> Result<bool, ElError> {
        let result = self.result()?;
        if !result.is_declared(a) {
            return Err(ElError::UnknownConcept(a.clone()));
        }
        if !result.is_declared(b) {
            return Err(ElError::UnknownConcept(b.clone()));
        }
        Ok(result.contains(a, b))
    }

    /// Every declared concept name mapped to its full subsumer set
    pub fn classify(&self) -> Result<BTreeMap<ConceptName, BTreeSet<ConceptName>>, ElError> {
        Ok(classify::classify(self.result()?))
    }

    /// Every declared concept name mapped to its direct parents only
    pub fn classify_direct(
        &self,
    ) -> Result<BTreeMap<ConceptName, BTreeSet<ConceptName>>, ElError> {
        Ok(classify::classify_direct(self.result()?))
    }

    /// Groups of mutually subsuming concept names
    pub fn equivalence_classes(&self) -> Result<Vec<BTreeSet<ConceptName>>, ElError> {
        Ok(classify::equivalence_classes(self.result()?))
    }

    /// Entailed subsumption axioms between declared names (closure of the
    /// ontology, self-subsumptions omitted)
    pub fn inferred_axioms(&self) -> Result<Vec<Axiom>, ElError> {
        let result = self.result()?;
        let mut inferred = Vec::new();
        for (concept, supers) in classify::classify(result) {
            for superconcept in supers {
                inferred.push(Axiom::SubConceptOf(
                    InternedConcept::from(concept.clone()),
                    InternedConcept::from(superconcept),
                ));
            }
        }
        Ok(inferred)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(s: &str) -> InternedConcept {
        InternedConcept::name(format!("http://example.org/{}", s))
    }

    fn cname(s: &str) -> ConceptName {
        ConceptName::new(format!("http://example.org/{}", s))
    }

    fn family_reasoner() -> ElReasoner {
        let ontology = Ontology::from_axioms(vec![
            Axiom::SubConceptOf(name("Mother"), name("Parent")),
            Axiom::SubConceptOf(name("Parent"), name("Person")),
        ]);
        let mut reasoner = ElReasoner::new();
        reasoner.set_ontology(&ontology).unwrap();
        reasoner
    }

    #[test]
    fn test_query_before_load_is_an_error() {
        let reasoner = ElReasoner::new();
        assert!(matches!(
            reasoner.get_subsumers(&cname("A")),
            Err(ElError::ReasoningError(_))
        ));
    }

    #[test]
    fn test_subsumers_query() {
        let reasoner = family_reasoner();
        let supers = reasoner.get_subsumers(&cname("Mother")).unwrap();
        assert!(supers.contains(&cname("Parent")));
        assert!(supers.contains(&cname("Person")));
        assert!(supers.contains(&ConceptName::top()));
        assert!(!supers.contains(&cname("Mother")));
    }

    #[test]
    fn test_is_subsumed_by() {
        let reasoner = family_reasoner();
        assert!(reasoner
            .is_subsumed_by(&cname("Mother"), &cname("Person"))
            .unwrap());
        assert!(!reasoner
            .is_subsumed_by(&cname("Person"), &cname("Mother"))
            .unwrap());
        assert!(matches!(
            reasoner.is_subsumed_by(&cname("Ghost"), &cname("Person")),
            Err(ElError::UnknownConcept(_))
        ));
    }

    #[test]
    fn test_failed_reload_keeps_previous_state() {
        let mut reasoner = family_reasoner();
        let broken = Ontology::from_axioms(vec![Axiom::SubConceptOf(
            InternedConcept::conjunction(vec![]),
            name("A"),
        )]);

        assert!(reasoner.set_ontology(&broken).is_err());
        // The family ontology is still queryable
        assert!(reasoner
            .is_subsumed_by(&cname("Mother"), &cname("Parent"))
            .unwrap());
    }

    #[test]
    fn test_inferred_axioms_contain_transitive_edge() {
        let reasoner = family_reasoner();
        let inferred = reasoner.inferred_axioms().unwrap();
        assert!(inferred.contains(&Axiom::SubConceptOf(
            name("Mother"),
            name("Person")
        )));
        // No self-subsumptions
        assert!(!inferred.contains(&Axiom::SubConceptOf(
            name("Mother"),
            name("Mother")
        )));
    }
}
