//! 分類(クラス階層抽出)
//!
//! 凍結された飽和結果から包含クエリと階層を導出します。出力は
//! 宣言済みの概念名に限定し、正規化で導入したフレッシュ名は除外します。
//! 決定的な順序が必要なので BTree コレクションを返します。

use crate::saturate::SaturationResult;
use crate::ElError;
use mimizuku_core::model::ConceptName;
use std::collections::{BTreeMap, BTreeSet};

/// All strict-or-equivalent subsumers of `name`: S(X) \ {X}, restricted to
/// declared names (⊤ included)
///
/// Fails with [`ElError::UnknownConcept`] if `name` was never declared.
pub fn subsumers(
    result: &SaturationResult,
    name: &ConceptName,
) -> Result<BTreeSet<ConceptName>, ElError> {
    if !result.is_declared(name) {
        return Err(ElError::UnknownConcept(name.clone()));
    }
    let Some(labels) = result.label_set(name) else {
        // Declared names are always seeded; an empty set is the safe answer
        return Ok(BTreeSet::new());
    };
    Ok(labels
        .iter()
        .filter(|n| *n != name && result.is_declared(n))
        .cloned()
        .collect())
}

/// All declared names subsumed by `name` (the inverse view of `subsumers`)
pub fn subsumees(
    result: &SaturationResult,
    name: &ConceptName,
) -> Result<BTreeSet<ConceptName>, ElError> {
    if !result.is_declared(name) {
        return Err(ElError::UnknownConcept(name.clone()));
    }
    Ok(result
        .declared()
        .iter()
        .filter(|candidate| *candidate != name && result.contains(candidate, name))
        .cloned()
        .collect())
}

/// Full classification: every declared concept name mapped to its subsumers
pub fn classify(result: &SaturationResult) -> BTreeMap<ConceptName, BTreeSet<ConceptName>> {
    result
        .declared()
        .iter()
        .map(|name| {
            let supers = subsumers(result, name).unwrap_or_default();
            (name.clone(), supers)
        })
        .collect()
}

/// Direct parents of `name`: the minimal elements of its subsumer set
///
/// A parent P is redundant when another parent Q lies strictly between:
/// `P ∈ S(Q)` and `Q ∉ S(P)`. Mutually equivalent parents are all minimal
/// and are all kept.
pub fn direct_parents(
    result: &SaturationResult,
    name: &ConceptName,
) -> Result<BTreeSet<ConceptName>, ElError> {
    let candidates = subsumers(result, name)?;
    Ok(candidates
        .iter()
        .filter(|p| {
            !candidates.iter().any(|q| {
                q != *p && result.contains(q, p) && !result.contains(p, q)
            })
        })
        .cloned()
        .collect())
}

/// Classification with transitive-redundancy pruning: every declared name
/// mapped to its direct parents only
pub fn classify_direct(result: &SaturationResult) -> BTreeMap<ConceptName, BTreeSet<ConceptName>> {
    result
        .declared()
        .iter()
        .map(|name| {
            let parents = direct_parents(result, name).unwrap_or_default();
            (name.clone(), parents)
        })
        .collect()
}

/// Group declared names by mutual subsumption: X and Y share a class iff
/// `X ∈ S(Y)` and `Y ∈ S(X)`
pub fn equivalence_classes(result: &SaturationResult) -> Vec<BTreeSet<ConceptName>> {
    let mut classes: BTreeSet<BTreeSet<ConceptName>> = BTreeSet::new();
    for name in result.declared() {
        let class: BTreeSet<ConceptName> = result
            .declared()
            .iter()
            .filter(|other| result.contains(name, other) && result.contains(other, name))
            .cloned()
            .collect();
        classes.insert(class);
    }
    classes.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use crate::saturate::saturate;
    use mimizuku_core::model::{Axiom, InternedConcept, Ontology};

    fn name(s: &str) -> InternedConcept {
        InternedConcept::name(format!("http://example.org/{}", s))
    }

    fn cname(s: &str) -> ConceptName {
        ConceptName::new(format!("http://example.org/{}", s))
    }

    fn saturated(axioms: Vec<Axiom>) -> SaturationResult {
        saturate(&normalize(&Ontology::from_axioms(axioms)).unwrap())
    }

    fn chain() -> SaturationResult {
        saturated(vec![
            Axiom::SubConceptOf(name("Mother"), name("Parent")),
            Axiom::SubConceptOf(name("Parent"), name("Person")),
        ])
    }

    #[test]
    fn test_subsumers_exclude_self_include_top() {
        let result = chain();
        let supers = subsumers(&result, &cname("Mother")).unwrap();

        let expected: BTreeSet<ConceptName> =
            [cname("Parent"), cname("Person"), ConceptName::top()]
                .into_iter()
                .collect();
        assert_eq!(supers, expected);
    }

    #[test]
    fn test_subsumees_inverse_view() {
        let result = chain();
        let subs = subsumees(&result, &cname("Person")).unwrap();

        let expected: BTreeSet<ConceptName> =
            [cname("Mother"), cname("Parent")].into_iter().collect();
        assert_eq!(subs, expected);
    }

    #[test]
    fn test_unknown_concept_rejected() {
        let result = chain();
        let missing = cname("Nonexistent");
        assert!(matches!(
            subsumers(&result, &missing),
            Err(ElError::UnknownConcept(n)) if n == missing
        ));
    }

    #[test]
    fn test_fresh_names_filtered_from_results() {
        // Ternary conjunction forces a fresh intermediate name
        let result = saturated(vec![Axiom::SubConceptOf(
            InternedConcept::conjunction(vec![name("A"), name("B"), name("C")]),
            name("D"),
        )]);

        for (concept, supers) in classify(&result) {
            assert!(!concept.as_str().starts_with("urn:mimizuku:norm#"));
            for parent in supers {
                assert!(!parent.as_str().starts_with("urn:mimizuku:norm#"));
            }
        }
    }

    #[test]
    fn test_direct_parents_prune_transitive_edges() {
        let result = chain();

        let mother_parents = direct_parents(&result, &cname("Mother")).unwrap();
        let expected: BTreeSet<ConceptName> = [cname("Parent")].into_iter().collect();
        assert_eq!(mother_parents, expected);

        // Person has no named parent, so only ⊤ remains
        let person_parents = direct_parents(&result, &cname("Person")).unwrap();
        let top_only: BTreeSet<ConceptName> = [ConceptName::top()].into_iter().collect();
        assert_eq!(person_parents, top_only);
    }

    #[test]
    fn test_equivalent_parents_both_kept() {
        let result = saturated(vec![
            Axiom::SubConceptOf(name("X"), name("A")),
            Axiom::SubConceptOf(name("A"), name("B")),
            Axiom::SubConceptOf(name("B"), name("A")),
        ]);

        let parents = direct_parents(&result, &cname("X")).unwrap();
        assert!(parents.contains(&cname("A")));
        assert!(parents.contains(&cname("B")));
        assert!(!parents.contains(&ConceptName::top()));
    }

    #[test]
    fn test_equivalence_classes_group_mutual_subsumption() {
        let result = saturated(vec![
            Axiom::SubConceptOf(name("A"), name("B")),
            Axiom::SubConceptOf(name("B"), name("A")),
            Axiom::SubConceptOf(name("C"), name("A")),
        ]);

        let classes = equivalence_classes(&result);
        let ab: BTreeSet<ConceptName> = [cname("A"), cname("B")].into_iter().collect();
        let c: BTreeSet<ConceptName> = [cname("C")].into_iter().collect();
        assert!(classes.contains(&ab));
        assert!(classes.contains(&c));
    }
}
