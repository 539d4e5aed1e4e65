//! EL 飽和アルゴリズム
//!
//! 補完規則による不動点計算:
//! - R1: N ∈ S(X), N ⊑ M ⟹ M ∈ S(X)
//! - R2: A, B ∈ S(X), A ⊓ B ⊑ C ⟹ C ∈ S(X)
//! - R3: N ∈ S(X), N ⊑ ∃r.M ⟹ (X, r, M) ∈ R
//! - R4: (X, r, Y) ∈ R, N ∈ S(Y), ∃r.N ⊑ B ⟹ B ∈ S(X)
//!
//! ラベル集合と後続関係は単調に増加し、状態空間が有限なので
//! 多項式時間で停止します。

use crate::index::AxiomIndex;
use crate::normalize::NormalizedTBox;
use mimizuku_core::model::{ConceptName, RoleName};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};
use tracing::debug;

/// A newly derived fact pending propagation
enum Fact {
    /// `n` entered S(`x`)
    Subsumption { x: ConceptName, n: ConceptName },
    /// Edge (`x`, `role`, `y`) entered the successor relation
    Link {
        x: ConceptName,
        role: RoleName,
        y: ConceptName,
    },
}

/// Frozen output of one saturation run
///
/// Holds the complete label sets S(X) and the successor relation R.
/// No mutating API is exposed; a new ontology requires a new run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaturationResult {
    labels: HashMap<ConceptName, HashSet<ConceptName>>,
    successors: HashMap<ConceptName, HashMap<RoleName, HashSet<ConceptName>>>,
    declared: BTreeSet<ConceptName>,
    facts_inserted: usize,
}

impl SaturationResult {
    /// The complete label set S(X), including X itself and ⊤
    pub fn label_set(&self, name: &ConceptName) -> Option<&HashSet<ConceptName>> {
        self.labels.get(name)
    }

    /// Whether `b ∈ S(a)`
    pub fn contains(&self, a: &ConceptName, b: &ConceptName) -> bool {
        self.labels.get(a).map(|s| s.contains(b)).unwrap_or(false)
    }

    pub fn labels(&self) -> &HashMap<ConceptName, HashSet<ConceptName>> {
        &self.labels
    }

    pub fn successors(&self) -> &HashMap<ConceptName, HashMap<RoleName, HashSet<ConceptName>>> {
        &self.successors
    }

    /// Names declared in the raw ontology (fresh normalization names excluded)
    pub fn declared(&self) -> &BTreeSet<ConceptName> {
        &self.declared
    }

    pub fn is_declared(&self, name: &ConceptName) -> bool {
        self.declared.contains(name)
    }

    /// Total number of set/relation insertions performed until fixpoint
    pub fn facts_inserted(&self) -> usize {
        self.facts_inserted
    }
}

/// Saturate a normal-form TBox until no completion rule adds a new fact
///
/// Never fails on a TBox produced by [`crate::normalize::normalize`].
pub fn saturate(tbox: &NormalizedTBox) -> SaturationResult {
    let index = AxiomIndex::build(tbox);
    let mut engine = Engine {
        index: &index,
        labels: HashMap::new(),
        successors: HashMap::new(),
        predecessors: HashMap::new(),
        queue: VecDeque::new(),
        facts_inserted: 0,
    };

    // Seed S(X) = {X, ⊤} for every name in the normalized signature
    for name in tbox.all_names() {
        engine.add_subsumption(name.clone(), name.clone());
        engine.add_subsumption(name.clone(), ConceptName::top());
    }

    while let Some(fact) = engine.queue.pop_front() {
        match fact {
            Fact::Subsumption { x, n } => engine.propagate_subsumption(x, n),
            Fact::Link { x, role, y } => engine.propagate_link(x, role, y),
        }
    }

    debug!(
        names = tbox.all_names().len(),
        facts = engine.facts_inserted,
        "saturation reached fixpoint"
    );

    SaturationResult {
        labels: engine.labels,
        successors: engine.successors,
        declared: tbox.declared().clone(),
        facts_inserted: engine.facts_inserted,
    }
}

struct Engine<'a> {
    index: &'a AxiomIndex,
    labels: HashMap<ConceptName, HashSet<ConceptName>>,
    successors: HashMap<ConceptName, HashMap<RoleName, HashSet<ConceptName>>>,
    /// Reverse edges: Y → {(r, X)} for every (X, r, Y) in the relation,
    /// so R4 can fire when S(Y) gains a label
    predecessors: HashMap<ConceptName, HashSet<(RoleName, ConceptName)>>,
    queue: VecDeque<Fact>,
    facts_inserted: usize,
}

impl Engine<'_> {
    /// Insert `n` into S(`x`); enqueues a propagation event iff new
    fn add_subsumption(&mut self, x: ConceptName, n: ConceptName) {
        let inserted = self.labels.entry(x.clone()).or_default().insert(n.clone());
        if inserted {
            self.facts_inserted += 1;
            self.queue.push_back(Fact::Subsumption { x, n });
        }
    }

    /// Insert edge (`x`, `role`, `y`); enqueues a propagation event iff new
    fn add_link(&mut self, x: ConceptName, role: RoleName, y: ConceptName) {
        let inserted = self
            .successors
            .entry(x.clone())
            .or_default()
            .entry(role.clone())
            .or_default()
            .insert(y.clone());
        if inserted {
            self.facts_inserted += 1;
            self.predecessors
                .entry(y.clone())
                .or_default()
                .insert((role.clone(), x.clone()));
            self.queue.push_back(Fact::Link { x, role, y });
        }
    }

    /// `n` is new in S(`x`): apply R1, R2, R3, and the label side of R4
    fn propagate_subsumption(&mut self, x: ConceptName, n: ConceptName) {
        // R1: N ⊑ M
        for m in self.index.atomic(&n).to_vec() {
            self.add_subsumption(x.clone(), m);
        }

        // R2: A ⊓ B ⊑ C, partner operand already present
        for (partner, c) in self.index.conjunction(&n).to_vec() {
            let has_partner = self
                .labels
                .get(&x)
                .map(|s| s.contains(&partner))
                .unwrap_or(false);
            if has_partner {
                self.add_subsumption(x.clone(), c);
            }
        }

        // R3: N ⊑ ∃r.M
        for (role, m) in self.index.existential_rhs(&n).to_vec() {
            self.add_link(x.clone(), role, m);
        }

        // R4, label side: some P has an r-edge into X and ∃r.N ⊑ M exists
        let incoming: Vec<(RoleName, ConceptName)> = self
            .predecessors
            .get(&x)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        for (role, p) in incoming {
            for m in self.index.existential_lhs(&role, &n).to_vec() {
                self.add_subsumption(p.clone(), m);
            }
        }
    }

    /// Edge (`x`, `role`, `y`) is new: apply the edge side of R4
    fn propagate_link(&mut self, x: ConceptName, role: RoleName, y: ConceptName) {
        let y_labels: Vec<ConceptName> = self
            .labels
            .get(&y)
            .map(|set| set.iter().cloned().collect())
            .unwrap_or_default();
        for n in y_labels {
            for m in self.index.existential_lhs(&role, &n).to_vec() {
                self.add_subsumption(x.clone(), m);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use mimizuku_core::model::{Axiom, InternedConcept, Ontology};

    fn name(s: &str) -> InternedConcept {
        InternedConcept::name(format!("http://example.org/{}", s))
    }

    fn cname(s: &str) -> ConceptName {
        ConceptName::new(format!("http://example.org/{}", s))
    }

    fn saturated(axioms: Vec<Axiom>) -> SaturationResult {
        let ontology = Ontology::from_axioms(axioms);
        saturate(&normalize(&ontology).unwrap())
    }

    #[test]
    fn test_seed_is_reflexive_and_contains_top() {
        let result = saturated(vec![Axiom::SubConceptOf(name("A"), name("B"))]);

        assert!(result.contains(&cname("A"), &cname("A")));
        assert!(result.contains(&cname("A"), &ConceptName::top()));
        assert!(result.contains(&cname("B"), &cname("B")));
    }

    #[test]
    fn test_r1_chains_transitively() {
        let result = saturated(vec![
            Axiom::SubConceptOf(name("Mother"), name("Parent")),
            Axiom::SubConceptOf(name("Parent"), name("Person")),
        ]);

        assert!(result.contains(&cname("Mother"), &cname("Parent")));
        assert!(result.contains(&cname("Mother"), &cname("Person")));
        assert!(!result.contains(&cname("Person"), &cname("Mother")));
    }

    #[test]
    fn test_r2_fires_only_with_both_operands() {
        let conj = InternedConcept::conjunction(vec![name("HappyParent"), name("Wealthy")]);
        let result = saturated(vec![
            Axiom::SubConceptOf(conj, name("Content")),
            Axiom::SubConceptOf(name("X"), name("HappyParent")),
            Axiom::SubConceptOf(name("X"), name("Wealthy")),
            Axiom::SubConceptOf(name("Y"), name("HappyParent")),
        ]);

        assert!(result.contains(&cname("X"), &cname("Content")));
        // Y has only one operand, so the rule must not fire
        assert!(!result.contains(&cname("Y"), &cname("Content")));
    }

    #[test]
    fn test_r3_r4_existential_chain() {
        let role = RoleName::new("http://example.org/hasChild");
        let restriction = InternedConcept::existential(role.clone(), name("Person"));
        let result = saturated(vec![
            Axiom::SubConceptOf(name("Mother"), restriction.clone()),
            Axiom::SubConceptOf(restriction, name("Parent")),
        ]);

        assert!(result.contains(&cname("Mother"), &cname("Parent")));
        let edges = result
            .successors()
            .get(&cname("Mother"))
            .and_then(|by_role| by_role.get(&role))
            .unwrap();
        assert!(edges.contains(&cname("Person")));
    }

    #[test]
    fn test_r4_fires_on_late_label_gain() {
        // The successor edge exists before Person enters S(Child):
        // Mother ⊑ ∃hasChild.Child, Child ⊑ Person, ∃hasChild.Person ⊑ Parent
        let role = RoleName::new("http://example.org/hasChild");
        let result = saturated(vec![
            Axiom::SubConceptOf(
                name("Mother"),
                InternedConcept::existential(role.clone(), name("Child")),
            ),
            Axiom::SubConceptOf(name("Child"), name("Person")),
            Axiom::SubConceptOf(
                InternedConcept::existential(role, name("Person")),
                name("Parent"),
            ),
        ]);

        assert!(result.contains(&cname("Mother"), &cname("Parent")));
    }

    #[test]
    fn test_cyclic_tbox_terminates() {
        let role = RoleName::new("http://example.org/r");
        let result = saturated(vec![
            Axiom::SubConceptOf(
                name("A"),
                InternedConcept::existential(role.clone(), name("A")),
            ),
            Axiom::SubConceptOf(
                InternedConcept::existential(role, name("A")),
                name("B"),
            ),
            Axiom::SubConceptOf(name("B"), name("A")),
        ]);

        assert!(result.contains(&cname("A"), &cname("B")));
        assert!(result.contains(&cname("B"), &cname("A")));
    }

    #[test]
    fn test_fact_insertions_within_bound() {
        let result = saturated(vec![
            Axiom::SubConceptOf(name("A"), name("B")),
            Axiom::SubConceptOf(name("B"), name("C")),
            Axiom::SubConceptOf(
                name("C"),
                InternedConcept::existential(RoleName::new("http://example.org/r"), name("A")),
            ),
        ]);

        // |names| = A, B, C, ⊤; one role
        let c = 4;
        let r = 1;
        assert!(result.facts_inserted() <= c * (c + r * c));
    }
}
