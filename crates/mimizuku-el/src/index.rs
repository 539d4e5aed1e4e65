//! 正規形公理インデックス
//!
//! 飽和中の規則適用を償却 O(1) でトリガーするための参照テーブル。
//! 構築後は読み取り専用です。TBox が変わる場合は再構築します。

use crate::normalize::{NormalAxiom, NormalizedTBox};
use mimizuku_core::model::{ConceptName, RoleName};
use std::collections::HashMap;

/// Lookup tables over a normal-form TBox, keyed by rule trigger
#[derive(Debug, Default)]
pub struct AxiomIndex {
    /// N → [M] for axioms N ⊑ M (rule R1)
    atomic: HashMap<ConceptName, Vec<ConceptName>>,

    /// operand → [(partner, C)] for axioms A ⊓ B ⊑ C, indexed under both
    /// operands (rule R2)
    conjunction: HashMap<ConceptName, Vec<(ConceptName, ConceptName)>>,

    /// N → [(r, M)] for axioms N ⊑ ∃r.M (rule R3)
    existential_rhs: HashMap<ConceptName, Vec<(RoleName, ConceptName)>>,

    /// (r, N) → [M] for axioms ∃r.N ⊑ M (rule R4)
    existential_lhs: HashMap<(RoleName, ConceptName), Vec<ConceptName>>,
}

impl AxiomIndex {
    pub fn build(tbox: &NormalizedTBox) -> Self {
        let mut index = AxiomIndex::default();
        for axiom in tbox.axioms() {
            match axiom {
                NormalAxiom::Atomic { lhs, rhs } => {
                    index.atomic.entry(lhs.clone()).or_default().push(rhs.clone());
                }
                NormalAxiom::Conjunction { operands, rhs } => {
                    let (a, b) = operands;
                    index
                        .conjunction
                        .entry(a.clone())
                        .or_default()
                        .push((b.clone(), rhs.clone()));
                    if a != b {
                        index
                            .conjunction
                            .entry(b.clone())
                            .or_default()
                            .push((a.clone(), rhs.clone()));
                    }
                }
                NormalAxiom::ExistentialRhs { lhs, role, filler } => {
                    index
                        .existential_rhs
                        .entry(lhs.clone())
                        .or_default()
                        .push((role.clone(), filler.clone()));
                }
                NormalAxiom::ExistentialLhs { role, filler, rhs } => {
                    index
                        .existential_lhs
                        .entry((role.clone(), filler.clone()))
                        .or_default()
                        .push(rhs.clone());
                }
            }
        }
        index
    }

    /// Superconcepts asserted directly for `name`
    pub fn atomic(&self, name: &ConceptName) -> &[ConceptName] {
        self.atomic.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Conjunction axioms with `name` as one operand
    pub fn conjunction(&self, name: &ConceptName) -> &[(ConceptName, ConceptName)] {
        self.conjunction.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Existential restrictions entailed by membership of `name`
    pub fn existential_rhs(&self, name: &ConceptName) -> &[(RoleName, ConceptName)] {
        self.existential_rhs
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Superconcepts entailed by an r-successor in `filler`
    pub fn existential_lhs(&self, role: &RoleName, filler: &ConceptName) -> &[ConceptName] {
        self.existential_lhs
            .get(&(role.clone(), filler.clone()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
