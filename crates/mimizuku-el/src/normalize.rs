//! EL 正規化
//!
//! 任意の EL TBox を4つの正規形に書き換えます:
//! - `A ⊑ B`
//! - `A ⊓ B ⊑ C`
//! - `A ⊑ ∃r.B`
//! - `∃r.A ⊑ B`
//!
//! 複合式には定義同値なフレッシュ名を導入します。正規形入力への再適用は
//! 無変化(冪等)です。

use crate::ElError;
use mimizuku_core::model::{Axiom, Concept, ConceptName, InternedConcept, Ontology, RoleName};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap, HashSet, VecDeque};

/// Prefix for fresh concept names introduced during normalization.
/// Fresh names never enter the declared signature.
pub const FRESH_PREFIX: &str = "urn:mimizuku:norm#";

/// Normal-form TBox axiom
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NormalAxiom {
    /// A ⊑ B (name to name, or name to ⊤)
    Atomic { lhs: ConceptName, rhs: ConceptName },

    /// A ⊓ B ⊑ C
    Conjunction {
        operands: (ConceptName, ConceptName),
        rhs: ConceptName,
    },

    /// A ⊑ ∃r.B
    ExistentialRhs {
        lhs: ConceptName,
        role: RoleName,
        filler: ConceptName,
    },

    /// ∃r.A ⊑ B
    ExistentialLhs {
        role: RoleName,
        filler: ConceptName,
        rhs: ConceptName,
    },
}

/// A normal-form TBox, immutable once built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NormalizedTBox {
    axioms: Vec<NormalAxiom>,
    /// Names from the raw ontology, plus ⊤ (fresh names excluded)
    declared: BTreeSet<ConceptName>,
    /// Every name occurring in the normal axioms, declared or fresh
    all_names: BTreeSet<ConceptName>,
    roles: BTreeSet<RoleName>,
}

impl NormalizedTBox {
    pub fn axioms(&self) -> &[NormalAxiom] {
        &self.axioms
    }

    pub fn declared(&self) -> &BTreeSet<ConceptName> {
        &self.declared
    }

    pub fn all_names(&self) -> &BTreeSet<ConceptName> {
        &self.all_names
    }

    pub fn roles(&self) -> &BTreeSet<RoleName> {
        &self.roles
    }

    pub fn is_declared(&self, name: &ConceptName) -> bool {
        self.declared.contains(name)
    }

    /// Convert back to raw axioms; normalizing the result is a no-op
    pub fn to_raw_axioms(&self) -> Vec<Axiom> {
        fn concept_of(name: &ConceptName) -> InternedConcept {
            InternedConcept::from(name.clone())
        }

        self.axioms
            .iter()
            .map(|axiom| match axiom {
                NormalAxiom::Atomic { lhs, rhs } => {
                    Axiom::SubConceptOf(concept_of(lhs), concept_of(rhs))
                }
                NormalAxiom::Conjunction { operands, rhs } => Axiom::SubConceptOf(
                    InternedConcept::conjunction(vec![
                        concept_of(&operands.0),
                        concept_of(&operands.1),
                    ]),
                    concept_of(rhs),
                ),
                NormalAxiom::ExistentialRhs { lhs, role, filler } => Axiom::SubConceptOf(
                    concept_of(lhs),
                    InternedConcept::existential(role.clone(), concept_of(filler)),
                ),
                NormalAxiom::ExistentialLhs { role, filler, rhs } => Axiom::SubConceptOf(
                    InternedConcept::existential(role.clone(), concept_of(filler)),
                    concept_of(rhs),
                ),
            })
            .collect()
    }
}

/// Normalize a raw EL ontology into the four normal forms
///
/// Fails with [`ElError::IllFormedAxiom`] on structurally invalid input;
/// nothing is returned partially.
pub fn normalize(ontology: &Ontology) -> Result<NormalizedTBox, ElError> {
    for (index, axiom) in ontology.axioms.iter().enumerate() {
        validate_axiom(index, axiom)?;
    }

    // Desugar equivalences into mutual inclusions, keep GCIs as-is
    let mut pending: VecDeque<(InternedConcept, InternedConcept)> = VecDeque::new();
    for axiom in &ontology.axioms {
        match axiom {
            Axiom::SubConceptOf(lhs, rhs) => pending.push_back((lhs.clone(), rhs.clone())),
            Axiom::EquivalentConcepts(concepts) => {
                let first = &concepts[0];
                for other in &concepts[1..] {
                    pending.push_back((first.clone(), other.clone()));
                    pending.push_back((other.clone(), first.clone()));
                }
            }
        }
    }

    let mut normalizer = Normalizer::new(&ontology.concept_names);
    while let Some((lhs, rhs)) = pending.pop_front() {
        normalizer.normalize_gci(lhs, rhs, &mut pending);
    }

    // The fresh-name namespace is reserved: input names carrying the prefix
    // are kept distinct from minted intermediates and stay out of the
    // declared signature
    let mut declared: BTreeSet<ConceptName> = ontology
        .concept_names
        .iter()
        .filter(|name| !name.as_str().starts_with(FRESH_PREFIX))
        .cloned()
        .collect();
    declared.insert(ConceptName::top());

    let mut all_names = declared.clone();
    for axiom in &normalizer.out {
        match axiom {
            NormalAxiom::Atomic { lhs, rhs } => {
                all_names.insert(lhs.clone());
                all_names.insert(rhs.clone());
            }
            NormalAxiom::Conjunction { operands, rhs } => {
                all_names.insert(operands.0.clone());
                all_names.insert(operands.1.clone());
                all_names.insert(rhs.clone());
            }
            NormalAxiom::ExistentialRhs { lhs, filler, .. } => {
                all_names.insert(lhs.clone());
                all_names.insert(filler.clone());
            }
            NormalAxiom::ExistentialLhs { filler, rhs, .. } => {
                all_names.insert(filler.clone());
                all_names.insert(rhs.clone());
            }
        }
    }

    Ok(NormalizedTBox {
        axioms: normalizer.out,
        declared,
        all_names,
        roles: ontology.role_names.iter().cloned().collect(),
    })
}

/// Structural validation; every later step may assume well-formed input
fn validate_axiom(index: usize, axiom: &Axiom) -> Result<(), ElError> {
    match axiom {
        Axiom::SubConceptOf(lhs, rhs) => {
            validate_concept(index, lhs)?;
            validate_concept(index, rhs)
        }
        Axiom::EquivalentConcepts(concepts) => {
            if concepts.len() < 2 {
                return Err(ElError::IllFormedAxiom(format!(
                    "axiom #{}: equivalence needs at least two operands",
                    index
                )));
            }
            for concept in concepts {
                validate_concept(index, concept)?;
            }
            Ok(())
        }
    }
}

fn validate_concept(index: usize, concept: &InternedConcept) -> Result<(), ElError> {
    let mut stack = vec![concept.clone()];
    while let Some(current) = stack.pop() {
        match current.as_concept() {
            Concept::Top => {}
            Concept::Name(name) => {
                if name.as_str().is_empty() {
                    return Err(ElError::IllFormedAxiom(format!(
                        "axiom #{}: empty concept name",
                        index
                    )));
                }
            }
            Concept::Conjunction(operands) => {
                if operands.is_empty() {
                    return Err(ElError::IllFormedAxiom(format!(
                        "axiom #{}: empty conjunction",
                        index
                    )));
                }
                stack.extend(operands.iter().cloned());
            }
            Concept::Existential { role, filler } => {
                if role.as_str().is_empty() {
                    return Err(ElError::IllFormedAxiom(format!(
                        "axiom #{}: empty role name",
                        index
                    )));
                }
                stack.push(filler.clone());
            }
        }
    }
    Ok(())
}

struct Normalizer<'a> {
    fresh_counter: usize,
    /// Names from the input signature; minting must never collide with them
    taken: &'a HashSet<ConceptName>,
    /// Memo keyed by interned concept identity: repeated sub-expressions
    /// reuse their defining name
    names: HashMap<InternedConcept, ConceptName>,
    out: Vec<NormalAxiom>,
}

impl<'a> Normalizer<'a> {
    fn new(taken: &'a HashSet<ConceptName>) -> Self {
        Self {
            fresh_counter: 0,
            taken,
            names: HashMap::new(),
            out: Vec::new(),
        }
    }

    /// Mint a name that occurs nowhere in the input signature. Candidates
    /// already present are skipped, not rejected, so raw normal-form output
    /// can be fed back in unchanged.
    fn fresh_name(&mut self) -> ConceptName {
        loop {
            let name = ConceptName::new(format!("{}{}", FRESH_PREFIX, self.fresh_counter));
            self.fresh_counter += 1;
            if !self.taken.contains(&name) {
                return name;
            }
        }
    }

    /// Normalize one GCI; composite right-hand conjunctions are split back
    /// onto the pending queue
    fn normalize_gci(
        &mut self,
        lhs: InternedConcept,
        rhs: InternedConcept,
        pending: &mut VecDeque<(InternedConcept, InternedConcept)>,
    ) {
        match rhs.as_concept() {
            // C ⊑ D1 ⊓ ... ⊓ Dn splits into one inclusion per operand
            Concept::Conjunction(operands) => {
                for operand in operands {
                    pending.push_back((lhs.clone(), operand.clone()));
                }
            }
            Concept::Existential { role, filler } => {
                let filler_name = self.name_of(filler);
                match lhs.as_concept() {
                    Concept::Top | Concept::Name(_) => {
                        self.out.push(NormalAxiom::ExistentialRhs {
                            lhs: atomic_name(&lhs),
                            role: role.clone(),
                            filler: filler_name,
                        });
                    }
                    // Composite left side: bridge through an equivalent
                    // fresh name for the restriction
                    _ => {
                        let bridge = self.name_of(&rhs);
                        pending.push_back((lhs, InternedConcept::from(bridge)));
                    }
                }
            }
            Concept::Top | Concept::Name(_) => {
                let rhs_name = atomic_name(&rhs);
                match lhs.as_concept() {
                    Concept::Top | Concept::Name(_) => {
                        self.out.push(NormalAxiom::Atomic {
                            lhs: atomic_name(&lhs),
                            rhs: rhs_name,
                        });
                    }
                    Concept::Existential { role, filler } => {
                        let filler_name = self.name_of(filler);
                        self.out.push(NormalAxiom::ExistentialLhs {
                            role: role.clone(),
                            filler: filler_name,
                            rhs: rhs_name,
                        });
                    }
                    Concept::Conjunction(operands) => {
                        let operand_names: Vec<ConceptName> =
                            operands.iter().map(|op| self.name_of(op)).collect();
                        match operand_names.split_last() {
                            Some((_, [])) => {
                                // Single-operand conjunction degenerates to
                                // a plain inclusion
                                self.out.push(NormalAxiom::Atomic {
                                    lhs: operand_names[0].clone(),
                                    rhs: rhs_name,
                                });
                            }
                            Some((last, init)) => {
                                let acc = if init.len() == 1 {
                                    init[0].clone()
                                } else {
                                    self.fold_conjunction(init)
                                };
                                self.out.push(NormalAxiom::Conjunction {
                                    operands: (acc, last.clone()),
                                    rhs: rhs_name,
                                });
                            }
                            None => unreachable!("validated non-empty"),
                        }
                    }
                }
            }
        }
    }

    /// Name a concept expression, introducing a definitionally equivalent
    /// fresh name for composites. Post-order traversal with an explicit
    /// stack; already-named sub-expressions are skipped via the memo.
    fn name_of(&mut self, root: &InternedConcept) -> ConceptName {
        let mut stack = vec![root.clone()];
        while let Some(current) = stack.last().cloned() {
            if self.names.contains_key(&current) {
                stack.pop();
                continue;
            }
            match current.as_concept() {
                Concept::Top => {
                    self.names.insert(current.clone(), ConceptName::top());
                    stack.pop();
                }
                Concept::Name(name) => {
                    self.names.insert(current.clone(), name.clone());
                    stack.pop();
                }
                Concept::Conjunction(operands) => {
                    let unnamed: Vec<InternedConcept> = operands
                        .iter()
                        .filter(|op| !self.names.contains_key(*op))
                        .cloned()
                        .collect();
                    if unnamed.is_empty() {
                        let operand_names: Vec<ConceptName> =
                            operands.iter().map(|op| self.names[op].clone()).collect();
                        let name = self.fold_conjunction(&operand_names);
                        self.names.insert(current.clone(), name);
                        stack.pop();
                    } else {
                        stack.extend(unnamed);
                    }
                }
                Concept::Existential { role, filler } => {
                    if let Some(filler_name) = self.names.get(filler).cloned() {
                        let fresh = self.fresh_name();
                        // fresh ≡ ∃r.filler, both directions
                        self.out.push(NormalAxiom::ExistentialRhs {
                            lhs: fresh.clone(),
                            role: role.clone(),
                            filler: filler_name.clone(),
                        });
                        self.out.push(NormalAxiom::ExistentialLhs {
                            role: role.clone(),
                            filler: filler_name,
                            rhs: fresh.clone(),
                        });
                        self.names.insert(current.clone(), fresh);
                        stack.pop();
                    } else {
                        stack.push(filler.clone());
                    }
                }
            }
        }
        self.names[root].clone()
    }

    /// Left-fold a list of operand names into one name, each intermediate
    /// pair bound to a fresh name that is subsumption-equivalent to it
    /// (`A ⊓ B ⊑ fresh` plus `fresh ⊑ A`, `fresh ⊑ B`)
    fn fold_conjunction(&mut self, operand_names: &[ConceptName]) -> ConceptName {
        let mut acc = operand_names[0].clone();
        for next in &operand_names[1..] {
            let fresh = self.fresh_name();
            self.out.push(NormalAxiom::Conjunction {
                operands: (acc.clone(), next.clone()),
                rhs: fresh.clone(),
            });
            self.out.push(NormalAxiom::Atomic {
                lhs: fresh.clone(),
                rhs: acc,
            });
            self.out.push(NormalAxiom::Atomic {
                lhs: fresh.clone(),
                rhs: next.clone(),
            });
            acc = fresh;
        }
        acc
    }
}

fn atomic_name(concept: &InternedConcept) -> ConceptName {
    match concept.as_concept() {
        Concept::Top => ConceptName::top(),
        Concept::Name(name) => name.clone(),
        _ => unreachable!("caller matched an atomic shape"),
    }
}
