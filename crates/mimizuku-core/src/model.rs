//! EL コンセプトモデル
//!
//! - 概念名・ロール名の IRI ラッパー
//! - 構造的にインターンされた概念式
//! - TBox 公理(GCI / 同値)と Ontology コンテナ

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

/// IRI wrapper for type safety
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct Iri(pub String);

impl Iri {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Iri {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reserved IRI for the top concept (⊤)
pub const TOP_IRI: &str = "http://www.w3.org/2002/07/owl#Thing";

/// Named concept identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct ConceptName(pub Iri);

impl ConceptName {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(Iri::new(s))
    }

    /// The distinguished name for ⊤; every label set contains it
    pub fn top() -> Self {
        Self(Iri::new(TOP_IRI))
    }

    pub fn is_top(&self) -> bool {
        self.0.as_str() == TOP_IRI
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for ConceptName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Named role identifier (roles have no internal structure in EL)
#[derive(Debug, Clone, PartialEq, Eq, Hash, Ord, PartialOrd, Serialize, Deserialize)]
pub struct RoleName(pub Iri);

impl RoleName {
    pub fn new<S: Into<String>>(s: S) -> Self {
        Self(Iri::new(s))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl std::fmt::Display for RoleName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// EL concept expression
///
/// Conjunctions may be n-ary here; the normalizer rewrites them to the
/// binary form required by the completion rules.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Concept {
    /// owl:Thing (⊤)
    Top,

    /// Named concept
    Name(ConceptName),

    /// Conjunction: C1 ⊓ C2 ⊓ ... ⊓ Cn
    Conjunction(Vec<InternedConcept>),

    /// Existential restriction: ∃r.C
    Existential {
        role: RoleName,
        filler: InternedConcept,
    },
}

lazy_static! {
    /// Global concept interning pool: identical shapes collapse to one allocation
    static ref CONCEPT_POOL: Arc<RwLock<HashMap<Concept, Arc<Concept>>>> =
        Arc::new(RwLock::new(HashMap::new()));
}

/// Structurally interned concept expression
///
/// Two concepts with identical shape share the same `Arc`, so membership
/// tests and map keys are identity-stable across repeated construction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InternedConcept(Arc<Concept>);

impl InternedConcept {
    /// Intern a concept, reusing the existing instance when possible
    pub fn new(concept: Concept) -> Self {
        {
            let pool = CONCEPT_POOL.read().unwrap();
            if let Some(interned) = pool.get(&concept) {
                return InternedConcept(Arc::clone(interned));
            }
        }
        let mut pool = CONCEPT_POOL.write().unwrap();
        let interned = pool
            .entry(concept.clone())
            .or_insert_with(|| Arc::new(concept));
        InternedConcept(Arc::clone(interned))
    }

    /// ⊤
    pub fn top() -> Self {
        Self::new(Concept::Top)
    }

    /// Named concept
    pub fn name<S: Into<String>>(s: S) -> Self {
        Self::new(Concept::Name(ConceptName::new(s)))
    }

    /// Conjunction of the given operands (kept n-ary until normalization)
    pub fn conjunction(operands: Vec<InternedConcept>) -> Self {
        Self::new(Concept::Conjunction(operands))
    }

    /// Existential restriction ∃role.filler
    pub fn existential(role: RoleName, filler: InternedConcept) -> Self {
        Self::new(Concept::Existential { role, filler })
    }

    pub fn as_concept(&self) -> &Concept {
        &self.0
    }

    /// Identity comparison (always agrees with `==` for interned values)
    pub fn ptr_eq(&self, other: &InternedConcept) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl From<ConceptName> for InternedConcept {
    fn from(name: ConceptName) -> Self {
        if name.is_top() {
            InternedConcept::top()
        } else {
            InternedConcept::new(Concept::Name(name))
        }
    }
}

impl Serialize for InternedConcept {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_concept().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for InternedConcept {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(InternedConcept::new(Concept::deserialize(deserializer)?))
    }
}

impl Serialize for Concept {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        ConceptRepr::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Concept {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(ConceptRepr::deserialize(deserializer)?.into())
    }
}

/// Serde mirror of `Concept` without the `Arc` indirection
#[derive(Serialize, Deserialize)]
enum ConceptRepr {
    Top,
    Name(ConceptName),
    Conjunction(Vec<ConceptRepr>),
    Existential { role: RoleName, filler: Box<ConceptRepr> },
}

impl From<&Concept> for ConceptRepr {
    fn from(concept: &Concept) -> Self {
        match concept {
            Concept::Top => ConceptRepr::Top,
            Concept::Name(n) => ConceptRepr::Name(n.clone()),
            Concept::Conjunction(ops) => {
                ConceptRepr::Conjunction(ops.iter().map(|c| c.as_concept().into()).collect())
            }
            Concept::Existential { role, filler } => ConceptRepr::Existential {
                role: role.clone(),
                filler: Box::new(filler.as_concept().into()),
            },
        }
    }
}

impl From<ConceptRepr> for Concept {
    fn from(repr: ConceptRepr) -> Self {
        match repr {
            ConceptRepr::Top => Concept::Top,
            ConceptRepr::Name(n) => Concept::Name(n),
            ConceptRepr::Conjunction(ops) => Concept::Conjunction(
                ops.into_iter()
                    .map(|c| InternedConcept::new(c.into()))
                    .collect(),
            ),
            ConceptRepr::Existential { role, filler } => Concept::Existential {
                role,
                filler: InternedConcept::new((*filler).into()),
            },
        }
    }
}

/// TBox axiom over raw (non-normal) EL concept expressions
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axiom {
    /// General concept inclusion: lhs ⊑ rhs
    SubConceptOf(InternedConcept, InternedConcept),

    /// C1 ≡ C2 ≡ ... ≡ Cn, desugared into mutual inclusions by the normalizer
    EquivalentConcepts(Vec<InternedConcept>),
}

/// An EL ontology: raw axioms plus the declared signature
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Ontology {
    /// All axioms in the ontology
    pub axioms: Vec<Axiom>,

    /// All concept names mentioned in the axioms
    pub concept_names: HashSet<ConceptName>,

    /// All role names mentioned in the axioms
    pub role_names: HashSet<RoleName>,
}

impl Ontology {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_axioms(axioms: Vec<Axiom>) -> Self {
        let mut ontology = Self::new();
        for axiom in axioms {
            ontology.add_axiom(axiom);
        }
        ontology
    }

    /// Add an axiom, collecting the concept and role names it mentions
    pub fn add_axiom(&mut self, axiom: Axiom) {
        match &axiom {
            Axiom::SubConceptOf(lhs, rhs) => {
                self.collect_signature(lhs);
                self.collect_signature(rhs);
            }
            Axiom::EquivalentConcepts(concepts) => {
                for concept in concepts {
                    self.collect_signature(concept);
                }
            }
        }
        self.axioms.push(axiom);
    }

    /// Walk a concept expression with an explicit stack, recording its signature
    fn collect_signature(&mut self, concept: &InternedConcept) {
        let mut stack = vec![concept.clone()];
        while let Some(current) = stack.pop() {
            match current.as_concept() {
                Concept::Top => {}
                Concept::Name(name) => {
                    self.concept_names.insert(name.clone());
                }
                Concept::Conjunction(operands) => {
                    stack.extend(operands.iter().cloned());
                }
                Concept::Existential { role, filler } => {
                    self.role_names.insert(role.clone());
                    stack.push(filler.clone());
                }
            }
        }
    }
}
