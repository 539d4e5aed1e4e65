//! EL 推論エンジン
//!
//! このクレートは EL フラグメントの完全な包含推論を提供します:
//! - 任意の EL TBox の正規形への書き換え
//! - 補完規則(R1〜R4)による飽和計算
//! - 包含クエリとクラス階層の分類
//!
//! アルゴリズムは多項式時間で停止します。

pub mod classify;
pub mod index;
pub mod loader;
pub mod normalize;
pub mod reasoner;
pub mod saturate;

pub use classify::{
    classify, classify_direct, direct_parents, equivalence_classes, subsumees, subsumers,
};
pub use index::AxiomIndex;
pub use loader::{ConceptFormatter, DlFormatter, OntologyLoader};
pub use normalize::{normalize, NormalAxiom, NormalizedTBox};
pub use reasoner::ElReasoner;
pub use saturate::{saturate, SaturationResult};

// Re-export the model types for convenience
pub use mimizuku_core::model::{Axiom, Concept, ConceptName, InternedConcept, Ontology, RoleName};

use thiserror::Error;

/// Errors surfaced by the EL engine
#[derive(Error, Debug)]
pub enum ElError {
    /// Normalization rejected a structurally invalid axiom
    #[error("ill-formed axiom: {0}")]
    IllFormedAxiom(String),

    /// Query against a concept name absent from the TBox
    #[error("unknown concept: {0}")]
    UnknownConcept(ConceptName),

    /// Engine misuse (e.g. querying before an ontology is set)
    #[error("reasoning error: {0}")]
    ReasoningError(String),
}
