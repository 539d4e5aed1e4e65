//! # 🦉 Mimizuku - EL 記述論理リーズナー
//!
//! Mimizuku is an EL description logic reasoner. EL restricts concept
//! expressions to ⊤, concept names, conjunction, and existential
//! restriction; within that fragment subsumption checking and full
//! ontology classification run in polynomial time.
//!
//! ## Features
//!
//! - **📐 Normal-Form Rewriting**: Any EL TBox rewritten into four axiom shapes
//! - **🚀 Completion-Rule Saturation**: Worklist fixpoint with indexed rule triggers
//! - **🔍 Subsumption Queries**: Subsumers, subsumees, and pairwise checks
//! - **🌳 Classification**: Full hierarchy or direct parents only
//! - **🔧 Rust Ecosystem**: Memory-safe, structurally interned concept trees
//!
//! ## Quick Start
//!
//! ```rust
//! use mimizuku::prelude::*;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let ontology = Ontology::from_axioms(vec![
//!         Axiom::SubConceptOf(
//!             InternedConcept::name("http://example.org/Mother"),
//!             InternedConcept::name("http://example.org/Parent"),
//!         ),
//!         Axiom::SubConceptOf(
//!             InternedConcept::name("http://example.org/Parent"),
//!             InternedConcept::name("http://example.org/Person"),
//!         ),
//!     ]);
//!
//!     let mut reasoner = ElReasoner::new();
//!     reasoner.set_ontology(&ontology)?;
//!
//!     let supers =
//!         reasoner.get_subsumers(&ConceptName::new("http://example.org/Mother"))?;
//!     println!("Mother has {} subsumers", supers.len());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! Mimizuku consists of two crates:
//!
//! - **`mimizuku-core`**: Concept, axiom, and ontology data models with
//!   structural interning
//! - **`mimizuku-el`**: Normalization, saturation, and classification
//!
//! ## Feature Flags
//!
//! - `full` (default): All crates included
//! - `core`: Only core data models
//! - `el`: The reasoning engine

// Re-export public APIs from sub-crates (feature-gated)

#[cfg(feature = "mimizuku-core")]
pub use mimizuku_core as core;

#[cfg(feature = "mimizuku-el")]
pub use mimizuku_el as el;

// Convenience re-exports for common types (feature-gated)
#[cfg(feature = "mimizuku-core")]
pub use mimizuku_core::model;

#[cfg(feature = "mimizuku-el")]
pub use mimizuku_el::{ElError, ElReasoner};

// Commonly used external dependencies
pub use anyhow;
pub use serde;
pub use serde_json;

/// Prelude module for convenient imports
///
/// ```rust
/// use mimizuku::prelude::*;
/// ```
pub mod prelude {
    #[cfg(feature = "mimizuku-core")]
    pub use crate::model::*;

    #[cfg(feature = "mimizuku-el")]
    pub use crate::ElError;
    #[cfg(feature = "mimizuku-el")]
    pub use crate::ElReasoner;

    // Common external types
    pub use anyhow::Result;
    pub use serde::{Deserialize, Serialize};
    pub use serde_json::Value;
}

#[cfg(feature = "mimizuku-el")]
pub mod reasoning {
    //! Normalization, saturation, and classification internals
    pub use mimizuku_el::*;
}

// Version information
/// Current version of Mimizuku
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_constant() {
        assert!(!VERSION.is_empty());
        assert!(VERSION.chars().all(|c| c.is_ascii_digit() || c == '.'));
    }

    #[cfg(all(feature = "mimizuku-core", feature = "mimizuku-el"))]
    #[test]
    fn test_basic_reasoner_creation() {
        use crate::prelude::*;

        let mut reasoner = ElReasoner::new();
        let ontology = Ontology::from_axioms(vec![Axiom::SubConceptOf(
            InternedConcept::name("http://example.org/A"),
            InternedConcept::name("http://example.org/B"),
        )]);
        reasoner.set_ontology(&ontology).unwrap();
        assert!(reasoner
            .is_subsumed_by(
                &ConceptName::new("http://example.org/A"),
                &ConceptName::new("http://example.org/B"),
            )
            .unwrap());
    }
}
