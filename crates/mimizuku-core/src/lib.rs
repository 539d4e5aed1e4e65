//! EL 概念モデルライブラリ
//!
//! このクレートは Mimizuku 推論エンジンのデータモデルを提供します:
//! - IRI ラッパーと概念名・ロール名
//! - 構造的インターンされた EL 概念式
//! - TBox 公理と Ontology コンテナ
//!
//! 振る舞い(正規化・飽和・分類)は `mimizuku-el` 側にあります。

pub mod model;

pub use model::{
    Axiom, Concept, ConceptName, InternedConcept, Iri, Ontology, RoleName, TOP_IRI,
};
