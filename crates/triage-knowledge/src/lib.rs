//! Clinical knowledge base for the triage engine.
//!
//! A knowledge pack is loaded from one of two interchangeable backends
//! (a tabular workbook or a graph export), flattened into
//! [`tables::KnowledgeTables`], then indexed into a read-only
//! [`view::KnowledgeIndex`]. The engine only ever sees the
//! [`view::KnowledgeBaseView`] trait.

use std::path::Path;
use std::str::FromStr;

pub mod error;
pub mod graph;
pub mod handle;
pub mod tables;
pub mod tabular;
pub mod view;

pub use error::KnowledgeBaseError;
pub use handle::KnowledgeBase;
pub use tables::KnowledgeTables;
pub use view::{KnowledgeBaseView, KnowledgeIndex, Support};

/// Somewhere a knowledge pack can be read from.
pub trait KnowledgeSource: Send + Sync {
    /// Short backend name, used in logs.
    fn name(&self) -> &'static str;

    /// Read the pack and return its rows. Called again on every reload.
    fn load_tables(&self) -> Result<KnowledgeTables, KnowledgeBaseError>;
}

/// In-memory tables act as their own source.
impl KnowledgeSource for KnowledgeTables {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn load_tables(&self) -> Result<KnowledgeTables, KnowledgeBaseError> {
        Ok(self.clone())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Tabular,
    Graph,
}

impl Backend {
    pub fn source(self, path: &Path) -> Box<dyn KnowledgeSource> {
        match self {
            Self::Tabular => Box::new(tabular::TabularPack::new(path)),
            Self::Graph => Box::new(graph::GraphPack::new(path)),
        }
    }
}

impl FromStr for Backend {
    type Err = KnowledgeBaseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "tabular" | "workbook" => Ok(Self::Tabular),
            "graph" => Ok(Self::Graph),
            other => Err(KnowledgeBaseError::UnknownBackend(other.to_string())),
        }
    }
}
