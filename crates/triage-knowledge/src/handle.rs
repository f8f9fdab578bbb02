use std::sync::{Arc, PoisonError, RwLock};

use crate::KnowledgeSource;
use crate::error::KnowledgeBaseError;
use crate::view::KnowledgeIndex;

/// The long-lived, swappable knowledge base owned by the composition root.
///
/// Readers take an `Arc` snapshot and score against it for the whole pass;
/// [`KnowledgeBase::reload`] builds a complete new index before swapping it
/// in, so a pass never observes a half-loaded pack.
pub struct KnowledgeBase {
    source: Box<dyn KnowledgeSource>,
    current: RwLock<Arc<KnowledgeIndex>>,
}

impl KnowledgeBase {
    /// Load the pack once. Failure here is fatal for the caller.
    pub fn load(source: Box<dyn KnowledgeSource>) -> Result<Self, KnowledgeBaseError> {
        let index = KnowledgeIndex::build_from(source.name(), source.load_tables()?)?;
        Ok(Self {
            source,
            current: RwLock::new(Arc::new(index)),
        })
    }

    pub fn snapshot(&self) -> Arc<KnowledgeIndex> {
        self.current
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Re-read the source and swap in the new index. On error the previous
    /// index stays in place.
    pub fn reload(&self) -> Result<Arc<KnowledgeIndex>, KnowledgeBaseError> {
        let index = Arc::new(KnowledgeIndex::build_from(
            self.source.name(),
            self.source.load_tables()?,
        )?);
        *self.current.write().unwrap_or_else(PoisonError::into_inner) = Arc::clone(&index);
        tracing::info!(source = self.source.name(), "knowledge base reloaded");
        Ok(index)
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }
}
