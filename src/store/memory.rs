//! In-memory symbol store.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{SavedSymbol, SymbolDraft, SymbolStore};
use crate::error::StoreError;

/// [`SymbolStore`] holding records in insertion order.
///
/// Soft-deleted records stay in memory.
#[derive(Debug, Default)]
pub struct InMemorySymbolStore {
    records: Arc<RwLock<Vec<SavedSymbol>>>,
}

impl InMemorySymbolStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn visible(record: &SavedSymbol, owner: &str, id: Uuid) -> bool {
    record.id == id && record.owner_email == owner && !record.deleted
}

#[async_trait]
impl SymbolStore for InMemorySymbolStore {
    async fn save(&self, owner: &str, draft: SymbolDraft) -> Result<SavedSymbol, StoreError> {
        draft.validate()?;

        let now = Utc::now();
        let mut record = SavedSymbol {
            id: Uuid::new_v4(),
            content: String::new(),
            name: String::new(),
            description: None,
            size: None,
            format: None,
            foreground_color: None,
            background_color: None,
            margin: None,
            error_correction: None,
            created_at: now,
            updated_at: now,
            deleted: false,
            deleted_at: None,
            owner_email: owner.to_string(),
        };
        record.apply(draft);

        self.records.write().await.push(record.clone());
        Ok(record)
    }

    async fn find_all(&self, owner: &str) -> Result<Vec<SavedSymbol>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .filter(|r| r.owner_email == owner && !r.deleted)
            .cloned()
            .collect())
    }

    async fn find(&self, owner: &str, id: Uuid) -> Result<SavedSymbol, StoreError> {
        let records = self.records.read().await;
        records
            .iter()
            .find(|r| visible(r, owner, id))
            .cloned()
            .ok_or(StoreError::NotFound(id))
    }

    async fn update(
        &self,
        owner: &str,
        id: Uuid,
        draft: SymbolDraft,
    ) -> Result<SavedSymbol, StoreError> {
        draft.validate()?;

        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| visible(r, owner, id))
            .ok_or(StoreError::NotFound(id))?;

        record.apply(draft);
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    async fn soft_delete(&self, owner: &str, id: Uuid) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        let record = records
            .iter_mut()
            .find(|r| visible(r, owner, id))
            .ok_or(StoreError::NotFound(id))?;

        let now = Utc::now();
        record.deleted = true;
        record.deleted_at = Some(now);
        record.updated_at = now;

        Ok(())
    }
}
