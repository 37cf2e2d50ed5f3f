//! Saved symbol definitions.
//!
//! Users can persist the parameters of a symbol under a name and fetch,
//! update or delete them later. Every operation is scoped to an owner
//! email; records owned by someone else behave exactly like missing ones.
//!
//! Deletion is soft: the record is flagged and timestamped but kept, and
//! becomes invisible to every read, update and delete.

mod memory;

pub use memory::InMemorySymbolStore;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::fmt::Debug;
use uuid::Uuid;

use crate::error::StoreError;

/// Shortest accepted name, in characters.
pub const MIN_NAME_LEN: usize = 3;

/// Longest accepted name, in characters.
pub const MAX_NAME_LEN: usize = 50;

/// Longest accepted description, in characters.
pub const MAX_DESCRIPTION_LEN: usize = 200;

/// A stored symbol definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedSymbol {
    pub id: Uuid,
    pub content: String,
    pub name: String,
    pub description: Option<String>,
    pub size: Option<i32>,
    pub format: Option<String>,
    pub foreground_color: Option<String>,
    pub background_color: Option<String>,
    pub margin: Option<i32>,
    pub error_correction: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted: bool,
    pub deleted_at: Option<DateTime<Utc>>,
    pub owner_email: String,
}

impl SavedSymbol {
    /// Overwrite every client-editable field from `draft`.
    fn apply(&mut self, draft: SymbolDraft) {
        self.content = draft.content;
        self.name = draft.name;
        self.description = draft.description;
        self.size = draft.size;
        self.format = draft.format;
        self.foreground_color = draft.foreground_color;
        self.background_color = draft.background_color;
        self.margin = draft.margin;
        self.error_correction = draft.error_correction;
    }
}

/// Client-supplied fields of a saved symbol.
///
/// The generation parameters are stored as given; they are only checked
/// when an image is generated from them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolDraft {
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub name: String,
    pub description: Option<String>,
    pub size: Option<i32>,
    pub format: Option<String>,
    pub foreground_color: Option<String>,
    pub background_color: Option<String>,
    pub margin: Option<i32>,
    pub error_correction: Option<String>,
}

impl SymbolDraft {
    pub fn new(content: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Check required fields and lengths, reporting every problem at once.
    pub fn validate(&self) -> Result<(), StoreError> {
        let mut problems = Vec::new();

        if self.content.trim().is_empty() {
            problems.push("Content is required");
        }

        let name_len = self.name.chars().count();
        if self.name.trim().is_empty() {
            problems.push("Name is required");
        }
        if !(MIN_NAME_LEN..=MAX_NAME_LEN).contains(&name_len) {
            problems.push("Name must be between 3 and 50 characters");
        }

        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                problems.push("Description cannot exceed 200 characters");
            }
        }

        if problems.is_empty() {
            Ok(())
        } else {
            Err(StoreError::InvalidDraft(problems.join(", ")))
        }
    }
}

/// Owner-scoped storage of [`SavedSymbol`]s.
#[async_trait]
pub trait SymbolStore: Send + Sync + Debug {
    /// Store a new record for `owner`.
    async fn save(&self, owner: &str, draft: SymbolDraft) -> Result<SavedSymbol, StoreError>;

    /// All visible records of `owner`, oldest first.
    async fn find_all(&self, owner: &str) -> Result<Vec<SavedSymbol>, StoreError>;

    async fn find(&self, owner: &str, id: Uuid) -> Result<SavedSymbol, StoreError>;

    async fn update(
        &self,
        owner: &str,
        id: Uuid,
        draft: SymbolDraft,
    ) -> Result<SavedSymbol, StoreError>;

    /// Flag a record as deleted.
    async fn soft_delete(&self, owner: &str, id: Uuid) -> Result<(), StoreError>;
}
