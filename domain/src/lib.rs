use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error; // For domain-specific errors
use uuid::Uuid;

// --- Domain Errors ---
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("ID must be a valid UUID, got '{0}'")]
    InvalidId(String),
    #[error("Invalid value for field '{field}': {reason}")]
    Validation { field: String, reason: String },
}

impl DomainError {
    fn validation(field: &str, reason: impl Into<String>) -> Self {
        DomainError::Validation {
            field: field.to_string(),
            reason: reason.into(),
        }
    }
}

// --- Entity ID ---

/// UUID-backed identity for domain entities. Assigned once at creation and
/// never changed afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Parses an id from its canonical string form.
    pub fn parse(value: &str) -> Result<Self, DomainError> {
        Uuid::parse_str(value)
            .map(Self)
            .map_err(|_| DomainError::InvalidId(value.to_string()))
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<Uuid> for EntityId {
    fn from(id: Uuid) -> Self {
        Self(id)
    }
}

/// Common surface of every domain entity: a stable identity.
pub trait Entity {
    fn id(&self) -> &EntityId;
}

// --- Category Entity ---

const MAX_NAME_LEN: usize = 255;
const MAX_DESCRIPTION_LEN: usize = 255;

/// A video category. Identity and creation time are fixed at construction;
/// the remaining properties change only through the explicit mutators below,
/// which re-run validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    id: EntityId,
    name: String,
    description: Option<String>,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl Category {
    /// Creates a category with a fresh id and the current timestamp.
    pub fn new(
        name: impl Into<String>,
        description: Option<String>,
        is_active: bool,
    ) -> Result<Self, DomainError> {
        Self::restore(EntityId::new(), name, description, is_active, Utc::now())
    }

    /// Rehydrates a category from already-known parts (id and timestamp come
    /// from the caller). Validation still applies.
    pub fn restore(
        id: EntityId,
        name: impl Into<String>,
        description: Option<String>,
        is_active: bool,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let category = Self {
            id,
            name: name.into(),
            description,
            is_active,
            created_at,
        };
        category.validate()?;
        Ok(category)
    }

    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub fn is_active(&self) -> bool {
        self.is_active
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Renames the category and replaces its description.
    pub fn update(
        &mut self,
        name: impl Into<String>,
        description: Option<String>,
    ) -> Result<(), DomainError> {
        let previous = (
            std::mem::replace(&mut self.name, name.into()),
            std::mem::replace(&mut self.description, description),
        );
        if let Err(err) = self.validate() {
            // Keep the entity valid when the new values are rejected
            (self.name, self.description) = previous;
            return Err(err);
        }
        Ok(())
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }

    fn validate(&self) -> Result<(), DomainError> {
        if self.name.trim().is_empty() {
            return Err(DomainError::validation("name", "must not be empty"));
        }
        if self.name.chars().count() > MAX_NAME_LEN {
            return Err(DomainError::validation(
                "name",
                format!("must be at most {} characters", MAX_NAME_LEN),
            ));
        }
        if let Some(description) = &self.description {
            if description.chars().count() > MAX_DESCRIPTION_LEN {
                return Err(DomainError::validation(
                    "description",
                    format!("must be at most {} characters", MAX_DESCRIPTION_LEN),
                ));
            }
        }
        Ok(())
    }
}

impl Entity for Category {
    fn id(&self) -> &EntityId {
        &self.id
    }
}

// --- Tests ---
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_id_is_unique_per_creation() {
        assert_ne!(EntityId::new(), EntityId::new());
    }

    #[test]
    fn entity_id_parses_canonical_form() {
        let id = EntityId::new();
        let parsed = EntityId::parse(&id.to_string()).unwrap();
        assert_eq!(parsed, id);
    }

    #[test]
    fn entity_id_rejects_malformed_input() {
        let result = EntityId::parse("not-a-uuid");
        assert_eq!(
            result,
            Err(DomainError::InvalidId("not-a-uuid".to_string()))
        );
    }

    #[test]
    fn category_creation_success() {
        let category = Category::new("Movie", None, true).unwrap();
        assert_eq!(category.name(), "Movie");
        assert_eq!(category.description(), None);
        assert!(category.is_active());
        assert!(category.created_at() <= Utc::now());
    }

    #[test]
    fn category_creation_fails_empty_name() {
        for name in ["", "   "] {
            let result = Category::new(name, None, true);
            assert!(
                matches!(result, Err(DomainError::Validation { ref field, .. }) if field == "name"),
                "name {:?} should be rejected",
                name
            );
        }
    }

    #[test]
    fn category_creation_fails_name_too_long() {
        let result = Category::new("a".repeat(256), None, true);
        assert!(
            matches!(result, Err(DomainError::Validation { ref field, .. }) if field == "name")
        );

        // 255 is still fine
        assert!(Category::new("a".repeat(255), None, true).is_ok());
    }

    #[test]
    fn category_creation_fails_description_too_long() {
        let result = Category::new("Movie", Some("d".repeat(256)), true);
        assert!(
            matches!(result, Err(DomainError::Validation { ref field, .. }) if field == "description")
        );
    }

    #[test]
    fn category_update_replaces_name_and_description() {
        let mut category = Category::new("Movie", None, true).unwrap();
        let id = category.id().clone();

        category
            .update("Documentary", Some("Non-fiction".to_string()))
            .unwrap();

        assert_eq!(category.id(), &id);
        assert_eq!(category.name(), "Documentary");
        assert_eq!(category.description(), Some("Non-fiction"));
    }

    #[test]
    fn category_update_keeps_previous_values_on_invalid_input() {
        let mut category = Category::new("Movie", Some("Films".to_string()), true).unwrap();

        let result = category.update("", None);

        assert!(result.is_err());
        assert_eq!(category.name(), "Movie");
        assert_eq!(category.description(), Some("Films"));
    }

    #[test]
    fn category_activate_and_deactivate() {
        let mut category = Category::new("Movie", None, false).unwrap();
        assert!(!category.is_active());

        category.activate();
        assert!(category.is_active());

        category.deactivate();
        assert!(!category.is_active());
    }

    #[test]
    fn category_restore_keeps_id_and_timestamp() {
        let id = EntityId::new();
        let created_at = Utc::now();
        let category = Category::restore(id.clone(), "Movie", None, true, created_at).unwrap();

        assert_eq!(category.id(), &id);
        assert_eq!(category.created_at(), created_at);
    }
}
