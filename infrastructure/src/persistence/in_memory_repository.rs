// ./infrastructure/src/persistence/in_memory_repository.rs
use application::{
    ApplicationError, Repository, SearchParams, SearchResult, SearchableRepository, SortDirection,
};
use async_trait::async_trait;
use domain::{Entity, EntityId};
use std::cmp::Ordering;
use tokio::sync::RwLock;
use tracing::{debug, instrument, warn};

// --- Search Capability ---

/// Entity-specific hooks for the in-memory search pipeline. A searchable
/// entity type supplies the filter predicate, a total order per sortable
/// field, and the default sort applied when a request names no usable field.
/// Everything else (storage, lookup, pagination arithmetic, stable sorting)
/// is generic.
pub trait SearchableEntity: Entity + Clone + Send + Sync + 'static {
    type Filter: Clone + Send + Sync + 'static;

    /// Does this entity match the requested filter value?
    fn matches(&self, filter: &Self::Filter) -> bool;

    /// Total order between two entities for one of the sortable fields.
    fn compare_by(&self, other: &Self, field: &str) -> Ordering;

    /// Field names callers may sort on.
    fn sortable_fields() -> &'static [&'static str];

    /// Sort applied when the request names no (or no sortable) field.
    fn default_sort() -> (&'static str, SortDirection);
}

// --- Generic In-Memory Repository ---

/// Generic in-memory store with the filter -> sort -> paginate search
/// pipeline. The backing collection keeps insertion order and sits behind a
/// single lock, so every operation observes a consistent snapshot.
#[derive(Debug)]
pub struct InMemorySearchableRepository<E> {
    items: RwLock<Vec<E>>,
}

impl<E> Default for InMemorySearchableRepository<E> {
    fn default() -> Self {
        Self {
            items: RwLock::new(Vec::new()),
        }
    }
}

impl<E: SearchableEntity> InMemorySearchableRepository<E> {
    pub fn new() -> Self {
        Self::default()
    }

    fn apply_filter(items: Vec<E>, filter: Option<&E::Filter>) -> Vec<E> {
        match filter {
            Some(filter) => items
                .into_iter()
                .filter(|item| item.matches(filter))
                .collect(),
            None => items,
        }
    }

    fn apply_sort(
        mut items: Vec<E>,
        sort: Option<&str>,
        sort_dir: Option<SortDirection>,
    ) -> Vec<E> {
        // An absent or non-sortable field falls back to the entity's default
        // sort, so the outcome never depends on insertion order.
        let (field, direction) = match sort {
            Some(field) if E::sortable_fields().contains(&field) => {
                (field, sort_dir.unwrap_or(SortDirection::Asc))
            }
            Some(field) => {
                warn!(field, "Requested sort field is not sortable, using the default sort");
                E::default_sort()
            }
            None => E::default_sort(),
        };
        // Stable sort: equal keys keep their relative order
        items.sort_by(|a, b| match direction {
            SortDirection::Asc => a.compare_by(b, field),
            SortDirection::Desc => a.compare_by(b, field).reverse(),
        });
        items
    }

    fn apply_paginate(items: Vec<E>, page: u32, per_page: u32) -> Vec<E> {
        // Half-open window [(page-1)*per_page, page*per_page), clamped by
        // skip/take; a page past the end is just an empty list.
        let offset = (page as usize - 1) * per_page as usize;
        items
            .into_iter()
            .skip(offset)
            .take(per_page as usize)
            .collect()
    }
}

#[async_trait]
impl<E: SearchableEntity> Repository<E> for InMemorySearchableRepository<E> {
    #[instrument(skip(self, entity))]
    async fn insert(&self, entity: E) -> Result<(), ApplicationError> {
        debug!(entity_id = %entity.id(), "Inserting entity into in-memory store");
        self.items.write().await.push(entity);
        Ok(())
    }

    #[instrument(skip(self))]
    async fn find_by_id(&self, id: &EntityId) -> Result<E, ApplicationError> {
        debug!(entity_id = %id, "Getting entity from in-memory store");
        let items = self.items.read().await;
        items
            .iter()
            .find(|item| item.id() == id)
            .cloned()
            .ok_or_else(|| {
                warn!(entity_id = %id, "Entity not found in in-memory store");
                ApplicationError::NotFound(id.to_string())
            })
    }

    #[instrument(skip(self))]
    async fn find_all(&self) -> Result<Vec<E>, ApplicationError> {
        debug!("Listing all entities from in-memory store");
        Ok(self.items.read().await.clone())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: E) -> Result<(), ApplicationError> {
        debug!(entity_id = %entity.id(), "Updating entity in in-memory store");
        let mut items = self.items.write().await;
        let position = items
            .iter()
            .position(|item| item.id() == entity.id())
            .ok_or_else(|| {
                warn!(entity_id = %entity.id(), "Update failed: entity not found in in-memory store");
                ApplicationError::NotFound(entity.id().to_string())
            })?;
        items[position] = entity;
        Ok(())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: &EntityId) -> Result<(), ApplicationError> {
        debug!(entity_id = %id, "Deleting entity from in-memory store");
        let mut items = self.items.write().await;
        let position = items
            .iter()
            .position(|item| item.id() == id)
            .ok_or_else(|| {
                warn!(entity_id = %id, "Deletion failed: entity not found in in-memory store");
                ApplicationError::NotFound(id.to_string())
            })?;
        items.remove(position);
        Ok(())
    }
}

#[async_trait]
impl<E: SearchableEntity> SearchableRepository<E, E::Filter> for InMemorySearchableRepository<E> {
    fn sortable_fields(&self) -> &[&str] {
        E::sortable_fields()
    }

    #[instrument(skip(self, params))]
    async fn search(
        &self,
        params: SearchParams<E::Filter>,
    ) -> Result<SearchResult<E, E::Filter>, ApplicationError> {
        // Consistent snapshot; the pipeline below never touches the store
        let snapshot = self.items.read().await.clone();

        let filtered = Self::apply_filter(snapshot, params.filter());
        let total = filtered.len();

        let sorted = Self::apply_sort(filtered, params.sort(), params.sort_dir());
        let page = Self::apply_paginate(sorted, params.page(), params.per_page());

        debug!(total, returned = page.len(), "In-memory search finished");
        Ok(SearchResult::new(page, total, &params))
    }
}
