// ./infrastructure/src/persistence/category_repository.rs
use application::SortDirection;
use domain::Category;
use std::cmp::Ordering;

use super::in_memory_repository::{InMemorySearchableRepository, SearchableEntity};

/// In-memory category store: case-insensitive substring filter on the name,
/// newest first unless the caller asks otherwise.
pub type CategoryInMemoryRepository = InMemorySearchableRepository<Category>;

impl SearchableEntity for Category {
    type Filter = String;

    fn matches(&self, filter: &String) -> bool {
        self.name().to_lowercase().contains(&filter.to_lowercase())
    }

    fn compare_by(&self, other: &Self, field: &str) -> Ordering {
        match field {
            "created_at" => self.created_at().cmp(&other.created_at()),
            _ => self.name().cmp(other.name()),
        }
    }

    fn sortable_fields() -> &'static [&'static str] {
        &["name", "created_at"]
    }

    fn default_sort() -> (&'static str, SortDirection) {
        ("created_at", SortDirection::Desc)
    }
}
