pub mod category_repository;
pub mod in_memory_repository;

// Re-export the generic engine and its category specialization
pub use category_repository::CategoryInMemoryRepository;
pub use in_memory_repository::{InMemorySearchableRepository, SearchableEntity};
