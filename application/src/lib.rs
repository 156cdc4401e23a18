use async_trait::async_trait;
use chrono::{DateTime, Utc};
use domain::{Category, DomainError, Entity, EntityId};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use thiserror::Error;
use tracing::{info, instrument};

// --- Application Errors ---
#[derive(Error, Debug)]
pub enum ApplicationError {
    #[error("Entity not found using ID = {0}")]
    NotFound(String),
    #[error("Domain validation error: {0}")]
    Domain(#[from] DomainError), // Propagate domain errors cleanly
}

// --- Search Contract (Value Objects) ---

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PER_PAGE: u32 = 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")] // Allows "asc", "desc" in JSON
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Reads a direction from raw request input. Anything that is not a
    /// case-insensitive "desc" counts as ascending.
    pub fn parse(value: &str) -> Self {
        if value.trim().eq_ignore_ascii_case("desc") {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        }
    }
}

/// One normalized search request: page and page size are always positive,
/// a blank sort field is no sort field, and a direction exists only when a
/// sort field does.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchParams<F = String> {
    page: u32,
    per_page: u32,
    sort: Option<String>,
    sort_dir: Option<SortDirection>,
    filter: Option<F>,
}

impl<F> SearchParams<F> {
    /// Builds params from possibly-invalid request values. Out-of-range page
    /// or page size falls back to the defaults instead of failing.
    pub fn new(
        page: Option<i64>,
        per_page: Option<i64>,
        sort: Option<String>,
        sort_dir: Option<SortDirection>,
        filter: Option<F>,
    ) -> Self {
        let sort = sort
            .map(|field| field.trim().to_string())
            .filter(|field| !field.is_empty());
        // A direction without a sort field is meaningless; a sort field
        // without a direction is ascending.
        let sort_dir = sort.as_ref().map(|_| sort_dir.unwrap_or_default());
        Self {
            page: normalize_positive(page, DEFAULT_PAGE),
            per_page: normalize_positive(per_page, DEFAULT_PER_PAGE),
            sort,
            sort_dir,
            filter,
        }
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn per_page(&self) -> u32 {
        self.per_page
    }

    pub fn sort(&self) -> Option<&str> {
        self.sort.as_deref()
    }

    pub fn sort_dir(&self) -> Option<SortDirection> {
        self.sort_dir
    }

    pub fn filter(&self) -> Option<&F> {
        self.filter.as_ref()
    }
}

impl<F> Default for SearchParams<F> {
    fn default() -> Self {
        Self::new(None, None, None, None, None)
    }
}

fn normalize_positive(value: Option<i64>, default: u32) -> u32 {
    match value {
        Some(v) if v >= 1 => u32::try_from(v).unwrap_or(u32::MAX),
        _ => default,
    }
}

/// Outcome of a search: one page of items plus the metadata describing how
/// that page was produced. `total` counts the filtered, pre-pagination
/// sequence; `sort`/`sort_dir`/`filter` echo the request.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult<E, F = String> {
    pub items: Vec<E>,
    pub total: usize,
    pub current_page: u32,
    pub per_page: u32,
    pub last_page: u32,
    pub sort: Option<String>,
    pub sort_dir: Option<SortDirection>,
    pub filter: Option<F>,
}

impl<E, F: Clone> SearchResult<E, F> {
    pub fn new(items: Vec<E>, total: usize, params: &SearchParams<F>) -> Self {
        Self {
            items,
            total,
            current_page: params.page(),
            per_page: params.per_page(),
            // per_page is never zero by the SearchParams invariant
            last_page: total.div_ceil(params.per_page() as usize) as u32,
            sort: params.sort().map(str::to_string),
            sort_dir: params.sort_dir(),
            filter: params.filter().cloned(),
        }
    }
}

// --- Repository Interfaces (Traits) ---

/// Basic collection contract for a single entity type.
#[async_trait]
pub trait Repository<E>: Send + Sync
where
    E: Entity + Send + Sync,
{
    /// Appends the entity. Duplicate ids are the caller's concern.
    async fn insert(&self, entity: E) -> Result<(), ApplicationError>;
    /// Finds an entity by id; fails with `NotFound` when absent.
    async fn find_by_id(&self, id: &EntityId) -> Result<E, ApplicationError>;
    /// Snapshot of the full collection, in insertion order.
    async fn find_all(&self) -> Result<Vec<E>, ApplicationError>;
    /// Replaces the stored entity with the same id; fails with `NotFound`.
    async fn update(&self, entity: E) -> Result<(), ApplicationError>;
    /// Removes the entity with the given id; fails with `NotFound`.
    async fn delete(&self, id: &EntityId) -> Result<(), ApplicationError>;
}

/// A repository that also answers parameterized searches by applying
/// filter, sort and pagination, in that order.
#[async_trait]
pub trait SearchableRepository<E, F>: Repository<E>
where
    E: Entity + Send + Sync,
    F: Send + Sync,
{
    /// Field names callers may sort on.
    fn sortable_fields(&self) -> &[&str];

    async fn search(
        &self,
        params: SearchParams<F>,
    ) -> Result<SearchResult<E, F>, ApplicationError>;
}

/// The category-specialized contract: a plain text filter against the name.
pub trait CategoryRepository: SearchableRepository<Category, String> {}

impl<T> CategoryRepository for T where T: SearchableRepository<Category, String> {}

// --- Request/Response Models (Data Transfer Objects - DTOs) ---

/// Raw, all-optional search request as it arrives from the outside
/// (e.g. query-string fields). Normalized into `SearchParams` before use.
#[derive(Deserialize, Debug, Clone, Default)]
pub struct SearchInput {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub sort: Option<String>,
    pub sort_dir: Option<String>,
    pub filter: Option<String>,
}

impl From<SearchInput> for SearchParams<String> {
    fn from(input: SearchInput) -> Self {
        let sort_dir = input.sort_dir.as_deref().map(SortDirection::parse);
        // A blank filter is no filter
        let filter = input
            .filter
            .map(|value| value.trim().to_string())
            .filter(|value| !value.is_empty());
        SearchParams::new(input.page, input.per_page, input.sort, sort_dir, filter)
    }
}

#[derive(Deserialize, Debug, Clone)]
pub struct CreateCategoryInput {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default = "default_is_active")] // Provide default if missing
    pub is_active: bool,
}

// Function to provide default is_active for serde
fn default_is_active() -> bool {
    true
}

#[derive(Deserialize, Debug, Clone)]
pub struct UpdateCategoryInput {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// When present, also switches the category on or off.
    #[serde(default)]
    pub is_active: Option<bool>,
}

/// Plain field set a category is exposed as outside the domain.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CategoryOutput {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Category> for CategoryOutput {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id().to_string(),
            name: category.name().to_string(),
            description: category.description().map(str::to_string),
            is_active: category.is_active(),
            created_at: category.created_at(),
        }
    }
}

/// Presentation-level page: mapped items plus the pagination metadata of
/// the search result they came from.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct PaginationOutput<I> {
    pub items: Vec<I>,
    pub total: usize,
    pub current_page: u32,
    pub per_page: u32,
    pub last_page: u32,
}

impl<I> PaginationOutput<I> {
    pub fn from_result<E, F>(items: Vec<I>, result: &SearchResult<E, F>) -> Self {
        Self {
            items,
            total: result.total,
            current_page: result.current_page,
            per_page: result.per_page,
            last_page: result.last_page,
        }
    }
}

// --- Application Services (Use Cases) ---

/// CRUD and listing use-cases over the category repository.
pub struct CategoryService {
    categories: Arc<dyn CategoryRepository>,
}

impl CategoryService {
    pub fn new(categories: Arc<dyn CategoryRepository>) -> Self {
        Self { categories }
    }

    #[instrument(skip(self, input), fields(name = %input.name))]
    pub async fn create(
        &self,
        input: CreateCategoryInput,
    ) -> Result<CategoryOutput, ApplicationError> {
        info!("Attempting to create category");
        let category = Category::new(input.name, input.description, input.is_active)?;
        self.categories.insert(category.clone()).await?;
        info!(category_id = %category.id(), "Category created successfully");
        Ok(CategoryOutput::from(&category))
    }

    #[instrument(skip(self))]
    pub async fn get(&self, id: &str) -> Result<CategoryOutput, ApplicationError> {
        let id = EntityId::parse(id)?;
        let category = self.categories.find_by_id(&id).await?;
        Ok(CategoryOutput::from(&category))
    }

    #[instrument(skip(self, input))]
    pub async fn list(
        &self,
        input: SearchInput,
    ) -> Result<PaginationOutput<CategoryOutput>, ApplicationError> {
        let result = self.categories.search(SearchParams::from(input)).await?;
        info!(total = result.total, page = result.current_page, "Categories listed");
        let items = result.items.iter().map(CategoryOutput::from).collect();
        Ok(PaginationOutput::from_result(items, &result))
    }

    #[instrument(skip(self, input), fields(category_id = %input.id))]
    pub async fn update(
        &self,
        input: UpdateCategoryInput,
    ) -> Result<CategoryOutput, ApplicationError> {
        let id = EntityId::parse(&input.id)?;
        let mut category = self.categories.find_by_id(&id).await?;
        category.update(input.name, input.description)?;
        match input.is_active {
            Some(true) => category.activate(),
            Some(false) => category.deactivate(),
            None => {}
        }
        self.categories.update(category.clone()).await?;
        info!("Category updated successfully");
        Ok(CategoryOutput::from(&category))
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: &str) -> Result<(), ApplicationError> {
        let id = EntityId::parse(id)?;
        self.categories.delete(&id).await?;
        info!(category_id = %id, "Category deleted successfully");
        Ok(())
    }
}
