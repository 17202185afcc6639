//! Snipe-IT asset service abstraction.
//!
//! [`AssetService`] is the seam between the reconcilers and the remote API. The
//! reqwest implementation is [`SnipeItClient`]; tests substitute in-memory fakes.

use async_trait::async_trait;

pub mod client;
pub mod error;
pub mod types;

pub use client::SnipeItClient;
pub use error::ApiError;
pub use types::{
    AssetPayload, Assignment, AssignmentKind, CheckoutRequest, CheckoutTarget, CustomFieldValue,
    ListResponse, ModelPayload, ModelUpdate, NamedRef, RemoteModel, RemoteRecord,
};

/// Result limit for name lookups.
pub const SEARCH_LIMIT: u32 = 50;

/// Page size used when walking every record of a search.
pub const PAGE_SIZE: u32 = 500;

/// Upper bound on pages fetched by [`AssetService::search_hardware_all`].
pub const MAX_PAGES: u32 = 200;

/// Operations the reconcilers need from the asset service.
///
/// Searches are substring matches on the service side; callers post-filter.
///
/// # Object Safety
///
/// This trait is object-safe and designed to be used as `Arc<dyn AssetService>`.
#[async_trait]
pub trait AssetService: Send + Sync + 'static {
    // ========================================================================
    // Manufacturers & models
    // ========================================================================

    async fn search_manufacturers(&self, query: &str) -> Result<Vec<NamedRef>, ApiError>;

    /// Create a manufacturer and return its id.
    async fn create_manufacturer(&self, name: &str) -> Result<u64, ApiError>;

    async fn search_models(&self, query: &str) -> Result<Vec<RemoteModel>, ApiError>;

    /// Create a model and return its id.
    async fn create_model(&self, model: &ModelPayload) -> Result<u64, ApiError>;

    async fn get_model_by_id(&self, id: u64) -> Result<RemoteModel, ApiError>;

    async fn update_model(&self, id: u64, update: &ModelUpdate) -> Result<(), ApiError>;

    // ========================================================================
    // Hardware
    // ========================================================================

    /// One page of a substring search over hardware, optionally restricted to one
    /// category. `total` counts every match, not just this page.
    async fn search_hardware_page(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        category_id: Option<u64>,
    ) -> Result<ListResponse<RemoteRecord>, ApiError>;

    async fn get_hardware_by_id(&self, id: u64) -> Result<RemoteRecord, ApiError>;

    /// Create a hardware record and return its id.
    async fn create_hardware(&self, payload: &AssetPayload) -> Result<u64, ApiError>;

    async fn update_hardware(&self, id: u64, payload: &AssetPayload) -> Result<(), ApiError>;

    async fn checkout_hardware(&self, id: u64, request: &CheckoutRequest)
        -> Result<(), ApiError>;

    async fn checkin_hardware(&self, id: u64, note: Option<&str>) -> Result<(), ApiError>;

    /// Verify credentials and reachability. Returns the total hardware count.
    async fn test_connection(&self) -> Result<u64, ApiError>;

    // ========================================================================
    // Finders (provided)
    // ========================================================================

    /// Exact case-insensitive manufacturer lookup, creating it on a miss.
    async fn find_or_create_manufacturer(&self, name: &str) -> Result<u64, ApiError> {
        let found = self
            .search_manufacturers(name)
            .await?
            .into_iter()
            .find(|m| m.name.eq_ignore_ascii_case(name));
        if let Some(manufacturer) = found {
            return Ok(manufacturer.id);
        }

        tracing::info!(manufacturer = name, "Creating manufacturer");
        self.create_manufacturer(name).await
    }

    /// Exact case-insensitive model name lookup within one manufacturer.
    async fn find_model_by_name(
        &self,
        name: &str,
        manufacturer_id: u64,
    ) -> Result<Option<u64>, ApiError> {
        Ok(self
            .search_models(name)
            .await?
            .into_iter()
            .find(|m| m.name.eq_ignore_ascii_case(name) && m.manufacturer_id() == Some(manufacturer_id))
            .map(|m| m.id))
    }

    /// Model lookup by name and manufacturer, creating it on a miss.
    ///
    /// A machine can change role over its life (laptop docked as a server), so an
    /// existing model in another category is moved to `model.category_id` and
    /// `model.fieldset_id` instead of being duplicated.
    async fn find_or_create_model(&self, model: &ModelPayload) -> Result<u64, ApiError> {
        if let Some(id) = self
            .find_model_by_name(&model.name, model.manufacturer_id)
            .await?
        {
            let existing = self.get_model_by_id(id).await?;
            if existing.category_id() != Some(model.category_id) {
                tracing::info!(
                    model = %model.name,
                    from_category = ?existing.category_id(),
                    to_category = model.category_id,
                    "Moving model to configured category"
                );
                let update = ModelUpdate {
                    category_id: model.category_id,
                    fieldset_id: model.fieldset_id,
                };
                self.update_model(id, &update).await?;
            }
            return Ok(id);
        }

        tracing::info!(model = %model.name, "Creating model");
        self.create_model(model).await
    }

    /// First `limit` hardware records matching `query`.
    async fn search_hardware(
        &self,
        query: &str,
        limit: u32,
        category_id: Option<u64>,
    ) -> Result<Vec<RemoteRecord>, ApiError> {
        Ok(self
            .search_hardware_page(query, limit, 0, category_id)
            .await?
            .rows)
    }

    /// Every hardware record matching `query`, fetched [`PAGE_SIZE`] at a time.
    async fn search_hardware_all(
        &self,
        query: &str,
        category_id: Option<u64>,
    ) -> Result<Vec<RemoteRecord>, ApiError> {
        let mut records = Vec::new();
        for page_number in 0..MAX_PAGES {
            let offset = page_number * PAGE_SIZE;
            let page = self
                .search_hardware_page(query, PAGE_SIZE, offset, category_id)
                .await?;
            let fetched = page.rows.len();
            records.extend(page.rows);

            if fetched < PAGE_SIZE as usize || records.len() as u64 >= page.total {
                return Ok(records);
            }
        }

        tracing::warn!(
            query,
            fetched = records.len(),
            "Search still returning rows after page limit, results truncated"
        );
        Ok(records)
    }

    /// Hardware record whose name equals `hostname`, ignoring case.
    async fn find_hardware_by_hostname(&self, hostname: &str) -> Result<Option<u64>, ApiError> {
        Ok(self
            .search_hardware(hostname, SEARCH_LIMIT, None)
            .await?
            .into_iter()
            .find(|r| r.name.eq_ignore_ascii_case(hostname))
            .map(|r| r.id))
    }
}
