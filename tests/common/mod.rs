//! Shared test utilities for Sniper integration tests.
//!
//! Provides an in-memory [`AssetService`] that behaves like a small Snipe-IT
//! instance (substring search, category filter, checkout state) and records
//! every write so tests can assert on side effects.

#![allow(dead_code)]

use async_trait::async_trait;
use sniper::config::AgentConfig;
use sniper::snipeit::{
    ApiError, AssetPayload, AssetService, Assignment, AssignmentKind, CheckoutRequest,
    CustomFieldValue, ListResponse, ModelPayload, ModelUpdate, NamedRef, RemoteModel,
    RemoteRecord,
};
use std::collections::BTreeMap;
use std::sync::Mutex;

// =============================================================================
// Well-Known Test Constants
// =============================================================================

pub const STATUS_READY: u64 = 2;
pub const LAPTOP_CATEGORY: u64 = 2;
pub const DESKTOP_CATEGORY: u64 = 3;
pub const MONITOR_CATEGORY: u64 = 5;

/// Configuration shipped with `sniper config init` (IT-N / MON-N tags).
pub fn test_config() -> AgentConfig {
    toml::from_str(include_str!("../../sniper.example.toml")).unwrap()
}

// =============================================================================
// Fake Asset Service
// =============================================================================

/// A write observed by the fake.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateManufacturer(String),
    CreateModel(ModelPayload),
    UpdateModel(u64, ModelUpdate),
    CreateHardware(AssetPayload),
    UpdateHardware(u64, AssetPayload),
    Checkout(u64, CheckoutRequest),
    Checkin(u64),
}

#[derive(Default)]
struct State {
    next_id: u64,
    manufacturers: Vec<NamedRef>,
    models: Vec<RemoteModel>,
    hardware: BTreeMap<u64, RemoteRecord>,
    users: BTreeMap<u64, String>,
    calls: Vec<Call>,
    reject_create: Option<String>,
    failing_search: Option<String>,
    fail_fetches: bool,
    fail_checkouts: bool,
    fail_checkins: bool,
}

impl State {
    fn allocate(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    fn model(&self, id: u64) -> Option<&RemoteModel> {
        self.models.iter().find(|m| m.id == id)
    }

    fn apply(&self, record: &mut RemoteRecord, payload: &AssetPayload) {
        record.name = payload.name.clone();
        record.serial = payload.serial.clone();
        record.asset_tag = payload.asset_tag.clone();
        record.status_label = Some(NamedRef {
            id: payload.status_id,
            name: "Ready to Deploy".to_string(),
        });
        if let Some(model) = self.model(payload.model_id) {
            record.model = Some(NamedRef {
                id: model.id,
                name: model.name.clone(),
            });
            record.manufacturer = model.manufacturer.clone();
            record.category = model.category.clone();
        }
        for (column, value) in &payload.custom_fields {
            record.custom_fields.insert(
                column.clone(),
                CustomFieldValue {
                    field: column.clone(),
                    value: value.clone(),
                },
            );
        }
    }
}

/// In-memory asset service. Ids are allocated from 100 upwards.
pub struct FakeAssetService {
    state: Mutex<State>,
}

impl Default for FakeAssetService {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeAssetService {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_id: 99,
                ..Default::default()
            }),
        }
    }

    pub fn add_manufacturer(&self, name: &str) -> u64 {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate();
        state.manufacturers.push(NamedRef {
            id,
            name: name.to_string(),
        });
        id
    }

    pub fn add_model(&self, name: &str, manufacturer_id: u64, category_id: u64) -> u64 {
        let mut state = self.state.lock().unwrap();
        let id = state.allocate();
        let manufacturer = state
            .manufacturers
            .iter()
            .find(|m| m.id == manufacturer_id)
            .cloned();
        state.models.push(RemoteModel {
            id,
            name: name.to_string(),
            model_number: name.to_string(),
            manufacturer,
            category: Some(NamedRef {
                id: category_id,
                name: format!("Category {}", category_id),
            }),
            fieldset: None,
        });
        id
    }

    pub fn add_user(&self, id: u64, name: &str) {
        self.state
            .lock()
            .unwrap()
            .users
            .insert(id, name.to_string());
    }

    /// Store a hardware record as-is. A zero id is replaced by a fresh one.
    pub fn add_hardware(&self, mut record: RemoteRecord) -> u64 {
        let mut state = self.state.lock().unwrap();
        if record.id == 0 {
            record.id = state.allocate();
        }
        let id = record.id;
        state.hardware.insert(id, record);
        id
    }

    /// Assign a stored record to a user without logging a call.
    pub fn assign_to_user(&self, hardware_id: u64, user_id: u64) {
        let mut state = self.state.lock().unwrap();
        let name = state.users.get(&user_id).cloned().unwrap_or_default();
        if let Some(record) = state.hardware.get_mut(&hardware_id) {
            record.assigned_to = Some(Assignment {
                id: user_id,
                name,
                kind: AssignmentKind::User,
            });
        }
    }

    /// Make `create_hardware` reject records with this name.
    pub fn reject_create_of(&self, name: &str) {
        self.state.lock().unwrap().reject_create = Some(name.to_string());
    }

    /// Make hardware searches for exactly `query` fail with a server error.
    pub fn fail_search_for(&self, query: &str) {
        self.state.lock().unwrap().failing_search = Some(query.to_string());
    }

    /// Make every `get_hardware_by_id` fail.
    pub fn fail_fetches(&self) {
        self.state.lock().unwrap().fail_fetches = true;
    }

    pub fn fail_checkouts(&self) {
        self.state.lock().unwrap().fail_checkouts = true;
    }

    pub fn fail_checkins(&self) {
        self.state.lock().unwrap().fail_checkins = true;
    }

    pub fn hardware(&self, id: u64) -> Option<RemoteRecord> {
        self.state.lock().unwrap().hardware.get(&id).cloned()
    }

    pub fn hardware_count(&self) -> usize {
        self.state.lock().unwrap().hardware.len()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    fn record_call(&self, call: Call) {
        self.state.lock().unwrap().calls.push(call);
    }
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[async_trait]
impl AssetService for FakeAssetService {
    async fn search_manufacturers(&self, query: &str) -> Result<Vec<NamedRef>, ApiError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .manufacturers
            .iter()
            .filter(|m| contains(&m.name, query))
            .cloned()
            .collect())
    }

    async fn create_manufacturer(&self, name: &str) -> Result<u64, ApiError> {
        self.record_call(Call::CreateManufacturer(name.to_string()));
        Ok(self.add_manufacturer(name))
    }

    async fn search_models(&self, query: &str) -> Result<Vec<RemoteModel>, ApiError> {
        let state = self.state.lock().unwrap();
        Ok(state
            .models
            .iter()
            .filter(|m| contains(&m.name, query) || contains(&m.model_number, query))
            .cloned()
            .collect())
    }

    async fn create_model(&self, model: &ModelPayload) -> Result<u64, ApiError> {
        self.record_call(Call::CreateModel(model.clone()));
        Ok(self.add_model(&model.name, model.manufacturer_id, model.category_id))
    }

    async fn get_model_by_id(&self, id: u64) -> Result<RemoteModel, ApiError> {
        let state = self.state.lock().unwrap();
        state
            .model(id)
            .cloned()
            .ok_or_else(|| ApiError::Rejected("Model not found".to_string()))
    }

    async fn update_model(&self, id: u64, update: &ModelUpdate) -> Result<(), ApiError> {
        self.record_call(Call::UpdateModel(id, *update));
        let mut state = self.state.lock().unwrap();
        let model = state
            .models
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or_else(|| ApiError::Rejected("Model not found".to_string()))?;
        model.category = Some(NamedRef {
            id: update.category_id,
            name: format!("Category {}", update.category_id),
        });
        Ok(())
    }

    async fn search_hardware_page(
        &self,
        query: &str,
        limit: u32,
        offset: u32,
        category_id: Option<u64>,
    ) -> Result<ListResponse<RemoteRecord>, ApiError> {
        let state = self.state.lock().unwrap();
        if state.failing_search.as_deref() == Some(query) {
            return Err(ApiError::Server {
                status: 500,
                message: "search index unavailable".to_string(),
            });
        }
        let matches: Vec<RemoteRecord> = state
            .hardware
            .values()
            .filter(|r| {
                category_id.is_none() || r.category.as_ref().map(|c| c.id) == category_id
            })
            .filter(|r| {
                contains(&r.name, query)
                    || contains(&r.serial, query)
                    || contains(&r.asset_tag, query)
                    || contains(r.model_name(), query)
                    || r.manufacturer
                        .as_ref()
                        .is_some_and(|m| contains(&m.name, query))
            })
            .cloned()
            .collect();
        Ok(ListResponse {
            total: matches.len() as u64,
            rows: matches
                .into_iter()
                .skip(offset as usize)
                .take(limit as usize)
                .collect(),
        })
    }

    async fn get_hardware_by_id(&self, id: u64) -> Result<RemoteRecord, ApiError> {
        if self.state.lock().unwrap().fail_fetches {
            return Err(ApiError::Timeout(30));
        }
        self.hardware(id)
            .ok_or_else(|| ApiError::Rejected("Asset does not exist.".to_string()))
    }

    async fn create_hardware(&self, payload: &AssetPayload) -> Result<u64, ApiError> {
        self.record_call(Call::CreateHardware(payload.clone()));
        let mut state = self.state.lock().unwrap();
        if state.reject_create.as_deref() == Some(payload.name.as_str()) {
            return Err(ApiError::Rejected(
                "asset_tag: The asset tag must be unique.".to_string(),
            ));
        }
        let id = state.allocate();
        let mut record = RemoteRecord {
            id,
            ..Default::default()
        };
        state.apply(&mut record, payload);
        state.hardware.insert(id, record);
        Ok(id)
    }

    async fn update_hardware(&self, id: u64, payload: &AssetPayload) -> Result<(), ApiError> {
        self.record_call(Call::UpdateHardware(id, payload.clone()));
        let mut state = self.state.lock().unwrap();
        let mut record = state
            .hardware
            .get(&id)
            .cloned()
            .ok_or_else(|| ApiError::Rejected("Asset does not exist.".to_string()))?;
        state.apply(&mut record, payload);
        state.hardware.insert(id, record);
        Ok(())
    }

    async fn checkout_hardware(
        &self,
        id: u64,
        request: &CheckoutRequest,
    ) -> Result<(), ApiError> {
        self.record_call(Call::Checkout(id, request.clone()));
        let mut state = self.state.lock().unwrap();
        if state.fail_checkouts {
            return Err(ApiError::Server {
                status: 500,
                message: "checkout failed".to_string(),
            });
        }
        let name = state
            .users
            .get(&request.target.id())
            .cloned()
            .unwrap_or_default();
        let record = state
            .hardware
            .get_mut(&id)
            .ok_or_else(|| ApiError::Rejected("Asset does not exist.".to_string()))?;
        if record.assigned_to.is_some() {
            return Err(ApiError::Rejected(
                "That asset is not available for checkout!".to_string(),
            ));
        }
        record.assigned_to = Some(Assignment {
            id: request.target.id(),
            name,
            kind: request.target.kind(),
        });
        Ok(())
    }

    async fn checkin_hardware(&self, id: u64, _note: Option<&str>) -> Result<(), ApiError> {
        self.record_call(Call::Checkin(id));
        let mut state = self.state.lock().unwrap();
        if state.fail_checkins {
            return Err(ApiError::Server {
                status: 500,
                message: "checkin failed".to_string(),
            });
        }
        if let Some(record) = state.hardware.get_mut(&id) {
            record.assigned_to = None;
        }
        Ok(())
    }

    async fn test_connection(&self) -> Result<u64, ApiError> {
        Ok(self.hardware_count() as u64)
    }
}
