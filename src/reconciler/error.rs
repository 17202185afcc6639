//! Reconciliation error types

use crate::snipeit::ApiError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Step of the per-record state machine where a failure happened.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncStage {
    ResolveManufacturer,
    ResolveModel,
    LocateExisting,
    Create,
    Update,
}

impl fmt::Display for SyncStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncStage::ResolveManufacturer => "resolve manufacturer",
            SyncStage::ResolveModel => "resolve model",
            SyncStage::LocateExisting => "locate existing record",
            SyncStage::Create => "create record",
            SyncStage::Update => "update record",
        };
        f.write_str(name)
    }
}

/// A record could not be reconciled. Other records in the run are unaffected.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("{stage} failed: {source}")]
    Api {
        stage: SyncStage,
        #[source]
        source: ApiError,
    },
}

impl ReconcileError {
    pub fn stage(&self) -> SyncStage {
        match self {
            ReconcileError::Api { stage, .. } => *stage,
        }
    }
}

/// Tag an API failure with the stage it interrupted.
pub(crate) trait AtStage<T> {
    fn at(self, stage: SyncStage) -> Result<T, ReconcileError>;
}

impl<T> AtStage<T> for Result<T, ApiError> {
    fn at(self, stage: SyncStage) -> Result<T, ReconcileError> {
        self.map_err(|source| ReconcileError::Api { stage, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_names_stage() {
        let result: Result<(), ApiError> = Err(ApiError::Timeout(30));
        let err = result.at(SyncStage::ResolveModel).unwrap_err();
        assert_eq!(err.stage(), SyncStage::ResolveModel);
        assert_eq!(
            err.to_string(),
            "resolve model failed: Request timeout after 30s"
        );
    }
}
