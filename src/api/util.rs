use crate::minecraft::properties::PropertySet;
use crate::store::StoreError;
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// Reply envelope of the load and save endpoints.
///
/// store failures are reported here instead of through the http status, so the editor can show the
/// message and keep running.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub properties: Option<PropertySet>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Outcome {
    pub fn success() -> Self {
        Self {
            success: true,
            properties: None,
            error: None,
        }
    }

    pub fn with_properties(properties: PropertySet) -> Self {
        Self {
            properties: Some(properties),
            ..Self::success()
        }
    }

    pub fn failure(error: impl Display) -> Self {
        Self {
            success: false,
            properties: None,
            error: Some(error.to_string()),
        }
    }
}

impl From<Result<PropertySet, StoreError>> for Outcome {
    fn from(result: Result<PropertySet, StoreError>) -> Self {
        match result {
            Ok(properties) => Self::with_properties(properties),
            Err(err) => Self::failure(err),
        }
    }
}

impl From<Result<(), StoreError>> for Outcome {
    fn from(result: Result<(), StoreError>) -> Self {
        match result {
            Ok(()) => Self::success(),
            Err(err) => Self::failure(err),
        }
    }
}
