//! Garden identifiers and garden records.
//!
//! A garden record is the owner's JSON configuration object plus three
//! server-managed keys: `gardenId`, `lastModified` and `lastAccessed`.

use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

use crate::crops::CropStatusRegistry;
use crate::error::CoreError;
use crate::location::LocationConfig;
use crate::types::{GardenId, Timestamp};

/* --------------------------------------------------------------------------
   Field names
   -------------------------------------------------------------------------- */

pub const FIELD_GARDEN_ID: &str = "gardenId";
pub const FIELD_LAST_MODIFIED: &str = "lastModified";
pub const FIELD_LAST_ACCESSED: &str = "lastAccessed";

/// Payload key holding location overrides.
pub const FIELD_LOCATION: &str = "location";

/// Payload key holding the crop status registry.
pub const FIELD_CROP_STATUS: &str = "cropStatus";

/* --------------------------------------------------------------------------
   Identifier validation
   -------------------------------------------------------------------------- */

/// Minimum garden ID length.
pub const MIN_GARDEN_ID_LEN: usize = 10;

/// Maximum garden ID length.
pub const MAX_GARDEN_ID_LEN: usize = 64;

/// Validate a garden ID before it reaches storage.
///
/// IDs must be 10-64 characters of ASCII letters, digits, `-` or `_`.
/// Generated UUIDs always pass.
pub fn validate_garden_id(id: &str) -> Result<(), CoreError> {
    if id.len() < MIN_GARDEN_ID_LEN {
        return Err(CoreError::Validation(format!(
            "Invalid garden ID: must be at least {MIN_GARDEN_ID_LEN} characters"
        )));
    }
    if id.len() > MAX_GARDEN_ID_LEN {
        return Err(CoreError::Validation(format!(
            "Invalid garden ID: must be at most {MAX_GARDEN_ID_LEN} characters"
        )));
    }
    if !id
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err(CoreError::Validation(
            "Invalid garden ID: only letters, digits, '-' and '_' are allowed".to_string(),
        ));
    }
    Ok(())
}

/// Generate a fresh garden ID (UUID v4, hyphenated).
pub fn new_garden_id() -> GardenId {
    uuid::Uuid::new_v4().to_string()
}

/// Format a timestamp the way the records store it
/// (`2025-04-01T12:00:00.000Z`).
pub fn format_timestamp(at: Timestamp) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/* --------------------------------------------------------------------------
   Garden record
   -------------------------------------------------------------------------- */

/// A stored garden: an arbitrary JSON object with server-managed stamps.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GardenRecord(serde_json::Map<String, serde_json::Value>);

impl GardenRecord {
    /// Build a record from a caller payload, stamping `gardenId` and
    /// `lastModified`. Caller-supplied values for those keys are replaced.
    pub fn from_payload(
        id: &str,
        payload: serde_json::Value,
        now: Timestamp,
    ) -> Result<Self, CoreError> {
        let serde_json::Value::Object(mut fields) = payload else {
            return Err(CoreError::Validation(
                "Garden data must be a JSON object".to_string(),
            ));
        };
        fields.insert(FIELD_LAST_MODIFIED.to_string(), format_timestamp(now).into());
        fields.insert(FIELD_GARDEN_ID.to_string(), id.into());
        Ok(Self(fields))
    }

    /// Refresh `lastAccessed`.
    pub fn touch(&mut self, now: Timestamp) {
        self.0
            .insert(FIELD_LAST_ACCESSED.to_string(), format_timestamp(now).into());
    }

    pub fn garden_id(&self) -> Option<&str> {
        self.0.get(FIELD_GARDEN_ID).and_then(serde_json::Value::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.0.get(key)
    }

    /// Location config with the record's overrides merged over defaults.
    pub fn location(&self) -> Result<LocationConfig, CoreError> {
        LocationConfig::with_overrides(self.0.get(FIELD_LOCATION))
    }

    pub fn crop_status(&self) -> Result<CropStatusRegistry, CoreError> {
        CropStatusRegistry::from_value(self.0.get(FIELD_CROP_STATUS))
    }

    pub fn fields(&self) -> &serde_json::Map<String, serde_json::Value> {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        serde_json::Value::Object(self.0)
    }
}
