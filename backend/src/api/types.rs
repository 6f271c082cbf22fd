//! Wire types of the REST API.
//!
//! Successful responses are `{success: true, ...fields}` ([`Success`]);
//! failures are `{success: false, error}` ([`error_response`]).

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::store::{ResourceType, StoredPerson, TargetCounts, TargetFile};

/// Public URL of a stored media key.
pub fn media_url(key: &str) -> String {
    format!("/media/{}", key)
}

/// `{success: true}` wrapped around a response body.
#[derive(Debug, Clone, Serialize)]
pub struct Success<T> {
    success: bool,
    #[serde(flatten)]
    pub body: T,
}

impl<T> Success<T> {
    pub fn new(body: T) -> Self {
        Self { success: true, body }
    }
}

/// Failure envelope.
pub fn error_response(message: &str) -> Value {
    json!({
        "success": false,
        "error": message,
    })
}

// =============================================================================
// People
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct PersonView {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub image_urls: Vec<String>,
    pub image_count: usize,
    pub is_present: bool,
}

impl From<&StoredPerson> for PersonView {
    fn from(person: &StoredPerson) -> Self {
        Self {
            id: person.id.clone(),
            first_name: person.first_name.clone(),
            last_name: person.last_name.clone(),
            image_urls: person.images.iter().map(|k| media_url(k)).collect(),
            image_count: person.images.len(),
            is_present: person.is_present,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PeopleBody {
    pub people: Vec<PersonView>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddPersonRequest {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub id_number: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct AddPersonBody {
    pub person_id: String,
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageBody {
    pub message: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct ImageUploadBody {
    pub image_count: usize,
    pub can_add_more: bool,
    pub message: String,
}

// =============================================================================
// Targets
// =============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct TargetView {
    pub public_id: String,
    pub url: String,
    pub file_name: String,
    pub resource_type: ResourceType,
    pub bytes: usize,
    pub uploaded_at: String,
}

impl From<&TargetFile> for TargetView {
    fn from(target: &TargetFile) -> Self {
        Self {
            public_id: target.public_id.clone(),
            url: media_url(&target.media_key()),
            file_name: target.file_name.clone(),
            resource_type: target.resource_type,
            bytes: target.size_bytes,
            uploaded_at: target.uploaded_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetListBody {
    pub files: Vec<TargetView>,
    pub total_count: usize,
    pub images_count: usize,
    pub videos_count: usize,
}

impl TargetListBody {
    pub fn new(files: Vec<TargetView>, counts: TargetCounts) -> Self {
        Self {
            files,
            total_count: counts.total,
            images_count: counts.images,
            videos_count: counts.videos,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetAppendBody {
    pub uploaded_count: usize,
    pub total_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DeleteTargetsRequest {
    #[serde(default)]
    pub public_ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TargetDeleteBody {
    pub deleted_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_success_envelope_is_flat() {
        let value = serde_json::to_value(Success::new(TargetDeleteBody { deleted_count: 2 })).unwrap();
        assert_eq!(value, json!({"success": true, "deleted_count": 2}));
    }

    #[test]
    fn test_error_envelope() {
        assert_eq!(
            error_response("Person with ID 7 not found"),
            json!({"success": false, "error": "Person with ID 7 not found"})
        );
    }
}
