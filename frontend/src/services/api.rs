//! HTTP client for the AttendMe backend.
//!
//! Every endpoint answers a JSON envelope: `{success: true, ...fields}` on
//! success and `{success: false, error}` on failure. [`decode_envelope`]
//! turns that envelope into an [`AppResult`], so call sites see backend
//! refusals and transport failures through the same `Err` path.

use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use web_sys::{File, FormData};

use crate::{AppError, AppResult, Person, TargetImage};

/// Anything that can be sent as a multipart file part.
pub trait UploadFile {
    fn file_name(&self) -> String;
}

impl UploadFile for File {
    fn file_name(&self) -> String {
        self.name()
    }
}

/// Operations offered by the backend.
///
/// Implemented by [`HttpApi`] in the browser and by fakes in tests.
#[allow(async_fn_in_trait)]
pub trait AttendanceApi {
    type File: UploadFile;

    async fn list_people(&self) -> AppResult<Vec<Person>>;

    async fn add_person(&self, person: &NewPersonRequest) -> AppResult<AddPersonResponse>;

    async fn remove_person(&self, person_id: &str) -> AppResult<MessageResponse>;

    async fn upload_person_image(
        &self,
        person_id: &str,
        file: &Self::File,
    ) -> AppResult<ImageUploadResponse>;

    async fn list_target_images(&self) -> AppResult<TargetListResponse>;

    async fn append_target_images(&self, files: &[Self::File]) -> AppResult<TargetAppendResponse>;

    async fn delete_target_images(&self, public_ids: &[String]) -> AppResult<TargetDeleteResponse>;
}

// =============================================================================
// Wire types
// =============================================================================

/// Body of `POST /api/add_person`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPersonRequest {
    pub first_name: String,
    pub last_name: String,
    pub id_number: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PeopleListResponse {
    #[serde(default)]
    pub people: Vec<Person>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddPersonResponse {
    pub person_id: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Result of a single person image upload.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ImageUploadResponse {
    /// Authoritative number of images the person now holds.
    pub image_count: u8,
    pub can_add_more: bool,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct TargetListResponse {
    #[serde(default)]
    pub files: Vec<TargetImage>,
    pub total_count: Option<usize>,
    pub images_count: Option<usize>,
    pub videos_count: Option<usize>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TargetAppendResponse {
    pub uploaded_count: usize,
    pub total_count: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TargetDeleteResponse {
    pub deleted_count: usize,
}

#[derive(Debug, Serialize)]
struct DeleteTargetsRequest<'a> {
    public_ids: &'a [String],
}

/// Decode a backend envelope.
///
/// `success: false` (or a missing flag) becomes [`AppError::Backend`] with the
/// `error` field, falling back to `message`; fields that fail to match `T`
/// become [`AppError::Decode`].
pub fn decode_envelope<T: DeserializeOwned>(value: Value) -> AppResult<T> {
    let success = value.get("success").and_then(Value::as_bool).unwrap_or(false);

    if !success {
        let reason = value
            .get("error")
            .and_then(Value::as_str)
            .or_else(|| value.get("message").and_then(Value::as_str))
            .unwrap_or("Unknown error");
        return Err(AppError::Backend(reason.to_string()));
    }

    serde_json::from_value(value).map_err(|e| AppError::Decode(e.to_string()))
}

// =============================================================================
// Browser implementation
// =============================================================================

/// [`AttendanceApi`] over `fetch`, via gloo-net.
#[derive(Debug, Clone)]
pub struct HttpApi {
    base_url: String,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Media links come back origin-relative; they are served by the backend.
    fn absolute(&self, link: String) -> String {
        if link.starts_with('/') {
            self.url(&link)
        } else {
            link
        }
    }
}

/// Read the JSON body, whatever the status: failures carry their reason there.
async fn read_envelope<T: DeserializeOwned>(response: Response) -> AppResult<T> {
    match response.json::<Value>().await {
        Ok(value) => decode_envelope(value),
        Err(e) if response.ok() => Err(AppError::Decode(e.to_string())),
        Err(_) => Err(AppError::Network(format!(
            "Server error ({}) {}",
            response.status(),
            response.status_text()
        ))),
    }
}

fn network(e: impl std::fmt::Display) -> AppError {
    AppError::Network(e.to_string())
}

fn form_error(e: wasm_bindgen::JsValue) -> AppError {
    AppError::Validation(format!("Failed to build form data: {:?}", e))
}

impl AttendanceApi for HttpApi {
    type File = File;

    async fn list_people(&self) -> AppResult<Vec<Person>> {
        let response = Request::get(&self.url("/api/get_loaded_people"))
            .send()
            .await
            .map_err(network)?;
        let list: PeopleListResponse = read_envelope(response).await?;
        Ok(list
            .people
            .into_iter()
            .map(|mut person| {
                person.image_urls = person
                    .image_urls
                    .into_iter()
                    .map(|link| self.absolute(link))
                    .collect();
                person
            })
            .collect())
    }

    async fn add_person(&self, person: &NewPersonRequest) -> AppResult<AddPersonResponse> {
        let response = Request::post(&self.url("/api/add_person"))
            .json(person)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        read_envelope(response).await
    }

    async fn remove_person(&self, person_id: &str) -> AppResult<MessageResponse> {
        let response = Request::delete(&self.url(&format!("/api/remove_person/{}", person_id)))
            .send()
            .await
            .map_err(network)?;
        read_envelope(response).await
    }

    async fn upload_person_image(
        &self,
        person_id: &str,
        file: &File,
    ) -> AppResult<ImageUploadResponse> {
        let form = FormData::new().map_err(form_error)?;
        form
            .append_with_blob_and_filename("image", file, &file.name())
            .map_err(form_error)?;

        let response = Request::post(&self.url(&format!("/api/upload_image/{}", person_id)))
            .body(form)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        read_envelope(response).await
    }

    async fn list_target_images(&self) -> AppResult<TargetListResponse> {
        let response = Request::get(&self.url("/api/get_target_images"))
            .send()
            .await
            .map_err(network)?;
        let mut listing: TargetListResponse = read_envelope(response).await?;
        for file in &mut listing.files {
            file.url = self.absolute(std::mem::take(&mut file.url));
        }
        Ok(listing)
    }

    async fn append_target_images(&self, files: &[File]) -> AppResult<TargetAppendResponse> {
        let form = FormData::new().map_err(form_error)?;
        for file in files {
            form.append_with_blob_and_filename("target_images", file, &file.name())
                .map_err(form_error)?;
        }

        let response = Request::post(&self.url("/api/append_target_images"))
            .body(form)
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        read_envelope(response).await
    }

    async fn delete_target_images(&self, public_ids: &[String]) -> AppResult<TargetDeleteResponse> {
        let response = Request::post(&self.url("/api/delete_target_images"))
            .json(&DeleteTargetsRequest { public_ids })
            .map_err(network)?
            .send()
            .await
            .map_err(network)?;
        read_envelope(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_upload_response_deserialization() {
        let value = json!({
            "success": true,
            "image_count": 4,
            "can_add_more": true,
            "message": "Image uploaded"
        });

        let response: ImageUploadResponse = decode_envelope(value).unwrap();
        assert_eq!(response.image_count, 4);
        assert!(response.can_add_more);
    }

    #[test]
    fn test_failure_uses_error_then_message() {
        let err = decode_envelope::<MessageResponse>(json!({
            "success": false,
            "error": "Person not found",
            "message": "ignored"
        }))
        .unwrap_err();
        assert_eq!(err, AppError::Backend("Person not found".into()));

        let err = decode_envelope::<MessageResponse>(json!({
            "success": false,
            "message": "username required"
        }))
        .unwrap_err();
        assert_eq!(err, AppError::Backend("username required".into()));
    }

    #[test]
    fn test_missing_success_flag_is_a_failure() {
        let err = decode_envelope::<MessageResponse>(json!({"message": "ok?"})).unwrap_err();
        assert!(matches!(err, AppError::Backend(_)));
    }

    #[test]
    fn test_malformed_success_payload_is_a_decode_error() {
        let err = decode_envelope::<ImageUploadResponse>(json!({
            "success": true,
            "image_count": "three"
        }))
        .unwrap_err();
        assert!(err.is_transport());
    }

    #[test]
    fn test_target_listing_with_counts() {
        let response: TargetListResponse = decode_envelope(json!({
            "success": true,
            "files": [
                {"public_id": "a", "url": "/media/a", "resource_type": "image", "size_bytes": 10},
                {"public_id": "b", "url": "/media/b", "resource_type": "video", "size_bytes": 20}
            ],
            "total_count": 2,
            "images_count": 1,
            "videos_count": 1
        }))
        .unwrap();

        assert_eq!(response.files.len(), 2);
        assert_eq!(response.videos_count, Some(1));
    }

    #[test]
    fn test_base_url_trailing_slash_is_trimmed() {
        let api = HttpApi::new("http://localhost:5000/");
        assert_eq!(api.url("/api/get_loaded_people"), "http://localhost:5000/api/get_loaded_people");
    }

    #[test]
    fn test_media_links_point_at_backend() {
        let api = HttpApi::new("http://localhost:5000/");
        assert_eq!(
            api.absolute("/media/people/101/abc".into()),
            "http://localhost:5000/media/people/101/abc"
        );
        // already absolute, e.g. a CDN
        assert_eq!(
            api.absolute("https://cdn.example.com/a.jpg".into()),
            "https://cdn.example.com/a.jpg"
        );
    }
}
