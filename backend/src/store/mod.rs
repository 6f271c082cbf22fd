//! In-memory roster, target gallery and media blobs.
//!
//! The store keeps people in insertion order. Uploaded bytes live in a
//! single media map keyed by a path-like key (`people/<id>/<uuid>`,
//! `targets/<uuid>`), served back under `/media/<key>`.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::{StoreError, StoreResult};

/// Images a person may hold unless configured otherwise.
pub const DEFAULT_MAX_IMAGES: usize = 5;

#[derive(Debug, Clone)]
pub struct StoredPerson {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    /// Media keys, in upload order.
    pub images: Vec<String>,
    pub is_present: bool,
    pub created_at: DateTime<Utc>,
}

impl StoredPerson {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceType {
    Image,
    Video,
}

impl ResourceType {
    /// `video/*` is a video, anything else an image.
    pub fn from_content_type(content_type: &str) -> Self {
        if content_type.starts_with("video/") {
            ResourceType::Video
        } else {
            ResourceType::Image
        }
    }
}

#[derive(Debug, Clone)]
pub struct TargetFile {
    pub public_id: String,
    pub file_name: String,
    pub resource_type: ResourceType,
    pub size_bytes: usize,
    pub uploaded_at: DateTime<Utc>,
}

impl TargetFile {
    pub fn media_key(&self) -> String {
        format!("targets/{}", self.public_id)
    }
}

#[derive(Debug, Clone)]
pub struct MediaBlob {
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Counts reported with the target listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetCounts {
    pub total: usize,
    pub images: usize,
    pub videos: usize,
}

#[derive(Debug)]
pub struct Store {
    max_images: usize,
    people: Vec<StoredPerson>,
    targets: Vec<TargetFile>,
    media: HashMap<String, MediaBlob>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IMAGES)
    }
}

fn required(label: &'static str, value: &str) -> StoreResult<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(StoreError::MissingField(label))
    } else {
        Ok(value.to_string())
    }
}

impl Store {
    pub fn new(max_images: usize) -> Self {
        Self {
            max_images,
            people: Vec::new(),
            targets: Vec::new(),
            media: HashMap::new(),
        }
    }

    /// Two demo people without images.
    pub fn seed_demo(&mut self) {
        for (first, last, id) in [("Alice", "Cohen", "101"), ("Bob", "Levi", "202")] {
            if let Err(e) = self.add_person(first, last, id) {
                tracing::debug!("Seed skipped {}: {}", id, e);
            }
        }
    }

    pub fn max_images(&self) -> usize {
        self.max_images
    }

    pub fn people(&self) -> &[StoredPerson] {
        &self.people
    }

    pub fn person(&self, id: &str) -> Option<&StoredPerson> {
        self.people.iter().find(|p| p.id == id)
    }

    pub fn add_person(
        &mut self,
        first_name: &str,
        last_name: &str,
        id_number: &str,
    ) -> StoreResult<&StoredPerson> {
        let first_name = required("First name", first_name)?;
        let last_name = required("Last name", last_name)?;
        let id = required("ID number", id_number)?;
        if self.person(&id).is_some() {
            return Err(StoreError::DuplicatePerson(id));
        }

        self.people.push(StoredPerson {
            id,
            first_name,
            last_name,
            images: Vec::new(),
            is_present: false,
            created_at: Utc::now(),
        });
        let index = self.people.len() - 1;
        Ok(&self.people[index])
    }

    /// Remove a person together with their images.
    pub fn remove_person(&mut self, id: &str) -> StoreResult<StoredPerson> {
        let index = self
            .people
            .iter()
            .position(|p| p.id == id)
            .ok_or_else(|| StoreError::PersonNotFound(id.to_string()))?;
        let person = self.people.remove(index);
        for key in &person.images {
            self.media.remove(key);
        }
        Ok(person)
    }

    /// Store one image for a person; returns the new image count.
    pub fn add_person_image(
        &mut self,
        id: &str,
        content_type: &str,
        bytes: Vec<u8>,
    ) -> StoreResult<usize> {
        let max_images = self.max_images;
        let person = self
            .people
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| StoreError::PersonNotFound(id.to_string()))?;
        if person.images.len() >= max_images {
            return Err(StoreError::MaxImagesReached(max_images));
        }

        let key = format!("people/{}/{}", person.id, Uuid::new_v4());
        person.images.push(key.clone());
        let count = person.images.len();
        self.media.insert(
            key,
            MediaBlob {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        Ok(count)
    }

    pub fn targets(&self) -> &[TargetFile] {
        &self.targets
    }

    pub fn target_counts(&self) -> TargetCounts {
        let videos = self
            .targets
            .iter()
            .filter(|t| t.resource_type == ResourceType::Video)
            .count();
        TargetCounts {
            total: self.targets.len(),
            images: self.targets.len() - videos,
            videos,
        }
    }

    pub fn add_target(&mut self, file_name: &str, content_type: &str, bytes: Vec<u8>) -> &TargetFile {
        let target = TargetFile {
            public_id: Uuid::new_v4().to_string(),
            file_name: file_name.to_string(),
            resource_type: ResourceType::from_content_type(content_type),
            size_bytes: bytes.len(),
            uploaded_at: Utc::now(),
        };
        self.media.insert(
            target.media_key(),
            MediaBlob {
                content_type: content_type.to_string(),
                bytes,
            },
        );
        self.targets.push(target);
        let index = self.targets.len() - 1;
        &self.targets[index]
    }

    /// Delete targets by public id. Unknown ids are skipped and not counted.
    pub fn delete_targets(&mut self, public_ids: &[String]) -> StoreResult<usize> {
        if public_ids.is_empty() {
            return Err(StoreError::EmptySelection);
        }

        let mut deleted = 0;
        for public_id in public_ids {
            if let Some(index) = self.targets.iter().position(|t| &t.public_id == public_id) {
                let target = self.targets.remove(index);
                self.media.remove(&target.media_key());
                deleted += 1;
            }
        }
        Ok(deleted)
    }

    pub fn media(&self, key: &str) -> Option<&MediaBlob> {
        self.media.get(key)
    }
}
