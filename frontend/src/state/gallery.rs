//! Target images: reference media matched against camera frames.
//!
//! Unlike person enrollment there is no count constraint here. A batch of
//! files goes up in one multipart request and a selection is deleted in
//! one request. The listing is replaced wholesale on every successful fetch.

use std::collections::BTreeSet;

use crate::services::{
    notify_failure, AttendanceApi, Notifier, TargetAppendResponse, TargetListResponse,
};
use crate::{AppError, AppResult, MediaKind, NotifyKind, TargetImage};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct GalleryStats {
    pub total: usize,
    pub images: usize,
    pub videos: usize,
}

/// The "delete selected" action, derived from the checked set only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DeleteButton {
    pub enabled: bool,
    pub label: String,
}

impl DeleteButton {
    pub fn for_selection(count: usize) -> Self {
        if count > 0 {
            Self {
                enabled: true,
                label: format!("🗑️ Delete {} selected", count),
            }
        } else {
            Self {
                enabled: false,
                label: "🗑️ Delete selected".to_string(),
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct GalleryCard {
    pub public_id: String,
    pub url: String,
    pub kind: MediaKind,
    pub size_label: String,
    pub checked: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub enum GalleryView {
    Empty,
    Cards(Vec<GalleryCard>),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct TargetGallery {
    images: Vec<TargetImage>,
    selected: BTreeSet<String>,
    stats: GalleryStats,
}

impl TargetGallery {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the listing. Selected ids that no longer exist are dropped.
    pub fn replace(&mut self, listing: TargetListResponse) {
        let videos = listing
            .files
            .iter()
            .filter(|f| f.resource_type == MediaKind::Video)
            .count();
        let total = listing.files.len();
        self.stats = GalleryStats {
            total: listing.total_count.unwrap_or(total),
            images: listing.images_count.unwrap_or(total - videos),
            videos: listing.videos_count.unwrap_or(videos),
        };
        self.images = listing.files;

        let images = &self.images;
        self.selected
            .retain(|id| images.iter().any(|image| &image.public_id == id));
    }

    /// Apply a finished deletion of `public_ids`. Without a fresh listing
    /// the deleted files are dropped locally.
    pub fn apply_deletion(&mut self, public_ids: &[String], listing: Option<TargetListResponse>) {
        match listing {
            Some(listing) => self.replace(listing),
            None => self.forget(public_ids),
        }
    }

    fn forget(&mut self, public_ids: &[String]) {
        let before = self.images.len();
        self.images
            .retain(|image| !public_ids.contains(&image.public_id));
        self.selected.retain(|id| !public_ids.contains(id));

        let removed = before - self.images.len();
        let videos = self
            .images
            .iter()
            .filter(|f| f.resource_type == MediaKind::Video)
            .count();
        self.stats = GalleryStats {
            total: self.stats.total.saturating_sub(removed),
            images: self.images.len() - videos,
            videos,
        };
    }

    pub fn images(&self) -> &[TargetImage] {
        &self.images
    }

    pub fn stats(&self) -> GalleryStats {
        self.stats
    }

    pub fn is_selected(&self, public_id: &str) -> bool {
        self.selected.contains(public_id)
    }

    pub fn set_selected(&mut self, public_id: &str, checked: bool) {
        if checked {
            if self.images.iter().any(|i| i.public_id == public_id) {
                self.selected.insert(public_id.to_string());
            }
        } else {
            self.selected.remove(public_id);
        }
    }

    pub fn select_all(&mut self) {
        self.selected = self.images.iter().map(|i| i.public_id.clone()).collect();
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    pub fn selection(&self) -> Vec<String> {
        self.selected.iter().cloned().collect()
    }

    pub fn delete_button(&self) -> DeleteButton {
        DeleteButton::for_selection(self.selected.len())
    }

    pub fn view(&self) -> GalleryView {
        if self.images.is_empty() {
            return GalleryView::Empty;
        }
        GalleryView::Cards(
            self.images
                .iter()
                .map(|image| GalleryCard {
                    public_id: image.public_id.clone(),
                    url: image.url.clone(),
                    kind: image.resource_type,
                    size_label: format_file_size(image.size_bytes),
                    checked: self.is_selected(&image.public_id),
                })
                .collect(),
        )
    }
}

/// Human readable size, 1024-based.
pub fn format_file_size(bytes: u64) -> String {
    if bytes == 0 {
        return "0 Bytes".to_string();
    }
    const UNITS: [&str; 4] = ["Bytes", "KB", "MB", "GB"];

    let mut value = bytes as f64;
    let mut unit = 0;
    while value >= 1024.0 && unit < UNITS.len() - 1 {
        value /= 1024.0;
        unit += 1;
    }

    let rounded = format!("{:.2}", value);
    let trimmed = rounded.trim_end_matches('0').trim_end_matches('.');
    format!("{} {}", trimmed, UNITS[unit])
}

/// Outcome of a delete request the user went through with.
#[derive(Clone, Debug, PartialEq)]
pub enum DeleteResult {
    /// The user declined the confirmation.
    Cancelled,
    Deleted {
        deleted_count: usize,
        /// Fresh listing, when the follow-up fetch worked.
        listing: Option<TargetListResponse>,
    },
}

/// Fetch the listing, reporting failures.
pub async fn load_targets<A: AttendanceApi>(
    api: &A,
    notifier: &impl Notifier,
) -> AppResult<TargetListResponse> {
    let result = api.list_target_images().await;
    if let Err(err) = &result {
        notify_failure(notifier, err, "Failed to load target images");
    }
    result
}

/// Upload a batch of target files in one request.
pub async fn upload_targets<A: AttendanceApi>(
    api: &A,
    notifier: &impl Notifier,
    files: &[A::File],
) -> AppResult<TargetAppendResponse> {
    if files.is_empty() {
        let err = AppError::Validation("No files selected".into());
        notifier.notify(&err.user_message(), NotifyKind::Error);
        return Err(err);
    }

    match api.append_target_images(files).await {
        Ok(response) => {
            notifier.notify(
                &format!(
                    "🎉 Uploaded {} target files ({} in gallery)",
                    response.uploaded_count, response.total_count
                ),
                NotifyKind::Success,
            );
            Ok(response)
        }
        Err(err) => {
            notify_failure(notifier, &err, "Failed to upload target images");
            Err(err)
        }
    }
}

/// Delete the selected target files after confirmation.
///
/// `confirm` receives the question to ask and is not called for an empty
/// selection.
pub async fn delete_selected<A: AttendanceApi>(
    api: &A,
    notifier: &impl Notifier,
    selection: &[String],
    confirm: impl FnOnce(&str) -> bool,
) -> AppResult<DeleteResult> {
    if selection.is_empty() {
        let err = AppError::Validation("No files selected".into());
        notifier.notify(&err.user_message(), NotifyKind::Error);
        return Err(err);
    }

    if !confirm(&format!("Delete {} selected files?", selection.len())) {
        return Ok(DeleteResult::Cancelled);
    }

    let deleted_count = match api.delete_target_images(selection).await {
        Ok(response) => response.deleted_count,
        Err(err) => {
            notify_failure(notifier, &err, "Failed to delete target images");
            return Err(err);
        }
    };
    notifier.notify(
        &format!("Deleted {} target files", deleted_count),
        NotifyKind::Success,
    );

    let listing = load_targets(api, notifier).await.ok();
    Ok(DeleteResult::Deleted {
        deleted_count,
        listing,
    })
}
