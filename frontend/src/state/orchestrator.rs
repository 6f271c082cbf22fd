//! Sequential upload of a batch of person images.
//!
//! Files go up one at a time, in selection order, with a short pause
//! between attempts. A failed file does not stop the batch; a max-capacity
//! signal from the backend does. Once the batch is over the roster is
//! refreshed, and after [`PANEL_TEARDOWN_MS`] the progress panel is cleared
//! and the enrollment closes itself if the person now has enough images.
//!
//! All UI effects go through an [`EnrollmentHost`] and are applied only
//! while the session that started the batch is still the current one.

use crate::services::{AttendanceApi, Clock, Notifier, UploadFile};
use crate::state::enrollment::SessionId;
use crate::{
    AppError, AppResult, NotifyKind, MAX_IMAGES_PER_PERSON, MIN_IMAGES_PER_PERSON,
    PANEL_TEARDOWN_MS, PROGRESS_NAME_CHARS, UPLOAD_PACING_MS,
};

/// The UI a batch reports to.
#[allow(async_fn_in_trait)]
pub trait EnrollmentHost {
    /// Whether `session` is still the open one.
    fn is_current(&self, session: SessionId) -> bool;

    fn set_uploading(&self, uploading: bool);

    /// Authoritative image count reported by the backend.
    fn record_progress(&self, total_images: u8);

    fn show_panel(&self, panel: &ProgressPanel);

    fn clear_panel(&self);

    fn close_session(&self);

    async fn refresh_roster(&self);
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PanelTint {
    Neutral,
    Success,
    Warning,
    Error,
}

impl PanelTint {
    pub fn background(&self) -> &'static str {
        match self {
            PanelTint::Neutral => "#f0f8ff",
            PanelTint::Success => "#e8f5e8",
            PanelTint::Warning => "#fff3cd",
            PanelTint::Error => "#ffebee",
        }
    }
}

/// Transient progress shown under the file picker while a batch runs.
#[derive(Clone, Debug, PartialEq)]
pub struct ProgressPanel {
    pub text: String,
    /// 0..=100
    pub percent: u8,
    pub tint: PanelTint,
    /// Files attempted so far; `succeeded + failed == attempted`.
    pub attempted: usize,
    pub succeeded: usize,
    pub failed: usize,
}

impl ProgressPanel {
    pub fn starting() -> Self {
        Self {
            text: "Starting upload...".to_string(),
            percent: 0,
            tint: PanelTint::Neutral,
            attempted: 0,
            succeeded: 0,
            failed: 0,
        }
    }

    fn count(&mut self, report: &BatchReport) {
        self.attempted = report.attempts;
        self.succeeded = report.success_count;
        self.failed = report.error_count;
    }

    /// Tally line under the bar, once something was attempted.
    pub fn tally(&self) -> Option<String> {
        (self.attempted > 0).then(|| format!("✅ {}  ❌ {}", self.succeeded, self.failed))
    }
}

/// Result of one file attempt.
#[derive(Clone, Debug, PartialEq)]
pub enum AttemptOutcome {
    Success { new_count: u8, can_add_more: bool },
    Failure { reason: String, max_reached: bool },
}

/// How a whole batch went.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BatchOutcome {
    AllSucceeded,
    Partial,
    Failed,
}

impl BatchOutcome {
    pub fn classify(success_count: usize, error_count: usize) -> Self {
        match (success_count, error_count) {
            (s, 0) if s > 0 => BatchOutcome::AllSucceeded,
            (s, _) if s > 0 => BatchOutcome::Partial,
            _ => BatchOutcome::Failed,
        }
    }

    pub fn kind(&self) -> NotifyKind {
        match self {
            BatchOutcome::AllSucceeded => NotifyKind::Success,
            BatchOutcome::Partial => NotifyKind::Warning,
            BatchOutcome::Failed => NotifyKind::Error,
        }
    }

    pub fn tint(&self) -> PanelTint {
        match self {
            BatchOutcome::AllSucceeded => PanelTint::Success,
            BatchOutcome::Partial => PanelTint::Warning,
            BatchOutcome::Failed => PanelTint::Error,
        }
    }

    pub fn message(&self, success_count: usize, error_count: usize, total_files: usize) -> String {
        match self {
            BatchOutcome::AllSucceeded => format!(
                "🎉 All images uploaded successfully! ({}/{})",
                success_count, total_files
            ),
            BatchOutcome::Partial => format!(
                "⚠️ Uploaded {} images, {} failed",
                success_count, error_count
            ),
            BatchOutcome::Failed => format!("❌ All uploads failed ({} errors)", error_count),
        }
    }
}

/// Counters of a batch. `success_count + error_count == attempts` always.
#[derive(Clone, Debug, PartialEq)]
pub struct BatchReport {
    pub total_files: usize,
    pub attempts: usize,
    pub success_count: usize,
    pub error_count: usize,
    /// Last count reported by the backend, or the count known at start.
    pub total_images: u8,
    /// The backend said no more images fit.
    pub capacity_reached: bool,
    pub outcome: BatchOutcome,
}

impl BatchReport {
    fn new(total_files: usize, known_count: u8) -> Self {
        Self {
            total_files,
            attempts: 0,
            success_count: 0,
            error_count: 0,
            total_images: known_count,
            capacity_reached: false,
            outcome: BatchOutcome::Failed,
        }
    }

    /// Account for one attempt. Returns true when the batch must stop.
    fn record(&mut self, outcome: &AttemptOutcome) -> bool {
        self.attempts += 1;
        match outcome {
            AttemptOutcome::Success { new_count, can_add_more } => {
                self.success_count += 1;
                self.total_images = *new_count;
                self.capacity_reached |= !can_add_more;
            }
            AttemptOutcome::Failure { max_reached, .. } => {
                self.error_count += 1;
                self.capacity_reached |= *max_reached;
            }
        }
        self.outcome = BatchOutcome::classify(self.success_count, self.error_count);
        self.capacity_reached
    }

    pub fn summary(&self) -> String {
        self.outcome
            .message(self.success_count, self.error_count, self.total_files)
    }
}

/// Client-side checks done before any request.
pub fn validate_selection(count: usize) -> AppResult<()> {
    if count == 0 {
        return Err(AppError::Validation("No files selected".into()));
    }
    if count > usize::from(MAX_IMAGES_PER_PERSON) {
        return Err(AppError::Validation(format!(
            "Too many files selected: {} (at most {})",
            count, MAX_IMAGES_PER_PERSON
        )));
    }
    Ok(())
}

/// Does a backend refusal mean the person is full?
pub fn is_capacity_signal(reason: &str) -> bool {
    let reason = reason.to_lowercase();
    ["maximum", "limit", "מקסימום"]
        .iter()
        .any(|needle| reason.contains(needle))
}

/// File name as shown in progress text.
pub fn short_name(name: &str) -> String {
    if name.chars().count() > PROGRESS_NAME_CHARS {
        let head: String = name.chars().take(PROGRESS_NAME_CHARS).collect();
        format!("{}...", head)
    } else {
        name.to_string()
    }
}

fn percent(done: usize, total: usize) -> u8 {
    (done * 100 / total.max(1)).min(100) as u8
}

pub struct UploadOrchestrator<'a, A, C, N> {
    api: &'a A,
    clock: &'a C,
    notifier: &'a N,
}

impl<'a, A, C, N> UploadOrchestrator<'a, A, C, N>
where
    A: AttendanceApi,
    C: Clock,
    N: Notifier,
{
    pub fn new(api: &'a A, clock: &'a C, notifier: &'a N) -> Self {
        Self { api, clock, notifier }
    }

    /// Upload `files` for `person_id` on behalf of `session`.
    ///
    /// Per-file failures are reported through the notifier, not returned;
    /// `Err` only means the selection was refused before any request.
    pub async fn upload<H: EnrollmentHost>(
        &self,
        host: &H,
        session: SessionId,
        person_id: &str,
        known_count: u8,
        files: &[A::File],
    ) -> AppResult<BatchReport> {
        if let Err(err) = validate_selection(files.len()) {
            self.notifier.notify(&err.user_message(), NotifyKind::Error);
            return Err(err);
        }

        let total_files = files.len();
        log::info!("📤 Uploading {} images for person {}", total_files, person_id);

        let mut panel = ProgressPanel::starting();
        if host.is_current(session) {
            host.set_uploading(true);
            host.show_panel(&panel);
        }

        let mut report = BatchReport::new(total_files, known_count);
        for (index, file) in files.iter().enumerate() {
            let name = file.file_name();
            panel.text = format!(
                "📤 Uploading image {} of {}: {}",
                index + 1,
                total_files,
                short_name(&name)
            );
            if host.is_current(session) {
                host.show_panel(&panel);
            }

            let outcome = self.attempt(person_id, file, &name).await;
            let stop = report.record(&outcome);

            if let AttemptOutcome::Success { new_count, can_add_more } = outcome {
                if host.is_current(session) {
                    host.record_progress(new_count);
                }
                if !can_add_more && index + 1 < total_files {
                    self.notifier.notify(
                        &format!(
                            "Maximum of {} images reached, remaining files were not uploaded",
                            MAX_IMAGES_PER_PERSON
                        ),
                        NotifyKind::Warning,
                    );
                }
            }

            panel.percent = percent(index + 1, total_files);
            panel.count(&report);
            if host.is_current(session) {
                host.show_panel(&panel);
            }

            if stop {
                log::warn!("Batch for {} stopped after {} attempts", person_id, report.attempts);
                break;
            }
            if index + 1 < total_files {
                self.clock.sleep(UPLOAD_PACING_MS).await;
            }
        }

        let summary = report.summary();
        let mut panel = ProgressPanel {
            text: summary.clone(),
            percent: 100,
            tint: report.outcome.tint(),
            ..ProgressPanel::starting()
        };
        panel.count(&report);
        if host.is_current(session) {
            host.show_panel(&panel);
            host.set_uploading(false);
        }
        self.notifier.notify(&summary, report.outcome.kind());

        host.refresh_roster().await;

        self.clock.sleep(PANEL_TEARDOWN_MS).await;
        if host.is_current(session) {
            host.clear_panel();
            if report.total_images >= MIN_IMAGES_PER_PERSON {
                host.close_session();
            }
        }

        Ok(report)
    }

    async fn attempt(&self, person_id: &str, file: &A::File, name: &str) -> AttemptOutcome {
        match self.api.upload_person_image(person_id, file).await {
            Ok(response) => {
                log::info!("✅ Uploaded {} ({} images)", name, response.image_count);
                AttemptOutcome::Success {
                    new_count: response.image_count,
                    can_add_more: response.can_add_more,
                }
            }
            Err(AppError::Backend(reason)) => {
                log::warn!("❌ Upload of {} refused: {}", name, reason);
                self.notifier.notify(&reason, NotifyKind::Error);
                AttemptOutcome::Failure {
                    max_reached: is_capacity_signal(&reason),
                    reason,
                }
            }
            Err(err) => {
                log::error!("❌ Upload of {} failed: {}", name, err);
                self.notifier
                    .notify(&format!("Failed to upload {}", short_name(name)), NotifyKind::Error);
                AttemptOutcome::Failure {
                    reason: err.to_string(),
                    max_reached: false,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::enrollment::CompletionBand;
    use crate::testing::*;
    use futures::executor::block_on;

    fn run(
        api: &FakeApi,
        host: &TestHost,
        known: u8,
        names: &[&str],
    ) -> (AppResult<BatchReport>, RecordingNotifier, InstantClock) {
        let clock = InstantClock::default();
        let notifier = RecordingNotifier::default();
        let session = host.open("101", "Alice Cohen", known);
        let files = files(names);
        let result = {
            let orchestrator = UploadOrchestrator::new(api, &clock, &notifier);
            block_on(orchestrator.upload(host, session, "101", known, &files))
        };
        (result, notifier, clock)
    }

    #[test]
    fn test_six_files_rejected_without_request() {
        let api = FakeApi::default();
        let host = TestHost::default();

        let (result, notifier, _) = run(&api, &host, 0, &["1", "2", "3", "4", "5", "6"]);

        assert!(matches!(result, Err(AppError::Validation(_))));
        assert_eq!(api.count_calls("upload_image"), 0);
        assert_eq!(notifier.last_kind(), Some(NotifyKind::Error));
        assert!(notifier.last_message().unwrap().contains("Too many files"));
        assert_eq!(host.refreshes.get(), 0);
    }

    #[test]
    fn test_empty_selection_rejected() {
        let api = FakeApi::default();
        let host = TestHost::default();

        let (result, notifier, _) = run(&api, &host, 0, &[]);

        assert!(result.is_err());
        assert_eq!(notifier.last_message().as_deref(), Some("No files selected"));
        assert_eq!(api.count_calls("upload_image"), 0);
    }

    #[test]
    fn test_three_files_from_empty() {
        let api = FakeApi::default();
        api.script_uploads([ok_upload(1, true), ok_upload(2, true), ok_upload(3, true)]);
        let host = TestHost::default();

        let (result, notifier, clock) = run(&api, &host, 0, &["a.jpg", "b.jpg", "c.jpg"]);
        let report = result.unwrap();

        assert_eq!(api.count_calls("upload_image"), 3);
        assert_eq!(
            api.calls(),
            vec!["upload_image:101:a.jpg", "upload_image:101:b.jpg", "upload_image:101:c.jpg"]
        );
        assert_eq!(report.success_count, 3);
        assert_eq!(report.success_count + report.error_count, report.attempts);
        assert_eq!(report.outcome, BatchOutcome::AllSucceeded);

        let last = *host.bands.borrow().last().unwrap();
        assert_eq!(last, CompletionBand::Sufficient { uploaded: 3, remaining: 2 });
        assert!(last.finish_visible());

        assert_eq!(host.refreshes.get(), 1);
        // pacing between files only, then the teardown delay
        assert_eq!(clock.sleeps(), vec![300, 300, 3000]);
        // enough images: auto-closed and panel cleared
        assert!(host.enrollment.borrow().current().is_none());
        assert!(host.panel.borrow().is_none());
        assert_eq!(notifier.last_kind(), Some(NotifyKind::Success));
    }

    #[test]
    fn test_capacity_signal_stops_batch() {
        let api = FakeApi::default();
        api.script_uploads([ok_upload(1, true), ok_upload(2, false), ok_upload(3, true)]);
        let host = TestHost::default();

        let (result, notifier, _) = run(&api, &host, 0, &["a.jpg", "b.jpg", "c.jpg"]);
        let report = result.unwrap();

        assert_eq!(api.count_calls("upload_image"), 2);
        assert_eq!(report.attempts, 2);
        assert!(report.capacity_reached);
        assert!(notifier.has_kind(NotifyKind::Warning));

        let session = host.enrollment.borrow().current().cloned().unwrap();
        assert_eq!(session.uploaded_count(), 2);
        assert!(!session.band().finish_visible());
    }

    #[test]
    fn test_last_file_filling_up_skips_nothing() {
        let api = FakeApi::default();
        api.script_uploads([ok_upload(5, false)]);
        let host = TestHost::default();

        let (result, notifier, _) = run(&api, &host, 4, &["only.jpg"]);
        let report = result.unwrap();

        assert!(report.capacity_reached);
        assert_eq!(report.outcome, BatchOutcome::AllSucceeded);
        assert!(!notifier.has_kind(NotifyKind::Warning));
        assert!(notifier.has_message("🎉 All images uploaded successfully! (1/1)"));
    }

    #[test]
    fn test_counters_add_up_during_batch() {
        let api = FakeApi::default();
        api.script_uploads([
            ok_upload(1, true),
            Err(AppError::Backend("No face detected".into())),
            Err(AppError::Network("offline".into())),
            ok_upload(2, true),
        ]);
        let host = TestHost::default();

        let report = run(&api, &host, 0, &["a.jpg", "b.jpg", "c.jpg", "d.jpg"])
            .0
            .unwrap();

        let panels = host.panels.borrow();
        for panel in panels.iter() {
            assert_eq!(panel.succeeded + panel.failed, panel.attempted);
        }
        let attempted: Vec<usize> = panels.iter().map(|p| p.attempted).collect();
        assert!(attempted.windows(2).all(|w| w[0] <= w[1]));
        assert!(attempted.contains(&2));

        let last = panels.last().unwrap();
        assert_eq!(last.attempted, report.attempts);
        assert_eq!((last.succeeded, last.failed), (2, 2));
        assert_eq!(last.tally().as_deref(), Some("✅ 2  ❌ 2"));
        assert_eq!(ProgressPanel::starting().tally(), None);
    }

    #[test]
    fn test_failure_does_not_abort_batch() {
        let api = FakeApi::default();
        api.script_uploads([
            ok_upload(1, true),
            Err(AppError::Backend("No face detected".into())),
            ok_upload(2, true),
        ]);
        let host = TestHost::default();

        let (result, notifier, _) = run(&api, &host, 0, &["a.jpg", "b.jpg", "c.jpg"]);
        let report = result.unwrap();

        assert_eq!(api.count_calls("upload_image"), 3);
        assert_eq!(report.success_count, 2);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.outcome, BatchOutcome::Partial);
        assert!(notifier.has_message("No face detected"));
        assert_eq!(notifier.last_kind(), Some(NotifyKind::Warning));
        // 2 < 3: stays open, panel cleared
        assert!(host.enrollment.borrow().current().is_some());
        assert!(host.panel.borrow().is_none());
    }

    #[test]
    fn test_transport_error_counts_as_failure() {
        let api = FakeApi::default();
        api.script_uploads([Err(AppError::Network("offline".into())), ok_upload(4, true)]);
        let host = TestHost::default();

        let (result, notifier, _) = run(&api, &host, 3, &["a.jpg", "b.jpg"]);
        let report = result.unwrap();

        assert_eq!(report.attempts, 2);
        assert_eq!(report.error_count, 1);
        assert_eq!(report.total_images, 4);
        assert!(notifier.has_message("Failed to upload a.jpg"));
    }

    #[test]
    fn test_max_reached_error_stops_batch() {
        let api = FakeApi::default();
        api.script_uploads([Err(AppError::Backend(
            "Maximum of 5 images reached for this person".into(),
        ))]);
        let host = TestHost::default();

        let (result, _, _) = run(&api, &host, 4, &["a.jpg", "b.jpg", "c.jpg"]);
        let report = result.unwrap();

        assert_eq!(api.count_calls("upload_image"), 1);
        assert_eq!(report.outcome, BatchOutcome::Failed);
        assert!(report.capacity_reached);
    }

    #[test]
    fn test_total_failure_leaves_session_open() {
        let api = FakeApi::default();
        api.script_uploads([
            Err(AppError::Backend("bad".into())),
            Err(AppError::Backend("bad".into())),
        ]);
        let host = TestHost::default();

        let (result, notifier, _) = run(&api, &host, 0, &["a.jpg", "b.jpg"]);
        let report = result.unwrap();

        assert_eq!(report.outcome, BatchOutcome::Failed);
        assert_eq!(report.summary(), "❌ All uploads failed (2 errors)");
        assert_eq!(notifier.last_kind(), Some(NotifyKind::Error));
        assert!(host.enrollment.borrow().current().is_some());
        assert_eq!(host.panels.borrow().last().unwrap().tint, PanelTint::Error);
    }

    #[test]
    fn test_stale_batch_leaves_new_session_alone() {
        let api = FakeApi::default();
        api.script_uploads([ok_upload(3, true)]);
        let host = TestHost::default();
        // The user opens another person's modal while the batch finishes.
        host.reopen_on_refresh("202", "Bob Levi", 1);

        let (result, _, _) = run(&api, &host, 2, &["a.jpg"]);
        assert_eq!(result.unwrap().total_images, 3);

        let enrollment = host.enrollment.borrow();
        let current = enrollment.current().unwrap();
        assert_eq!(current.person_id(), "202");
        assert_eq!(current.uploaded_count(), 1);
        assert_eq!(host.clears.get(), 0);
    }

    #[test]
    fn test_progress_text_and_percent() {
        let api = FakeApi::default();
        api.script_uploads([ok_upload(1, true), ok_upload(2, true)]);
        let host = TestHost::default();

        run(&api, &host, 0, &["a_really_long_file_name_from_camera.jpg", "b.jpg"])
            .0
            .unwrap();

        let panels = host.panels.borrow();
        assert_eq!(panels[0], ProgressPanel::starting());
        assert_eq!(panels[1].text, "📤 Uploading image 1 of 2: a_really_long_file_n...");
        assert_eq!(panels[2].percent, 50);
        assert_eq!(panels.last().unwrap().percent, 100);
        assert_eq!(panels.last().unwrap().tint, PanelTint::Success);
    }

    #[test]
    fn test_capacity_signal_detection() {
        assert!(is_capacity_signal("Maximum of 5 images reached"));
        assert!(is_capacity_signal("image LIMIT exceeded"));
        assert!(!is_capacity_signal("No face detected"));
    }

    #[test]
    fn test_outcome_classification() {
        assert_eq!(BatchOutcome::classify(3, 0), BatchOutcome::AllSucceeded);
        assert_eq!(BatchOutcome::classify(1, 2), BatchOutcome::Partial);
        assert_eq!(BatchOutcome::classify(0, 2), BatchOutcome::Failed);
        assert_eq!(PanelTint::Warning.background(), "#fff3cd");
    }
}
