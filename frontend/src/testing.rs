//! In-memory fakes for the service traits, shared by unit tests.

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use crate::services::*;
use crate::state::enrollment::{CompletionBand, Enrollment, SessionId};
use crate::state::orchestrator::{EnrollmentHost, ProgressPanel};
use crate::state::people::PeopleHost;
use crate::{AppError, AppResult, NotifyKind, Person};

#[derive(Debug, Clone, PartialEq)]
pub struct FakeFile {
    pub name: String,
}

impl UploadFile for FakeFile {
    fn file_name(&self) -> String {
        self.name.clone()
    }
}

pub fn files(names: &[&str]) -> Vec<FakeFile> {
    names
        .iter()
        .map(|n| FakeFile { name: n.to_string() })
        .collect()
}

pub fn ok_upload(image_count: u8, can_add_more: bool) -> AppResult<ImageUploadResponse> {
    Ok(ImageUploadResponse {
        image_count,
        can_add_more,
        message: String::new(),
    })
}

pub fn person(id: &str, first: &str, last: &str, images: usize) -> Person {
    Person {
        id: id.to_string(),
        first_name: first.to_string(),
        last_name: last.to_string(),
        image_urls: (1..=images).map(|i| format!("/media/{}/{}", id, i)).collect(),
        is_present: false,
    }
}

type Script<T> = RefCell<VecDeque<AppResult<T>>>;

fn next<T>(script: &Script<T>) -> AppResult<T> {
    script
        .borrow_mut()
        .pop_front()
        .unwrap_or_else(|| Err(AppError::Network("no scripted response".into())))
}

/// Scripted backend. Unscripted calls fail with a network error.
#[derive(Default)]
pub struct FakeApi {
    pub people: Script<Vec<Person>>,
    pub adds: Script<AddPersonResponse>,
    pub removes: Script<MessageResponse>,
    pub uploads: Script<ImageUploadResponse>,
    pub target_lists: Script<TargetListResponse>,
    pub target_appends: Script<TargetAppendResponse>,
    pub target_deletes: Script<TargetDeleteResponse>,
    calls: RefCell<Vec<String>>,
}

impl FakeApi {
    pub fn script_uploads(&self, responses: impl IntoIterator<Item = AppResult<ImageUploadResponse>>) {
        self.uploads.borrow_mut().extend(responses);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    pub fn count_calls(&self, prefix: &str) -> usize {
        self.calls
            .borrow()
            .iter()
            .filter(|c| c.starts_with(prefix))
            .count()
    }

    fn log(&self, call: String) {
        self.calls.borrow_mut().push(call);
    }
}

impl AttendanceApi for FakeApi {
    type File = FakeFile;

    async fn list_people(&self) -> AppResult<Vec<Person>> {
        self.log("get_loaded_people".into());
        next(&self.people)
    }

    async fn add_person(&self, person: &NewPersonRequest) -> AppResult<AddPersonResponse> {
        self.log(format!("add_person:{}", person.id_number));
        next(&self.adds)
    }

    async fn remove_person(&self, person_id: &str) -> AppResult<MessageResponse> {
        self.log(format!("remove_person:{}", person_id));
        next(&self.removes)
    }

    async fn upload_person_image(
        &self,
        person_id: &str,
        file: &FakeFile,
    ) -> AppResult<ImageUploadResponse> {
        self.log(format!("upload_image:{}:{}", person_id, file.name));
        next(&self.uploads)
    }

    async fn list_target_images(&self) -> AppResult<TargetListResponse> {
        self.log("get_target_images".into());
        next(&self.target_lists)
    }

    async fn append_target_images(&self, files: &[FakeFile]) -> AppResult<TargetAppendResponse> {
        self.log(format!("append_target_images:{}", files.len()));
        next(&self.target_appends)
    }

    async fn delete_target_images(&self, public_ids: &[String]) -> AppResult<TargetDeleteResponse> {
        self.log(format!("delete_target_images:{}", public_ids.join(",")));
        next(&self.target_deletes)
    }
}

/// Clock that returns at once and remembers what it was asked.
#[derive(Default)]
pub struct InstantClock {
    sleeps: RefCell<Vec<u32>>,
}

impl InstantClock {
    pub fn sleeps(&self) -> Vec<u32> {
        self.sleeps.borrow().clone()
    }
}

impl Clock for InstantClock {
    async fn sleep(&self, millis: u32) {
        self.sleeps.borrow_mut().push(millis);
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    pub seen: RefCell<Vec<(String, NotifyKind)>>,
}

impl RecordingNotifier {
    pub fn last_message(&self) -> Option<String> {
        self.seen.borrow().last().map(|(m, _)| m.clone())
    }

    pub fn last_kind(&self) -> Option<NotifyKind> {
        self.seen.borrow().last().map(|(_, k)| *k)
    }

    pub fn has_kind(&self, kind: NotifyKind) -> bool {
        self.seen.borrow().iter().any(|(_, k)| *k == kind)
    }

    pub fn has_message(&self, message: &str) -> bool {
        self.seen.borrow().iter().any(|(m, _)| m == message)
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, kind: NotifyKind) {
        self.seen.borrow_mut().push((message.to_string(), kind));
    }
}

#[derive(Default)]
pub struct MemoryCache {
    pub stored: RefCell<Option<Vec<Person>>>,
}

impl RosterCache for MemoryCache {
    fn load(&self) -> Option<Vec<Person>> {
        self.stored.borrow().clone()
    }

    fn store(&self, people: &[Person]) {
        *self.stored.borrow_mut() = Some(people.to_vec());
    }
}

/// Enrollment UI stand-in.
#[derive(Default)]
pub struct TestHost {
    pub enrollment: RefCell<Enrollment>,
    pub panel: RefCell<Option<ProgressPanel>>,
    /// Every panel ever shown.
    pub panels: RefCell<Vec<ProgressPanel>>,
    pub bands: RefCell<Vec<CompletionBand>>,
    pub refreshes: Cell<usize>,
    pub clears: Cell<usize>,
    pub form_closes: Cell<usize>,
    reopen: RefCell<Option<(String, String, usize)>>,
}

impl TestHost {
    pub fn open(&self, person_id: &str, name: &str, known: u8) -> SessionId {
        self.enrollment
            .borrow_mut()
            .open(person_id, name, usize::from(known))
    }

    /// Open another session while the roster refresh is in flight.
    pub fn reopen_on_refresh(&self, person_id: &str, name: &str, known: usize) {
        *self.reopen.borrow_mut() = Some((person_id.to_string(), name.to_string(), known));
    }
}

impl EnrollmentHost for TestHost {
    fn is_current(&self, session: SessionId) -> bool {
        self.enrollment.borrow().is_current(session)
    }

    fn set_uploading(&self, uploading: bool) {
        self.enrollment.borrow_mut().set_uploading(uploading);
    }

    fn record_progress(&self, total_images: u8) {
        if let Some(band) = self.enrollment.borrow_mut().record_progress(total_images) {
            self.bands.borrow_mut().push(band);
        }
    }

    fn show_panel(&self, panel: &ProgressPanel) {
        *self.panel.borrow_mut() = Some(panel.clone());
        self.panels.borrow_mut().push(panel.clone());
    }

    fn clear_panel(&self) {
        self.clears.set(self.clears.get() + 1);
        *self.panel.borrow_mut() = None;
    }

    fn close_session(&self) {
        self.enrollment.borrow_mut().close();
    }

    async fn refresh_roster(&self) {
        self.refreshes.set(self.refreshes.get() + 1);
        if let Some((id, name, known)) = self.reopen.borrow_mut().take() {
            self.enrollment.borrow_mut().open(&id, &name, known);
        }
    }
}

impl PeopleHost for TestHost {
    fn close_add_form(&self) {
        self.form_closes.set(self.form_closes.get() + 1);
    }

    fn start_enrollment(&self, person_id: &str, full_name: &str, known_count: usize) {
        *self.panel.borrow_mut() = None;
        self.enrollment
            .borrow_mut()
            .open(person_id, full_name, known_count);
    }
}
