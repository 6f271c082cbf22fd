//! Command dispatch.
//!
//! Components never call the backend themselves. They build a [`Command`]
//! and hand it to [`AppContext::dispatch`], which updates the state objects
//! held in signals and spawns whatever network work the command needs.

use std::rc::Rc;

use leptos::*;
use web_sys::File;

use crate::services::{
    notify_failure, BrowserClock, HttpApi, LocalStorageCache, NotificationCenter, Notifier,
};
use crate::state::{
    add_person, delete_selected, fetch_roster, load_targets, remove_person, upload_targets,
    DeleteResult, Enrollment, EnrollmentHost, PeopleHost, PeopleRepository, ProgressPanel,
    SessionId, TargetGallery, UploadOrchestrator,
};
use crate::{NotifyKind, BACKEND_URL};

/// Images of one person, as shown in the view-images modal.
#[derive(Clone, Debug, PartialEq)]
pub struct PersonImages {
    pub full_name: String,
    pub urls: Vec<String>,
}

/// User intents.
#[derive(Clone, Debug)]
pub enum Command {
    RefreshPeople,
    Search(String),
    ShowAddPerson(bool),
    AddPerson {
        first_name: String,
        last_name: String,
        id_number: String,
    },
    RemovePerson(String),
    OpenEnrollment(String),
    UploadImages(Vec<File>),
    FinishEnrollment,
    CancelEnrollment,
    ViewImages(String),
    CloseImages,
    RefreshTargets,
    UploadTargets(Vec<File>),
    ToggleTarget { public_id: String, checked: bool },
    SelectAllTargets,
    ClearTargetSelection,
    DeleteSelectedTargets,
}

/// Application state shared by every component.
#[derive(Clone)]
pub struct AppContext {
    api: Rc<HttpApi>,
    cache: LocalStorageCache,
    pub notifier: NotificationCenter,
    pub people: RwSignal<PeopleRepository>,
    pub search: RwSignal<String>,
    pub enrollment: RwSignal<Enrollment>,
    pub panel: RwSignal<Option<ProgressPanel>>,
    pub gallery: RwSignal<TargetGallery>,
    pub add_person_open: RwSignal<bool>,
    pub viewing: RwSignal<Option<PersonImages>>,
}

fn confirm(question: &str) -> bool {
    gloo_utils::window()
        .confirm_with_message(question)
        .unwrap_or(false)
}

impl AppContext {
    pub fn new(api: HttpApi) -> Self {
        Self {
            api: Rc::new(api),
            cache: LocalStorageCache::default(),
            notifier: NotificationCenter::install(),
            people: create_rw_signal(PeopleRepository::new()),
            search: create_rw_signal(String::new()),
            enrollment: create_rw_signal(Enrollment::new()),
            panel: create_rw_signal(None),
            gallery: create_rw_signal(TargetGallery::new()),
            add_person_open: create_rw_signal(false),
            viewing: create_rw_signal(None),
        }
    }

    /// Provide a context talking to [`BACKEND_URL`] and return it.
    pub fn provide() -> Self {
        let ctx = Self::new(HttpApi::new(BACKEND_URL));
        provide_context(ctx.clone());
        ctx
    }

    pub fn dispatch(&self, command: Command) {
        log::debug!("dispatch {:?}", command);
        match command {
            Command::RefreshPeople => self.spawn(|ctx| async move { ctx.refresh_people().await }),
            Command::Search(query) => self.search.set(query),
            Command::ShowAddPerson(open) => self.add_person_open.set(open),
            Command::AddPerson {
                first_name,
                last_name,
                id_number,
            } => self.spawn(|ctx| async move {
                let _ = add_person(
                    &*ctx.api,
                    &ctx.notifier,
                    &ctx,
                    &first_name,
                    &last_name,
                    &id_number,
                )
                .await;
            }),
            Command::RemovePerson(person_id) => self.spawn(|ctx| async move {
                let name = ctx
                    .people
                    .with_untracked(|repo| repo.find(&person_id).map(|p| p.full_name()))
                    .unwrap_or_else(|| person_id.clone());
                let _ = remove_person(&*ctx.api, &ctx.notifier, &ctx, &person_id, &name, confirm)
                    .await;
            }),
            Command::OpenEnrollment(person_id) => self.open_enrollment(&person_id),
            Command::UploadImages(files) => self.upload_images(files),
            Command::FinishEnrollment => self.finish_enrollment(),
            Command::CancelEnrollment => {
                self.enrollment.update(Enrollment::close);
                self.panel.set(None);
            }
            Command::ViewImages(person_id) => {
                let images = self.people.with_untracked(|repo| {
                    repo.find(&person_id).map(|p| PersonImages {
                        full_name: p.full_name(),
                        urls: p.image_urls.clone(),
                    })
                });
                self.viewing.set(images);
            }
            Command::CloseImages => self.viewing.set(None),
            Command::RefreshTargets => self.spawn(|ctx| async move { ctx.refresh_targets().await }),
            Command::UploadTargets(files) => self.spawn(|ctx| async move {
                if upload_targets(&*ctx.api, &ctx.notifier, &files).await.is_ok() {
                    ctx.refresh_targets().await;
                }
            }),
            Command::ToggleTarget { public_id, checked } => self
                .gallery
                .update(|g| g.set_selected(&public_id, checked)),
            Command::SelectAllTargets => self.gallery.update(TargetGallery::select_all),
            Command::ClearTargetSelection => self.gallery.update(TargetGallery::clear_selection),
            Command::DeleteSelectedTargets => self.spawn(|ctx| async move {
                let selection = ctx.gallery.with_untracked(TargetGallery::selection);
                let result = delete_selected(&*ctx.api, &ctx.notifier, &selection, confirm).await;
                if let Ok(DeleteResult::Deleted { listing, .. }) = result {
                    ctx.gallery
                        .update(|g| g.apply_deletion(&selection, listing));
                }
            }),
        }
    }

    fn spawn<F, Fut>(&self, task: F)
    where
        F: FnOnce(AppContext) -> Fut,
        Fut: std::future::Future<Output = ()> + 'static,
    {
        spawn_local(task(self.clone()));
    }

    async fn refresh_people(&self) {
        let result = fetch_roster(&*self.api).await;
        let mut applied = Ok(0);
        self.people
            .update(|repo| applied = repo.apply_fetch(result, &self.cache));
        match applied {
            Ok(count) => log::info!("👥 Loaded {} people", count),
            Err(err) => notify_failure(&self.notifier, &err, "Failed to load people"),
        }
    }

    async fn refresh_targets(&self) {
        if let Ok(listing) = load_targets(&*self.api, &self.notifier).await {
            self.gallery.update(|g| g.replace(listing));
        }
    }

    fn open_enrollment(&self, person_id: &str) {
        let (name, known) = self.people.with_untracked(|repo| {
            let name = repo
                .find(person_id)
                .map(|p| p.full_name())
                .unwrap_or_else(|| person_id.to_string());
            (name, repo.known_image_count(person_id, &self.cache))
        });
        self.start_enrollment(person_id, &name, known);
    }

    fn upload_images(&self, files: Vec<File>) {
        let target = self.enrollment.with_untracked(|e| {
            e.current().map(|s| {
                (
                    s.id(),
                    s.person_id().to_string(),
                    s.uploaded_count(),
                    s.check_can_upload(),
                )
            })
        });
        let Some((session, person_id, known, allowed)) = target else {
            self.notifier
                .notify("No enrollment session is open", NotifyKind::Error);
            return;
        };
        if let Err(err) = allowed {
            self.notifier.notify(&err.user_message(), NotifyKind::Error);
            return;
        }

        self.spawn(|ctx| async move {
            let clock = BrowserClock;
            let orchestrator = UploadOrchestrator::new(&*ctx.api, &clock, &ctx.notifier);
            if let Ok(report) = orchestrator
                .upload(&ctx, session, &person_id, known, &files)
                .await
            {
                log::info!("Batch for {} done: {}", person_id, report.summary());
            }
        });
    }

    fn finish_enrollment(&self) {
        let mut finished = Ok(None);
        self.enrollment.update(|e| finished = e.finish());

        match finished {
            Ok(Some(name)) => {
                self.panel.set(None);
                self.notifier.notify(
                    &format!("Enrollment of {} completed", name),
                    NotifyKind::Success,
                );
                self.dispatch(Command::RefreshPeople);
            }
            Ok(None) => log::debug!("finish ignored, no enrollment open"),
            Err(err) => self.notifier.notify(&err.user_message(), NotifyKind::Error),
        }
    }
}

impl EnrollmentHost for AppContext {
    fn is_current(&self, session: SessionId) -> bool {
        self.enrollment.with_untracked(|e| e.is_current(session))
    }

    fn set_uploading(&self, uploading: bool) {
        self.enrollment.update(|e| e.set_uploading(uploading));
    }

    fn record_progress(&self, total_images: u8) {
        self.enrollment.update(|e| {
            e.record_progress(total_images);
        });
    }

    fn show_panel(&self, panel: &ProgressPanel) {
        self.panel.set(Some(panel.clone()));
    }

    fn clear_panel(&self) {
        self.panel.set(None);
    }

    fn close_session(&self) {
        self.enrollment.update(Enrollment::close);
    }

    async fn refresh_roster(&self) {
        self.refresh_people().await;
    }
}

impl PeopleHost for AppContext {
    fn close_add_form(&self) {
        self.add_person_open.set(false);
    }

    fn start_enrollment(&self, person_id: &str, full_name: &str, known_count: usize) {
        self.panel.set(None);
        self.enrollment.update(|e| {
            e.open(person_id, full_name, known_count);
        });
    }
}

/// The [`AppContext`] provided by the root component.
pub fn use_app() -> Option<AppContext> {
    use_context::<AppContext>()
}
