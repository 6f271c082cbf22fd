//! Transient user-facing notifications.
//!
//! Everything that reports an outcome goes through the [`Notifier`] trait.
//! In the browser the sink is a [`NotificationCenter`]: one per page,
//! installed in the Leptos context and reused by whoever asks for it later.

use gloo_timers::callback::Timeout;
use leptos::*;

use crate::{AppError, NotifyKind, MAX_NOTIFICATIONS, NOTIFICATION_FADE_MS, NOTIFICATION_TIMEOUT_MS};

/// Sink for `notify(message, kind)`.
pub trait Notifier {
    fn notify(&self, message: &str, kind: NotifyKind);
}

/// Report a failed request.
///
/// Backend refusals are shown verbatim; transport failures are logged and
/// shown as `generic`.
pub fn notify_failure(notifier: &impl Notifier, err: &AppError, generic: &str) {
    if err.is_transport() {
        log::error!("{}: {}", generic, err);
        notifier.notify(generic, NotifyKind::Error);
    } else {
        notifier.notify(&err.user_message(), NotifyKind::Error);
    }
}

/// A notification currently on screen.
#[derive(Clone, Debug, PartialEq)]
pub struct Notification {
    pub id: u64,
    pub message: String,
    pub kind: NotifyKind,
    /// Timestamp string (HH:MM:SS)
    pub timestamp: String,
    /// Playing its closing animation; removed once it ends.
    pub closing: bool,
}

/// Ordered stack of notifications, oldest first.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct NotificationQueue {
    entries: Vec<Notification>,
    next_id: u64,
}

impl NotificationQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification and return its id. The oldest entry is dropped
    /// when the stack is full.
    pub fn push(&mut self, message: &str, kind: NotifyKind, timestamp: String) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.entries.push(Notification {
            id,
            message: message.to_string(),
            kind,
            timestamp,
            closing: false,
        });
        if self.entries.len() > MAX_NOTIFICATIONS {
            self.entries.remove(0);
        }
        id
    }

    /// Start closing. Returns false when the entry is gone or already closing.
    pub fn begin_close(&mut self, id: u64) -> bool {
        match self.entries.iter_mut().find(|n| n.id == id) {
            Some(entry) if !entry.closing => {
                entry.closing = true;
                true
            }
            _ => false,
        }
    }

    pub fn remove(&mut self, id: u64) {
        self.entries.retain(|n| n.id != id);
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Signal-backed notification sink.
#[derive(Clone, Copy, Debug)]
pub struct NotificationCenter {
    queue: RwSignal<NotificationQueue>,
}

impl NotificationCenter {
    /// Return the center already installed in the context, or install one.
    pub fn install() -> Self {
        if let Some(existing) = use_context::<NotificationCenter>() {
            return existing;
        }
        let center = Self {
            queue: create_rw_signal(NotificationQueue::new()),
        };
        provide_context(center);
        center
    }

    pub fn queue(&self) -> RwSignal<NotificationQueue> {
        self.queue
    }

    /// Close a notification now (close button), with the fade delay.
    pub fn dismiss(&self, id: u64) {
        let mut started = false;
        self.queue.update(|q| started = q.begin_close(id));
        if !started {
            return;
        }
        let queue = self.queue;
        Timeout::new(NOTIFICATION_FADE_MS, move || {
            queue.update(|q| q.remove(id));
        })
        .forget();
    }
}

impl Notifier for NotificationCenter {
    fn notify(&self, message: &str, kind: NotifyKind) {
        match kind {
            NotifyKind::Error => log::error!("{}", message),
            NotifyKind::Warning => log::warn!("{}", message),
            _ => log::info!("{}", message),
        }

        let timestamp = chrono::Local::now().format("%H:%M:%S").to_string();
        let mut id = 0;
        self.queue.update(|q| id = q.push(message, kind, timestamp));

        let center = *self;
        Timeout::new(NOTIFICATION_TIMEOUT_MS, move || center.dismiss(id)).forget();
    }
}
