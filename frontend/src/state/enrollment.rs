//! Enrollment sessions: uploading reference images for one person.
//!
//! A person needs between [`MIN_IMAGES_PER_PERSON`] and
//! [`MAX_IMAGES_PER_PERSON`] reference images. The session tracks how many
//! the person holds and derives, from that count alone, the status text,
//! whether the finish action is offered and whether more uploads are
//! accepted ([`CompletionBand`]).
//!
//! ```text
//!  Closed ──open──▶ Open(idle) ──set_uploading(true)──▶ Open(uploading)
//!    ▲                 │  ▲                                  │
//!    │                 │  └───────set_uploading(false)───────┘
//!    └─close/finish────┘
//! ```
//!
//! At most one session exists at a time; [`Enrollment`] is that slot.
//! Every session gets a fresh [`SessionId`] so async work started for an
//! older session can tell it has been superseded.

use crate::{AppError, AppResult, MAX_IMAGES_PER_PERSON, MIN_IMAGES_PER_PERSON};

/// Identity of one opened session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionPhase {
    Closed,
    Open { uploading: bool },
}

/// Completion policy, as a function of the persisted image count.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompletionBand {
    /// No image yet.
    Empty,
    /// Some images, not enough to finish.
    BelowMinimum { uploaded: u8, missing: u8 },
    /// Enough to finish, room for more.
    Sufficient { uploaded: u8, remaining: u8 },
    /// No more images accepted.
    Full,
}

impl CompletionBand {
    pub fn for_count(count: u8) -> Self {
        let count = count.min(MAX_IMAGES_PER_PERSON);
        if count == 0 {
            CompletionBand::Empty
        } else if count < MIN_IMAGES_PER_PERSON {
            CompletionBand::BelowMinimum {
                uploaded: count,
                missing: MIN_IMAGES_PER_PERSON - count,
            }
        } else if count < MAX_IMAGES_PER_PERSON {
            CompletionBand::Sufficient {
                uploaded: count,
                remaining: MAX_IMAGES_PER_PERSON - count,
            }
        } else {
            CompletionBand::Full
        }
    }

    pub fn finish_visible(&self) -> bool {
        matches!(self, CompletionBand::Sufficient { .. } | CompletionBand::Full)
    }

    pub fn accepts_uploads(&self) -> bool {
        !matches!(self, CompletionBand::Full)
    }

    pub fn message(&self) -> String {
        match self {
            CompletionBand::Empty => format!(
                "Upload at least {} and at most {} images in total",
                MIN_IMAGES_PER_PERSON, MAX_IMAGES_PER_PERSON
            ),
            CompletionBand::BelowMinimum { uploaded, missing } => {
                format!("Uploaded {} images, {} more required", uploaded, missing)
            }
            CompletionBand::Sufficient { uploaded, remaining } => format!(
                "Uploaded {} images, you can add up to {} more or finish",
                uploaded, remaining
            ),
            CompletionBand::Full => {
                format!("Reached the maximum of {} images", MAX_IMAGES_PER_PERSON)
            }
        }
    }

    /// CSS class for the status line.
    pub fn css_class(&self) -> &'static str {
        match self {
            CompletionBand::Empty => "upload-status empty",
            CompletionBand::BelowMinimum { .. } => "upload-status partial",
            CompletionBand::Sufficient { .. } => "upload-status sufficient",
            CompletionBand::Full => "upload-status full",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepState {
    Completed,
    Active,
    Pending,
}

/// One of the five step markers above the file picker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ProgressStep {
    /// 1-based position.
    pub number: u8,
    pub state: StepState,
    /// Beyond the minimum.
    pub optional: bool,
}

impl ProgressStep {
    pub fn css_class(&self) -> String {
        let state = match self.state {
            StepState::Completed => " completed",
            StepState::Active => " active",
            StepState::Pending => "",
        };
        let optional = if self.optional { " optional" } else { "" };
        format!("progress-step{}{}", state, optional)
    }
}

/// Step markers for a given image count.
pub fn progress_steps(count: u8) -> Vec<ProgressStep> {
    (1..=MAX_IMAGES_PER_PERSON)
        .map(|number| {
            let state = if number <= count {
                StepState::Completed
            } else if number == count + 1 {
                StepState::Active
            } else {
                StepState::Pending
            };
            ProgressStep {
                number,
                state,
                optional: number > MIN_IMAGES_PER_PERSON,
            }
        })
        .collect()
}

/// "Upload images for person X".
#[derive(Clone, Debug, PartialEq)]
pub struct EnrollmentSession {
    id: SessionId,
    person_id: String,
    person_name: String,
    uploaded_count: u8,
    phase: SessionPhase,
}

impl EnrollmentSession {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn person_id(&self) -> &str {
        &self.person_id
    }

    pub fn person_name(&self) -> &str {
        &self.person_name
    }

    pub fn uploaded_count(&self) -> u8 {
        self.uploaded_count
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn is_active(&self) -> bool {
        matches!(self.phase, SessionPhase::Open { .. })
    }

    pub fn is_uploading(&self) -> bool {
        self.phase == SessionPhase::Open { uploading: true }
    }

    pub fn band(&self) -> CompletionBand {
        CompletionBand::for_count(self.uploaded_count)
    }

    /// Store the authoritative count and return the resulting band.
    pub fn record_progress(&mut self, new_count: u8) -> CompletionBand {
        self.uploaded_count = new_count.min(MAX_IMAGES_PER_PERSON);
        self.band()
    }

    /// Pre-flight check for a new batch.
    pub fn check_can_upload(&self) -> AppResult<()> {
        if !self.is_active() {
            return Err(AppError::Validation("No enrollment in progress".into()));
        }
        if self.is_uploading() {
            return Err(AppError::Validation("An upload is already running".into()));
        }
        if !self.band().accepts_uploads() {
            return Err(AppError::Validation(format!(
                "{} already has the maximum of {} images",
                self.person_name, MAX_IMAGES_PER_PERSON
            )));
        }
        Ok(())
    }
}

/// The single enrollment slot.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Enrollment {
    next_id: u64,
    session: Option<EnrollmentSession>,
}

impl Enrollment {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a session, replacing any previous one.
    ///
    /// `known_count` is what the person is known to hold already.
    pub fn open(&mut self, person_id: &str, person_name: &str, known_count: usize) -> SessionId {
        self.next_id += 1;
        let id = SessionId(self.next_id);
        let known = u8::try_from(known_count).unwrap_or(u8::MAX);
        self.session = Some(EnrollmentSession {
            id,
            person_id: person_id.to_string(),
            person_name: person_name.to_string(),
            uploaded_count: known.min(MAX_IMAGES_PER_PERSON),
            phase: SessionPhase::Open { uploading: false },
        });
        id
    }

    /// Cancel. Idempotent.
    pub fn close(&mut self) {
        if let Some(session) = self.session.as_mut() {
            session.phase = SessionPhase::Closed;
        }
    }

    /// Finish; only allowed once the minimum is reached.
    ///
    /// Returns the name of the person whose enrollment ended, or `None`
    /// when no session was open (a repeated click).
    pub fn finish(&mut self) -> AppResult<Option<String>> {
        let Some(session) = self.current() else {
            return Ok(None);
        };
        if !session.band().finish_visible() {
            return Err(AppError::Validation(format!(
                "At least {} images are required before finishing",
                MIN_IMAGES_PER_PERSON
            )));
        }
        let name = session.person_name().to_string();
        self.close();
        Ok(Some(name))
    }

    /// The open session, if any.
    pub fn current(&self) -> Option<&EnrollmentSession> {
        self.session.as_ref().filter(|s| s.is_active())
    }

    fn current_mut(&mut self) -> Option<&mut EnrollmentSession> {
        self.session.as_mut().filter(|s| s.is_active())
    }

    pub fn current_id(&self) -> Option<SessionId> {
        self.current().map(EnrollmentSession::id)
    }

    pub fn is_current(&self, id: SessionId) -> bool {
        self.current_id() == Some(id)
    }

    pub fn record_progress(&mut self, new_count: u8) -> Option<CompletionBand> {
        self.current_mut().map(|s| s.record_progress(new_count))
    }

    pub fn set_uploading(&mut self, uploading: bool) {
        if let Some(session) = self.current_mut() {
            session.phase = SessionPhase::Open { uploading };
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_count_maps_to_one_band() {
        let expected = [
            (0, CompletionBand::Empty, false),
            (1, CompletionBand::BelowMinimum { uploaded: 1, missing: 2 }, false),
            (2, CompletionBand::BelowMinimum { uploaded: 2, missing: 1 }, false),
            (3, CompletionBand::Sufficient { uploaded: 3, remaining: 2 }, true),
            (4, CompletionBand::Sufficient { uploaded: 4, remaining: 1 }, true),
            (5, CompletionBand::Full, true),
        ];

        for (count, band, finish) in expected {
            let got = CompletionBand::for_count(count);
            assert_eq!(got, band, "count {}", count);
            assert_eq!(got.finish_visible(), finish, "count {}", count);
            assert_eq!(got.finish_visible(), count >= MIN_IMAGES_PER_PERSON);
        }
    }

    #[test]
    fn test_band_messages() {
        assert_eq!(
            CompletionBand::for_count(0).message(),
            "Upload at least 3 and at most 5 images in total"
        );
        assert_eq!(
            CompletionBand::for_count(2).message(),
            "Uploaded 2 images, 1 more required"
        );
        assert_eq!(
            CompletionBand::for_count(3).message(),
            "Uploaded 3 images, you can add up to 2 more or finish"
        );
        assert_eq!(CompletionBand::for_count(5).message(), "Reached the maximum of 5 images");
        assert!(!CompletionBand::Full.accepts_uploads());
    }

    #[test]
    fn test_open_starts_from_known_count() {
        let mut enrollment = Enrollment::new();
        let id = enrollment.open("101", "Alice Cohen", 2);

        let session = enrollment.current().unwrap();
        assert_eq!(session.id(), id);
        assert_eq!(session.uploaded_count(), 2);
        assert_eq!(session.phase(), SessionPhase::Open { uploading: false });
        assert!(session.is_active());
    }

    #[test]
    fn test_new_session_supersedes_previous() {
        let mut enrollment = Enrollment::new();
        let first = enrollment.open("101", "Alice Cohen", 4);
        let second = enrollment.open("202", "Bob Levi", 0);

        assert_ne!(first, second);
        assert!(!enrollment.is_current(first));
        assert!(enrollment.is_current(second));
        assert_eq!(enrollment.current().unwrap().uploaded_count(), 0);
    }

    #[test]
    fn test_record_progress_clamps_to_maximum() {
        let mut enrollment = Enrollment::new();
        enrollment.open("101", "Alice Cohen", 0);

        assert_eq!(enrollment.record_progress(9), Some(CompletionBand::Full));
        assert_eq!(enrollment.current().unwrap().uploaded_count(), 5);
    }

    #[test]
    fn test_close_is_idempotent() {
        let mut enrollment = Enrollment::new();
        enrollment.open("101", "Alice Cohen", 1);

        enrollment.close();
        enrollment.close();
        assert!(enrollment.current().is_none());
        assert_eq!(enrollment.record_progress(3), None);
    }

    #[test]
    fn test_finish_requires_minimum() {
        let mut enrollment = Enrollment::new();
        enrollment.open("101", "Alice Cohen", 2);
        assert!(enrollment.finish().is_err());
        assert!(enrollment.current().is_some());

        enrollment.record_progress(3);
        assert_eq!(enrollment.finish(), Ok(Some("Alice Cohen".to_string())));
        assert!(enrollment.current().is_none());
    }

    #[test]
    fn test_finish_without_session_is_a_no_op() {
        let mut enrollment = Enrollment::new();
        assert_eq!(enrollment.finish(), Ok(None));

        enrollment.open("101", "Alice Cohen", 3);
        assert!(enrollment.finish().unwrap().is_some());
        // second click after the modal closed
        assert_eq!(enrollment.finish(), Ok(None));
    }

    #[test]
    fn test_full_session_rejects_uploads() {
        let mut enrollment = Enrollment::new();
        enrollment.open("101", "Alice Cohen", 5);
        assert!(enrollment.current().unwrap().check_can_upload().is_err());

        enrollment.open("101", "Alice Cohen", 4);
        assert!(enrollment.current().unwrap().check_can_upload().is_ok());

        enrollment.set_uploading(true);
        assert!(enrollment.current().unwrap().check_can_upload().is_err());
    }

    #[test]
    fn test_progress_steps() {
        let steps = progress_steps(2);
        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0].state, StepState::Completed);
        assert_eq!(steps[1].state, StepState::Completed);
        assert_eq!(steps[2].state, StepState::Active);
        assert_eq!(steps[3].state, StepState::Pending);
        assert!(!steps[2].optional);
        assert!(steps[3].optional && steps[4].optional);
        assert_eq!(steps[3].css_class(), "progress-step optional");

        let full = progress_steps(5);
        assert!(full.iter().all(|s| s.state == StepState::Completed));
    }
}
