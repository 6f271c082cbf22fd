//! Roster of enrolled people.
//!
//! The repository only ever holds what the backend last returned. A failed
//! refresh empties it rather than showing stale rows.

use crate::services::{
    notify_failure, AddPersonResponse, AttendanceApi, MessageResponse, NewPersonRequest, Notifier,
    RosterCache,
};
use crate::state::orchestrator::EnrollmentHost;
use crate::{AppError, AppResult, NotifyKind, Person};

/// The roster screen around the add and remove flows.
pub trait PeopleHost: EnrollmentHost {
    fn close_add_form(&self);

    /// Open the enrollment modal for `person_id`, replacing any open session.
    fn start_enrollment(&self, person_id: &str, full_name: &str, known_count: usize);
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct PeopleRepository {
    people: Vec<Person>,
}

impl PeopleRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn people(&self) -> &[Person] {
        &self.people
    }

    pub fn find(&self, person_id: &str) -> Option<&Person> {
        self.people.iter().find(|p| p.id == person_id)
    }

    pub fn len(&self) -> usize {
        self.people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.people.is_empty()
    }

    pub fn present_count(&self) -> usize {
        self.people.iter().filter(|p| p.is_present).count()
    }

    /// Apply the result of a roster fetch.
    ///
    /// Success replaces the roster and mirrors it to `cache`; failure clears
    /// the roster and hands the error back for reporting.
    pub fn apply_fetch(
        &mut self,
        result: AppResult<Vec<Person>>,
        cache: &impl RosterCache,
    ) -> AppResult<usize> {
        match result {
            Ok(people) => {
                cache.store(&people);
                self.people = people;
                Ok(self.people.len())
            }
            Err(err) => {
                self.people.clear();
                Err(err)
            }
        }
    }

    /// Images a person is known to hold.
    ///
    /// The roster is authoritative; the cache is only asked about people the
    /// roster does not contain. Unknown people have none.
    pub fn known_image_count(&self, person_id: &str, cache: &impl RosterCache) -> usize {
        if let Some(person) = self.find(person_id) {
            return person.image_count();
        }
        cache
            .load()
            .and_then(|cached| cached.into_iter().find(|p| p.id == person_id))
            .map(|p| p.image_count())
            .unwrap_or(0)
    }
}

/// Fetch the full roster.
pub async fn fetch_roster<A: AttendanceApi>(api: &A) -> AppResult<Vec<Person>> {
    api.list_people().await
}

/// Client-side validation of the add-person form.
pub fn validate_new_person(
    first_name: &str,
    last_name: &str,
    id_number: &str,
) -> AppResult<NewPersonRequest> {
    let fields = [
        ("First name", first_name.trim()),
        ("Last name", last_name.trim()),
        ("ID number", id_number.trim()),
    ];
    if let Some((label, _)) = fields.iter().find(|(_, value)| value.is_empty()) {
        return Err(AppError::Validation(format!("{} is required", label)));
    }

    Ok(NewPersonRequest {
        first_name: first_name.trim().to_string(),
        last_name: last_name.trim().to_string(),
        id_number: id_number.trim().to_string(),
    })
}

/// Create a person and go straight to their enrollment.
///
/// A new person holds no images, so the session starts from zero without
/// asking the roster.
pub async fn add_person<A, H>(
    api: &A,
    notifier: &impl Notifier,
    host: &H,
    first_name: &str,
    last_name: &str,
    id_number: &str,
) -> AppResult<AddPersonResponse>
where
    A: AttendanceApi,
    H: PeopleHost,
{
    let request = match validate_new_person(first_name, last_name, id_number) {
        Ok(request) => request,
        Err(err) => {
            notifier.notify(&err.user_message(), NotifyKind::Error);
            return Err(err);
        }
    };

    let response = match api.add_person(&request).await {
        Ok(response) => response,
        Err(err) => {
            notify_failure(notifier, &err, "Failed to add person");
            return Err(err);
        }
    };

    let full_name = format!("{} {}", request.first_name, request.last_name);
    let message = if response.message.is_empty() {
        format!("Added {}", full_name)
    } else {
        response.message.clone()
    };
    notifier.notify(&message, NotifyKind::Success);
    host.close_add_form();
    host.refresh_roster().await;
    host.start_enrollment(&response.person_id, &full_name, 0);

    Ok(response)
}

/// Remove a person after confirmation. `Ok(None)` means the user declined.
pub async fn remove_person<A, H>(
    api: &A,
    notifier: &impl Notifier,
    host: &H,
    person_id: &str,
    full_name: &str,
    confirm: impl FnOnce(&str) -> bool,
) -> AppResult<Option<MessageResponse>>
where
    A: AttendanceApi,
    H: PeopleHost,
{
    if !confirm(&format!("Are you sure you want to delete {}?", full_name)) {
        return Ok(None);
    }

    match api.remove_person(person_id).await {
        Ok(response) => {
            let message = if response.message.is_empty() {
                format!("{} deleted", full_name)
            } else {
                response.message.clone()
            };
            notifier.notify(&message, NotifyKind::Success);
            host.refresh_roster().await;
            Ok(Some(response))
        }
        Err(err) => {
            notify_failure(notifier, &err, "Failed to delete person");
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::*;
    use futures::executor::block_on;

    #[test]
    fn test_successful_fetch_replaces_and_mirrors() {
        let cache = MemoryCache::default();
        let mut repo = PeopleRepository::new();

        let people = vec![person("101", "Alice", "Cohen", 2), person("202", "Bob", "Levi", 0)];
        assert_eq!(repo.apply_fetch(Ok(people.clone()), &cache), Ok(2));

        assert_eq!(repo.people(), people.as_slice());
        assert_eq!(cache.stored.borrow().as_deref(), Some(people.as_slice()));
    }

    #[test]
    fn test_failed_fetch_clears_roster() {
        let cache = MemoryCache::default();
        let mut repo = PeopleRepository::new();
        repo.apply_fetch(Ok(vec![person("101", "Alice", "Cohen", 2)]), &cache)
            .unwrap();

        let err = repo
            .apply_fetch(Err(AppError::Network("offline".into())), &cache)
            .unwrap_err();

        assert!(err.is_transport());
        assert!(repo.is_empty());
        // the mirror keeps the last good roster
        assert_eq!(cache.stored.borrow().as_ref().map(Vec::len), Some(1));
    }

    #[test]
    fn test_known_image_count_prefers_roster() {
        let cache = MemoryCache::default();
        cache.store(&[person("101", "Alice", "Cohen", 1), person("303", "Dana", "Mor", 4)]);

        let mut repo = PeopleRepository::new();
        repo.apply_fetch(Ok(vec![person("101", "Alice", "Cohen", 3)]), &())
            .unwrap();

        assert_eq!(repo.known_image_count("101", &cache), 3);
        assert_eq!(repo.known_image_count("303", &cache), 4);
        assert_eq!(repo.known_image_count("999", &cache), 0);
    }

    #[test]
    fn test_fetch_roster_calls_backend() {
        let api = FakeApi::default();
        api.people
            .borrow_mut()
            .push_back(Ok(vec![person("101", "Alice", "Cohen", 0)]));

        let people = block_on(fetch_roster(&api)).unwrap();
        assert_eq!(people.len(), 1);
        assert_eq!(api.calls(), vec!["get_loaded_people"]);
    }

    #[test]
    fn test_validate_new_person() {
        let request = validate_new_person(" Alice ", "Cohen", "101").unwrap();
        assert_eq!(request.first_name, "Alice");

        let err = validate_new_person("Alice", "  ", "101").unwrap_err();
        assert_eq!(err, AppError::Validation("Last name is required".into()));
    }

    #[test]
    fn test_new_person_opens_enrollment_from_zero() {
        let api = FakeApi::default();
        api.adds.borrow_mut().push_back(Ok(AddPersonResponse {
            person_id: "303".into(),
            message: String::new(),
        }));
        let notifier = RecordingNotifier::default();
        let host = TestHost::default();
        host.open("101", "Alice Cohen", 4);

        block_on(add_person(&api, &notifier, &host, "Dana", " Mor ", "303")).unwrap();

        assert_eq!(api.calls(), vec!["add_person:303"]);
        assert!(notifier.has_message("Added Dana Mor"));
        assert_eq!(notifier.last_kind(), Some(NotifyKind::Success));
        assert_eq!(host.form_closes.get(), 1);
        assert_eq!(host.refreshes.get(), 1);

        let enrollment = host.enrollment.borrow();
        let session = enrollment.current().unwrap();
        assert_eq!(session.person_id(), "303");
        assert_eq!(session.person_name(), "Dana Mor");
        assert_eq!(session.uploaded_count(), 0);
    }

    #[test]
    fn test_refused_person_keeps_form_open() {
        let api = FakeApi::default();
        api.adds
            .borrow_mut()
            .push_back(Err(AppError::Backend("Person with ID 101 already exists".into())));
        let notifier = RecordingNotifier::default();
        let host = TestHost::default();

        let result = block_on(add_person(&api, &notifier, &host, "Alice", "Cohen", "101"));

        assert!(result.is_err());
        assert!(notifier.has_message("Person with ID 101 already exists"));
        assert_eq!(host.form_closes.get(), 0);
        assert_eq!(host.refreshes.get(), 0);
        assert!(host.enrollment.borrow().current().is_none());
    }

    #[test]
    fn test_invalid_person_makes_no_request() {
        let api = FakeApi::default();
        let notifier = RecordingNotifier::default();
        let host = TestHost::default();

        let result = block_on(add_person(&api, &notifier, &host, "", "Cohen", "101"));

        assert_eq!(result, Err(AppError::Validation("First name is required".into())));
        assert!(api.calls().is_empty());
        assert_eq!(notifier.last_message().as_deref(), Some("First name is required"));
    }

    #[test]
    fn test_declined_removal_makes_no_request() {
        let api = FakeApi::default();
        let notifier = RecordingNotifier::default();
        let host = TestHost::default();
        let asked = std::cell::RefCell::new(String::new());

        let result = block_on(remove_person(&api, &notifier, &host, "101", "Alice Cohen", |q| {
            *asked.borrow_mut() = q.to_string();
            false
        }));

        assert_eq!(result, Ok(None));
        assert_eq!(asked.borrow().as_str(), "Are you sure you want to delete Alice Cohen?");
        assert!(api.calls().is_empty());
        assert!(notifier.seen.borrow().is_empty());
        assert_eq!(host.refreshes.get(), 0);
    }

    #[test]
    fn test_confirmed_removal_notifies_and_refreshes() {
        let api = FakeApi::default();
        api.removes.borrow_mut().push_back(Ok(MessageResponse {
            message: "Alice Cohen removed successfully".into(),
        }));
        let notifier = RecordingNotifier::default();
        let host = TestHost::default();

        let result = block_on(remove_person(&api, &notifier, &host, "101", "Alice Cohen", |_| true));

        assert!(matches!(result, Ok(Some(_))));
        assert_eq!(api.calls(), vec!["remove_person:101"]);
        assert!(notifier.has_message("Alice Cohen removed successfully"));
        assert_eq!(host.refreshes.get(), 1);
    }
}
