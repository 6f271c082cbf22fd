//! People table rendering.
//!
//! [`render_rows`] turns the roster into rows; [`TableBody::filter`] only
//! flips row visibility, so searching never touches the roster itself.

use crate::Person;

pub const EMPTY_ROSTER_TEXT: &str = "No people in the system";

#[derive(Clone, Debug, PartialEq)]
pub struct PersonRow {
    pub person_id: String,
    pub full_name: String,
    /// First enrolled image, if any.
    pub thumbnail: Option<String>,
    pub image_count: usize,
    pub is_present: bool,
    pub visible: bool,
}

impl PersonRow {
    fn from_person(person: &Person) -> Self {
        Self {
            person_id: person.id.clone(),
            full_name: person.full_name(),
            thumbnail: person.image_urls.first().cloned(),
            image_count: person.image_count(),
            is_present: person.is_present,
            visible: true,
        }
    }

    pub fn status_label(&self) -> &'static str {
        if self.is_present {
            "Present"
        } else {
            "Absent"
        }
    }

    pub fn status_class(&self) -> &'static str {
        if self.is_present {
            "person-status status-present"
        } else {
            "person-status status-absent"
        }
    }

    /// The view-images action only exists once there is something to view.
    pub fn can_view_images(&self) -> bool {
        self.image_count > 0
    }

    fn matches(&self, needle: &str) -> bool {
        self.full_name.to_lowercase().contains(needle)
            || self.person_id.to_lowercase().contains(needle)
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum TableBody {
    /// Single placeholder row for an empty roster.
    Placeholder(&'static str),
    Rows(Vec<PersonRow>),
}

impl TableBody {
    /// Apply a search query to the rendered rows.
    ///
    /// Case-insensitive substring match on full name or id. An empty query
    /// shows every row.
    pub fn filter(&mut self, query: &str) {
        let needle = query.trim().to_lowercase();
        if let TableBody::Rows(rows) = self {
            for row in rows.iter_mut() {
                row.visible = needle.is_empty() || row.matches(&needle);
            }
        }
    }

    pub fn visible_rows(&self) -> Vec<&PersonRow> {
        match self {
            TableBody::Placeholder(_) => Vec::new(),
            TableBody::Rows(rows) => rows.iter().filter(|r| r.visible).collect(),
        }
    }
}

pub fn render_rows(people: &[Person]) -> TableBody {
    if people.is_empty() {
        return TableBody::Placeholder(EMPTY_ROSTER_TEXT);
    }
    TableBody::Rows(people.iter().map(PersonRow::from_person).collect())
}
