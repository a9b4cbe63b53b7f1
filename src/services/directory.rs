use std::collections::HashMap;

use crate::models::calendar::CalendarListEntry;

/// Calendar display names mapped to calendar ids.
///
/// When two calendars share a name, the one listed last wins.
#[derive(Debug, Default)]
pub struct CalendarDirectory {
    by_name: HashMap<String, String>,
}

impl CalendarDirectory {
    pub fn from_entries(entries: Vec<CalendarListEntry>) -> Self {
        let by_name = entries
            .into_iter()
            .map(|entry| (entry.summary, entry.id))
            .collect();
        Self { by_name }
    }

    pub fn resolve(&self, name: &str) -> Option<&str> {
        self.by_name.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_name.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_name.is_empty()
    }
}
