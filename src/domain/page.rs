use crate::domain::BilingualText;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub id: String,
    pub title: BilingualText,
    pub body: BilingualText,
    // URL or inline data URI
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

impl Section {
    pub fn new(id: impl Into<String>, title: BilingualText, body: BilingualText) -> Self {
        Self {
            id: id.into(),
            title,
            body,
            image: None,
            metadata: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// A site page, identified by its slug (`home`, `about`, ...).
///
/// The page is the unit of persistence: its sections are embedded, so saving
/// any one section rewrites the whole page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page {
    pub id: String,
    pub title: BilingualText,
    #[serde(default)]
    pub sections: Vec<Section>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<DateTime<Utc>>,
}

impl Page {
    pub fn new(id: impl Into<String>, title: BilingualText) -> Self {
        Self {
            id: id.into(),
            title,
            sections: Vec::new(),
            last_modified: None,
        }
    }

    pub fn with_section(mut self, section: Section) -> Self {
        self.sections.push(section);
        self
    }

    pub fn section(&self, id: &str) -> Option<&Section> {
        self.sections.iter().find(|s| s.id == id)
    }

    pub fn section_mut(&mut self, id: &str) -> Option<&mut Section> {
        self.sections.iter_mut().find(|s| s.id == id)
    }

    /// Builds a timestamp-derived section id that is not yet used in this page.
    pub fn next_section_id(&self, now: DateTime<Utc>) -> String {
        let mut millis = now.timestamp_millis();
        loop {
            let candidate = format!("section-{}", millis);
            if self.section(&candidate).is_none() {
                return candidate;
            }
            millis += 1;
        }
    }

    /// Appends a section with a fresh id and returns that id.
    pub fn add_section(&mut self, title: BilingualText, body: BilingualText) -> String {
        let id = self.next_section_id(Utc::now());
        self.sections.push(Section::new(id.clone(), title, body));
        id
    }

    pub fn remove_section(&mut self, id: &str) -> Option<Section> {
        let index = self.sections.iter().position(|s| s.id == id)?;
        Some(self.sections.remove(index))
    }

    /// Swaps the section with its neighbour. Returns false when the section is
    /// missing or already at that edge.
    pub fn move_section(&mut self, id: &str, direction: Direction) -> bool {
        let Some(index) = self.sections.iter().position(|s| s.id == id) else {
            return false;
        };

        let target = match direction {
            Direction::Up if index > 0 => index - 1,
            Direction::Down if index + 1 < self.sections.len() => index + 1,
            _ => return false,
        };

        self.sections.swap(index, target);
        true
    }
}
