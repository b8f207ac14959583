//! Project domain model.
//!
//! # Responsibility
//! - Define the top-level container that owns roadmap items.
//! - Convert validated form payloads into stored records.
//!
//! # Invariants
//! - `id` and `created_at` are assigned once and never change.
//! - Edits replace `title`, `description` and `logo` together.

use crate::model::id::deserialize_id;
use crate::model::validation::{validate_title, ValidationError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier of a project.
pub type ProjectId = Uuid;

/// Top-level container for related roadmap items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: ProjectId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    /// Opaque, already-encoded image reference (usually a data URI).
    #[serde(default)]
    pub logo: Option<String>,
}

/// Form payload for creating or editing a project.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub logo: Option<String>,
}

impl ProjectDraft {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            logo: None,
        }
    }

    pub fn with_logo(mut self, logo: impl Into<String>) -> Self {
        self.logo = Some(logo.into());
        self
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }
}

impl Project {
    /// Builds a new project with a freshly generated id.
    ///
    /// Does not validate; callers go through [`ProjectDraft::validate`] first.
    pub fn from_draft(draft: ProjectDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: draft.title,
            description: draft.description,
            created_at,
            logo: draft.logo,
        }
    }

    /// Returns a copy with editable fields replaced by `draft`.
    pub fn edited(&self, draft: ProjectDraft) -> Self {
        Self {
            id: self.id,
            title: draft.title,
            description: draft.description,
            created_at: self.created_at,
            logo: draft.logo,
        }
    }

    /// Case-insensitive substring match over title and description.
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.title.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }
}

#[cfg(test)]
mod tests {
    use super::{Project, ProjectDraft};
    use chrono::{TimeZone, Utc};

    #[test]
    fn edited_keeps_identity_and_creation_time() {
        let created_at = Utc.with_ymd_and_hms(2023, 10, 1, 10, 0, 0).unwrap();
        let original = Project::from_draft(
            ProjectDraft::new("Website", "old").with_logo("data:image/png;base64,AA=="),
            created_at,
        );

        let edited = original.edited(ProjectDraft::new("Website v2", "new"));
        assert_eq!(edited.id, original.id);
        assert_eq!(edited.created_at, created_at);
        assert_eq!(edited.title, "Website v2");
        assert_eq!(edited.logo, None);
    }

    #[test]
    fn search_matches_description_case_insensitively() {
        let project = Project::from_draft(
            ProjectDraft::new("Mobile", "Launch on iOS and Android"),
            Utc::now(),
        );
        assert!(project.matches_search("android"));
        assert!(project.matches_search(""));
        assert!(!project.matches_search("web"));
    }
}
