//! Roadmap item domain model.
//!
//! # Responsibility
//! - Define the planned change/idea record owned by a project.
//! - Provide flag helpers used by the store's lifecycle operations.
//!
//! # Invariants
//! - New items always start with `is_done = false` and `is_archived = false`.
//! - Archive/unarchive and done-toggle touch a single flag only.
//! - `Priority` is totally ordered `Low < Medium < High < Urgent`.

use crate::model::id::deserialize_id;
use crate::model::project::ProjectId;
use crate::model::validation::{validate_title, ValidationError};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use uuid::Uuid;

/// Stable identifier of a roadmap item.
pub type RoadmapItemId = Uuid;

/// Kind of change an item proposes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemType {
    Add,
    Edit,
    Remove,
}

impl ItemType {
    pub const ALL: [ItemType; 3] = [ItemType::Add, ItemType::Edit, ItemType::Remove];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Add => "Add",
            Self::Edit => "Edit",
            Self::Remove => "Remove",
        }
    }
}

impl Display for ItemType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Add" => Ok(Self::Add),
            "Edit" => Ok(Self::Edit),
            "Remove" => Ok(Self::Remove),
            other => Err(format!(
                "unknown item type `{other}`; expected Add|Edit|Remove"
            )),
        }
    }
}

/// Item urgency. Declaration order is the sort order.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Medium => "Medium",
            Self::High => "High",
            Self::Urgent => "Urgent",
        }
    }
}

impl Display for Priority {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "Low" => Ok(Self::Low),
            "Medium" => Ok(Self::Medium),
            "High" => Ok(Self::High),
            "Urgent" => Ok(Self::Urgent),
            other => Err(format!(
                "unknown priority `{other}`; expected Low|Medium|High|Urgent"
            )),
        }
    }
}

/// A single planned change or idea inside a project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoadmapItem {
    #[serde(deserialize_with = "deserialize_id")]
    pub id: RoadmapItemId,
    #[serde(deserialize_with = "deserialize_id")]
    pub project_id: ProjectId,
    /// Serialized as `type` to match the stored blob format.
    #[serde(rename = "type")]
    pub kind: ItemType,
    pub title: String,
    #[serde(default)]
    pub description: String,
    pub created_at: DateTime<Utc>,
    pub priority: Priority,
    #[serde(default)]
    pub is_pinned: bool,
    #[serde(default)]
    pub is_done: bool,
    #[serde(default)]
    pub is_archived: bool,
    /// Calendar date without time. Older blobs store `""` for "no date".
    #[serde(default, deserialize_with = "deserialize_due_date")]
    pub due_date: Option<NaiveDate>,
}

/// Form payload for creating a roadmap item inside a project.
///
/// Lifecycle flags other than `is_pinned` are not accepted from callers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoadmapItemDraft {
    pub project_id: ProjectId,
    pub kind: ItemType,
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub is_pinned: bool,
    pub due_date: Option<NaiveDate>,
}

impl RoadmapItemDraft {
    /// Creates an unpinned, medium-priority draft with no due date.
    pub fn new(project_id: ProjectId, kind: ItemType, title: impl Into<String>) -> Self {
        Self {
            project_id,
            kind,
            title: title.into(),
            description: String::new(),
            priority: Priority::default(),
            is_pinned: false,
            due_date: None,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }
}

impl RoadmapItem {
    /// Builds a new active item with a freshly generated id.
    ///
    /// # Invariants
    /// - `is_done` and `is_archived` start as `false`.
    pub fn from_draft(draft: RoadmapItemDraft, created_at: DateTime<Utc>) -> Self {
        Self {
            id: Uuid::new_v4(),
            project_id: draft.project_id,
            kind: draft.kind,
            title: draft.title,
            description: draft.description,
            created_at,
            priority: draft.priority,
            is_pinned: draft.is_pinned,
            is_done: false,
            is_archived: false,
            due_date: draft.due_date,
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_title(&self.title)
    }

    /// Returns a copy with only `is_archived` changed.
    pub fn with_archived(&self, archived: bool) -> Self {
        Self {
            is_archived: archived,
            ..self.clone()
        }
    }

    /// Returns a copy with `is_done` flipped.
    pub fn with_done_toggled(&self) -> Self {
        Self {
            is_done: !self.is_done,
            ..self.clone()
        }
    }

    /// Whether the item is past its due date and still open.
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.is_done && self.due_date.is_some_and(|due| due < today)
    }

    /// Case-insensitive substring match over title and description.
    ///
    /// `needle_lower` must already be lowercased.
    pub fn matches_search(&self, needle_lower: &str) -> bool {
        needle_lower.is_empty()
            || self.title.to_lowercase().contains(needle_lower)
            || self.description.to_lowercase().contains(needle_lower)
    }
}

fn deserialize_due_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
            .map(Some)
            .map_err(serde::de::Error::custom),
    }
}
