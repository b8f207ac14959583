//! Per-project roadmap list: search, status filter and three-level sort.
//!
//! # Invariants
//! - `Archived` shows archived items of every type; all other filters hide
//!   archived items before matching on type.
//! - Ordering is: open before done, then pinned before unpinned, then the
//!   chosen [`SortKey`].

use crate::model::project::ProjectId;
use crate::model::roadmap_item::{ItemType, RoadmapItem};
use chrono::NaiveDate;
use std::cmp::Ordering;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Status/type selector of the project view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ItemFilter {
    #[default]
    All,
    Add,
    Edit,
    Remove,
    Archived,
}

impl ItemFilter {
    pub const ALL: [ItemFilter; 5] = [
        ItemFilter::All,
        ItemFilter::Add,
        ItemFilter::Edit,
        ItemFilter::Remove,
        ItemFilter::Archived,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::All => "All",
            Self::Add => "Add",
            Self::Edit => "Edit",
            Self::Remove => "Remove",
            Self::Archived => "Archived",
        }
    }

    /// The item type this selector narrows to, if any.
    pub fn item_type(self) -> Option<ItemType> {
        match self {
            Self::Add => Some(ItemType::Add),
            Self::Edit => Some(ItemType::Edit),
            Self::Remove => Some(ItemType::Remove),
            Self::All | Self::Archived => None,
        }
    }

    pub fn accepts(self, item: &RoadmapItem) -> bool {
        match self {
            Self::Archived => item.is_archived,
            _ if item.is_archived => false,
            Self::All => true,
            other => other.item_type() == Some(item.kind),
        }
    }
}

impl Display for ItemFilter {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ItemFilter {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|filter| filter.as_str() == value)
            .ok_or_else(|| {
                format!("unknown filter `{value}`; expected All|Add|Edit|Remove|Archived")
            })
    }
}

/// Innermost ordering applied after done and pinned status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first.
    #[default]
    Date,
    /// Urgent first.
    Priority,
    /// Title, locale-aware ascending.
    Name,
    /// Earliest due date first; undated items last.
    DueDate,
}

impl SortKey {
    pub const ALL: [SortKey; 4] = [
        SortKey::Date,
        SortKey::Priority,
        SortKey::Name,
        SortKey::DueDate,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Priority => "priority",
            Self::Name => "name",
            Self::DueDate => "dueDate",
        }
    }
}

impl Display for SortKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|key| key.as_str() == value)
            .ok_or_else(|| format!("unknown sort key `{value}`; expected date|priority|name|dueDate"))
    }
}

/// View parameters of one project screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectItemsQuery {
    pub project_id: ProjectId,
    pub filter: ItemFilter,
    /// Case-insensitive substring; empty matches everything.
    pub search: String,
    pub sort: SortKey,
}

impl ProjectItemsQuery {
    /// All non-archived items, newest first.
    pub fn new(project_id: ProjectId) -> Self {
        Self {
            project_id,
            filter: ItemFilter::default(),
            search: String::new(),
            sort: SortKey::default(),
        }
    }
}

/// Returns the items of `query.project_id` that the project screen shows, in
/// display order.
pub fn project_items<'a>(items: &'a [RoadmapItem], query: &ProjectItemsQuery) -> Vec<&'a RoadmapItem> {
    let needle = query.search.to_lowercase();
    let mut selected: Vec<&RoadmapItem> = items
        .iter()
        .filter(|item| item.project_id == query.project_id)
        .filter(|item| item.matches_search(&needle))
        .filter(|item| query.filter.accepts(item))
        .collect();

    // `sort_by` is stable, so full ties keep collection order.
    selected.sort_by(|a, b| compare_items(a, b, query.sort));
    selected
}

/// Done status, then pinned status, then `sort`.
pub fn compare_items(a: &RoadmapItem, b: &RoadmapItem, sort: SortKey) -> Ordering {
    a.is_done
        .cmp(&b.is_done)
        .then_with(|| b.is_pinned.cmp(&a.is_pinned))
        .then_with(|| match sort {
            SortKey::Date => b.created_at.cmp(&a.created_at),
            SortKey::Priority => b.priority.cmp(&a.priority),
            SortKey::Name => compare_titles(&a.title, &b.title),
            SortKey::DueDate => compare_due_dates(a.due_date, b.due_date),
        })
}

/// Natural-language title order.
///
/// Case-insensitive first; among titles equal ignoring case, lowercase sorts
/// before uppercase at the first differing position, then code point order.
pub fn compare_titles(a: &str, b: &str) -> Ordering {
    let folded_a = a.chars().flat_map(char::to_lowercase);
    let folded_b = b.chars().flat_map(char::to_lowercase);
    folded_a.cmp(folded_b).then_with(|| {
        a.chars()
            .zip(b.chars())
            .find(|(x, y)| x != y)
            .map_or(Ordering::Equal, |(x, y)| {
                x.is_uppercase().cmp(&y.is_uppercase())
            })
            .then_with(|| a.cmp(b))
    })
}

fn compare_due_dates(a: Option<NaiveDate>, b: Option<NaiveDate>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
