//! Cross-project "recent ideas" feed.

use crate::model::project::{Project, ProjectId};
use crate::model::roadmap_item::RoadmapItem;
use std::collections::HashMap;

/// Maximum number of entries in the feed.
pub const RECENT_IDEAS_LIMIT: usize = 10;

/// Label shown when an item's project no longer exists.
pub const UNKNOWN_PROJECT_TITLE: &str = "Unknown Project";

/// One feed row: the idea and the project it belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeedEntry<'a> {
    pub item: &'a RoadmapItem,
    pub project: Option<&'a Project>,
}

impl<'a> FeedEntry<'a> {
    pub fn project_title(&self) -> &'a str {
        self.project
            .map_or(UNKNOWN_PROJECT_TITLE, |project| project.title.as_str())
    }
}

/// Newest non-archived items across all projects, at most
/// [`RECENT_IDEAS_LIMIT`]. Equal timestamps keep collection order.
pub fn recent_ideas(items: &[RoadmapItem]) -> Vec<&RoadmapItem> {
    let mut ideas: Vec<&RoadmapItem> = items.iter().filter(|item| !item.is_archived).collect();
    ideas.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    ideas.truncate(RECENT_IDEAS_LIMIT);
    ideas
}

/// [`recent_ideas`] paired with each idea's owning project.
pub fn recent_feed<'a>(projects: &'a [Project], items: &'a [RoadmapItem]) -> Vec<FeedEntry<'a>> {
    let by_id: HashMap<ProjectId, &Project> = projects
        .iter()
        .map(|project| (project.id, project))
        .collect();

    recent_ideas(items)
        .into_iter()
        .map(|item| FeedEntry {
            item,
            project: by_id.get(&item.project_id).copied(),
        })
        .collect()
}
