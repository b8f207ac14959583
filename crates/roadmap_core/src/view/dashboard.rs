//! Project dashboard: every project with its latest active idea.
//!
//! # Invariants
//! - Archived items never count as a project's latest idea.
//! - Summaries borrow from the collections; projects are not modified.

use crate::model::project::{Project, ProjectId};
use crate::model::roadmap_item::RoadmapItem;
use std::collections::hash_map::Entry;
use std::collections::HashMap;

/// Dashboard card data for one project.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProjectSummary<'a> {
    pub project: &'a Project,
    /// Newest non-archived item; the earliest in collection order on ties.
    pub latest_idea: Option<&'a RoadmapItem>,
}

/// Summaries for all projects, in project collection order.
pub fn dashboard<'a>(projects: &'a [Project], items: &'a [RoadmapItem]) -> Vec<ProjectSummary<'a>> {
    let mut latest: HashMap<ProjectId, &RoadmapItem> = HashMap::new();
    for item in items.iter().filter(|item| !item.is_archived) {
        match latest.entry(item.project_id) {
            Entry::Occupied(mut current) => {
                if item.created_at > current.get().created_at {
                    current.insert(item);
                }
            }
            Entry::Vacant(slot) => {
                slot.insert(item);
            }
        }
    }

    projects
        .iter()
        .map(|project| ProjectSummary {
            project,
            latest_idea: latest.get(&project.id).copied(),
        })
        .collect()
}

/// Keeps summaries whose project title or description contains `search`,
/// ignoring case. An empty search keeps everything.
pub fn filter_projects<'a>(summaries: Vec<ProjectSummary<'a>>, search: &str) -> Vec<ProjectSummary<'a>> {
    let needle = search.to_lowercase();
    summaries
        .into_iter()
        .filter(|summary| summary.project.matches_search(&needle))
        .collect()
}
