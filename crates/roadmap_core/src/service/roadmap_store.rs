//! Project and roadmap item store.
//!
//! # Responsibility
//! - Own the project and item collections plus UI selection state.
//! - Apply create/update/archive/delete semantics, including cascades.
//! - Persist every change through the injected [`BlobStore`].
//!
//! # Invariants
//! - Collections are replaced wholesale; readers never see a half-applied
//!   mutation.
//! - Deleting a project removes exactly the items it owns, and both
//!   collections are swapped before either is written.
//! - Mutations naming a missing id fail with a not-found error and change
//!   nothing.
//! - A failed write keeps the in-memory change; the key is reported by
//!   [`RoadmapStore::unsaved_keys`] until a later write succeeds.
//! - A stored document that did not decode in full is copied to a backup key
//!   before its key is first overwritten.

use crate::model::project::{Project, ProjectDraft, ProjectId};
use crate::model::roadmap_item::{RoadmapItem, RoadmapItemDraft, RoadmapItemId};
use crate::model::seed::{seed_projects, seed_roadmap_items};
use crate::model::theme::Theme;
use crate::model::validation::ValidationError;
use crate::repo::blob_repo::{
    load_records, load_value, save_json, BlobError, BlobStore, PROJECTS_KEY, ROADMAP_ITEMS_KEY,
    THEME_KEY,
};
use crate::view::dashboard::{dashboard, ProjectSummary};
use crate::view::project_items::{project_items, ProjectItemsQuery};
use crate::view::recent::{recent_feed, FeedEntry};
use chrono::{DateTime, Utc};
use log::{debug, error, info, warn};
use std::collections::{BTreeMap, BTreeSet};
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Error for store mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(ValidationError),
    ProjectNotFound(ProjectId),
    ItemNotFound(RoadmapItemId),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::ProjectNotFound(id) => write!(f, "project not found: {id}"),
            Self::ItemNotFound(id) => write!(f, "roadmap item not found: {id}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

/// Top-level screen shown when no project is selected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ActiveView {
    #[default]
    Projects,
    Recent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Collection {
    Projects,
    RoadmapItems,
    Theme,
}

impl Collection {
    fn key(self) -> &'static str {
        match self {
            Self::Projects => PROJECTS_KEY,
            Self::RoadmapItems => ROADMAP_ITEMS_KEY,
            Self::Theme => THEME_KEY,
        }
    }

    fn backup_key(self) -> String {
        format!(
            "{}.backup-{}",
            self.key(),
            Utc::now().format("%Y%m%dT%H%M%S%.3fZ")
        )
    }
}

/// Authoritative in-memory state backed by a blob store.
pub struct RoadmapStore<B: BlobStore> {
    blobs: B,
    projects: Vec<Project>,
    roadmap_items: Vec<RoadmapItem>,
    theme: Theme,
    selected_project_id: Option<ProjectId>,
    active_view: ActiveView,
    unsaved: BTreeSet<Collection>,
    /// Raw documents that lost records on load, pending backup.
    undecoded: BTreeMap<Collection, String>,
    backup_keys: Vec<String>,
}

impl<B: BlobStore> RoadmapStore<B> {
    /// Loads state from `blobs`, installing sample data for absent keys.
    pub fn open(blobs: B) -> Self {
        Self::open_with_defaults(blobs, seed_projects(), seed_roadmap_items())
    }

    /// Loads state from `blobs`, starting empty for absent keys.
    pub fn open_empty(blobs: B) -> Self {
        Self::open_with_defaults(blobs, Vec::new(), Vec::new())
    }

    /// Loads state from `blobs`, using the given collections for absent or
    /// malformed keys. Defaults are not written back until the first change.
    ///
    /// Records that fail to decode are dropped from memory; the stored
    /// document is backed up on the first write to its key.
    pub fn open_with_defaults(
        blobs: B,
        default_projects: Vec<Project>,
        default_items: Vec<RoadmapItem>,
    ) -> Self {
        let projects = load_records(&blobs, PROJECTS_KEY, default_projects);
        let roadmap_items = load_records(&blobs, ROADMAP_ITEMS_KEY, default_items);
        let theme = load_value(&blobs, THEME_KEY, Theme::default());
        let undecoded: BTreeMap<Collection, String> = [
            (Collection::Projects, projects.undecoded),
            (Collection::RoadmapItems, roadmap_items.undecoded),
            (Collection::Theme, theme.undecoded),
        ]
        .into_iter()
        .filter_map(|(collection, raw)| raw.map(|raw| (collection, raw)))
        .collect();
        let (projects, roadmap_items, theme) = (projects.value, roadmap_items.value, theme.value);

        info!(
            "event=store_open module=store status=ok projects={} roadmap_items={} theme={} undecoded_keys={}",
            projects.len(),
            roadmap_items.len(),
            theme.as_str(),
            undecoded.len()
        );

        Self {
            blobs,
            projects,
            roadmap_items,
            theme,
            selected_project_id: None,
            active_view: ActiveView::default(),
            unsaved: BTreeSet::new(),
            undecoded,
            backup_keys: Vec::new(),
        }
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn roadmap_items(&self) -> &[RoadmapItem] {
        &self.roadmap_items
    }

    pub fn project(&self, id: ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn roadmap_item(&self, id: RoadmapItemId) -> Option<&RoadmapItem> {
        self.roadmap_items.iter().find(|item| item.id == id)
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn active_view(&self) -> ActiveView {
        self.active_view
    }

    pub fn selected_project_id(&self) -> Option<ProjectId> {
        self.selected_project_id
    }

    pub fn selected_project(&self) -> Option<&Project> {
        self.selected_project_id.and_then(|id| self.project(id))
    }

    pub fn blobs(&self) -> &B {
        &self.blobs
    }

    pub fn blobs_mut(&mut self) -> &mut B {
        &mut self.blobs
    }

    /// Items of the selected project, filtered and sorted per `query`.
    ///
    /// `query.project_id` is ignored in favour of the current selection;
    /// returns an empty list when nothing is selected.
    pub fn selected_project_items(&self, query: &ProjectItemsQuery) -> Vec<&RoadmapItem> {
        match self.selected_project_id {
            Some(project_id) => project_items(
                &self.roadmap_items,
                &ProjectItemsQuery {
                    project_id,
                    ..query.clone()
                },
            ),
            None => Vec::new(),
        }
    }

    pub fn recent_feed(&self) -> Vec<FeedEntry<'_>> {
        recent_feed(&self.projects, &self.roadmap_items)
    }

    pub fn dashboard(&self) -> Vec<ProjectSummary<'_>> {
        dashboard(&self.projects, &self.roadmap_items)
    }

    /// Creates a project and selects it.
    ///
    /// # Contract
    /// - Assigns a fresh id and a creation time not older than any existing
    ///   project's.
    /// - Switches the active view to [`ActiveView::Projects`].
    pub fn add_project(&mut self, draft: ProjectDraft) -> StoreResult<ProjectId> {
        reject_invalid("project_add", draft.validate())?;

        let created_at = next_timestamp(self.projects.iter().map(|project| project.created_at));
        let project = Project::from_draft(draft, created_at);
        let project_id = project.id;

        let mut next = self.projects.clone();
        next.push(project);
        self.replace_projects(next);

        self.selected_project_id = Some(project_id);
        self.active_view = ActiveView::Projects;
        info!(
            "event=project_add module=store status=ok project_id={} projects={}",
            project_id,
            self.projects.len()
        );
        Ok(project_id)
    }

    /// Replaces title, description and logo of one project.
    pub fn update_project(&mut self, id: ProjectId, draft: ProjectDraft) -> StoreResult<()> {
        reject_invalid("project_update", draft.validate())?;
        let Some(index) = self.projects.iter().position(|project| project.id == id) else {
            return Err(not_found("project_update", StoreError::ProjectNotFound(id)));
        };

        let mut next = self.projects.clone();
        next[index] = self.projects[index].edited(draft);
        self.replace_projects(next);

        info!("event=project_update module=store status=ok project_id={id}");
        Ok(())
    }

    /// Deletes a project and every item it owns.
    ///
    /// Returns the number of cascaded items. Clears the selection when it
    /// pointed at the deleted project.
    pub fn delete_project(&mut self, id: ProjectId) -> StoreResult<usize> {
        if self.project(id).is_none() {
            return Err(not_found("project_delete", StoreError::ProjectNotFound(id)));
        }

        let next_projects: Vec<Project> = self
            .projects
            .iter()
            .filter(|project| project.id != id)
            .cloned()
            .collect();
        let next_items: Vec<RoadmapItem> = self
            .roadmap_items
            .iter()
            .filter(|item| item.project_id != id)
            .cloned()
            .collect();
        let removed_items = self.roadmap_items.len() - next_items.len();

        self.projects = next_projects;
        self.roadmap_items = next_items;
        if self.selected_project_id == Some(id) {
            self.selected_project_id = None;
        }
        self.persist(Collection::Projects);
        self.persist(Collection::RoadmapItems);

        info!(
            "event=project_delete module=store status=ok project_id={} removed_items={}",
            id, removed_items
        );
        Ok(removed_items)
    }

    /// Creates an active, not-done item in `draft.project_id`.
    pub fn add_roadmap_item(&mut self, draft: RoadmapItemDraft) -> StoreResult<RoadmapItemId> {
        reject_invalid("item_add", draft.validate())?;

        let created_at = next_timestamp(self.roadmap_items.iter().map(|item| item.created_at));
        let item = RoadmapItem::from_draft(draft, created_at);
        let item_id = item.id;
        let project_id = item.project_id;

        let mut next = self.roadmap_items.clone();
        next.push(item);
        self.replace_items(next);

        info!(
            "event=item_add module=store status=ok item_id={} project_id={}",
            item_id, project_id
        );
        Ok(item_id)
    }

    /// Saves an edited copy of an item, replacing the stored record by id.
    pub fn update_roadmap_item(&mut self, item: RoadmapItem) -> StoreResult<()> {
        reject_invalid("item_update", item.validate())?;
        let item_id = item.id;
        self.replace_item("item_update", item_id, |_| item)
    }

    /// Sets `is_archived`; repeated calls keep it set.
    pub fn archive_roadmap_item(&mut self, id: RoadmapItemId) -> StoreResult<()> {
        self.replace_item("item_archive", id, |item| item.with_archived(true))
    }

    pub fn unarchive_roadmap_item(&mut self, id: RoadmapItemId) -> StoreResult<()> {
        self.replace_item("item_unarchive", id, |item| item.with_archived(false))
    }

    pub fn toggle_done(&mut self, id: RoadmapItemId) -> StoreResult<()> {
        self.replace_item("item_toggle_done", id, RoadmapItem::with_done_toggled)
    }

    /// Selects a project, or returns to the top-level view with `None`.
    pub fn select_project(&mut self, id: Option<ProjectId>) -> StoreResult<()> {
        if let Some(project_id) = id {
            if self.project(project_id).is_none() {
                return Err(not_found(
                    "project_select",
                    StoreError::ProjectNotFound(project_id),
                ));
            }
        }
        self.selected_project_id = id;
        Ok(())
    }

    /// Switches the top-level view and clears the project selection.
    pub fn select_view(&mut self, view: ActiveView) {
        self.selected_project_id = None;
        self.active_view = view;
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
        self.persist(Collection::Theme);
    }

    pub fn toggle_theme(&mut self) -> Theme {
        self.set_theme(self.theme.toggled());
        self.theme
    }

    /// Storage keys whose latest write failed.
    pub fn unsaved_keys(&self) -> Vec<&'static str> {
        self.unsaved.iter().map(|collection| collection.key()).collect()
    }

    /// Keys holding copies of stored documents that did not decode in full.
    pub fn backup_keys(&self) -> &[String] {
        &self.backup_keys
    }

    /// Re-attempts writes for every key in [`Self::unsaved_keys`].
    ///
    /// # Errors
    /// Returns the last write error; keys that succeeded are cleared.
    pub fn flush(&mut self) -> Result<(), BlobError> {
        let pending: Vec<Collection> = self.unsaved.iter().copied().collect();
        let mut last_error = None;
        for collection in pending {
            if let Err(err) = self.write(collection) {
                last_error = Some(err);
            }
        }
        match last_error {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn back_up_undecoded(&mut self, collection: Collection) -> Result<(), BlobError> {
        let Some(raw) = self.undecoded.get(&collection) else {
            return Ok(());
        };
        let backup_key = collection.backup_key();
        if let Err(err) = self.blobs.write(&backup_key, raw) {
            warn!(
                "event=blob_backup module=store status=error key={} backup_key={} error={}",
                collection.key(),
                backup_key,
                err
            );
            return Err(err);
        }

        info!(
            "event=blob_backup module=store status=ok key={} backup_key={} bytes={}",
            collection.key(),
            backup_key,
            raw.len()
        );
        self.undecoded.remove(&collection);
        self.backup_keys.push(backup_key);
        Ok(())
    }

    fn replace_item(
        &mut self,
        event: &'static str,
        id: RoadmapItemId,
        change: impl FnOnce(&RoadmapItem) -> RoadmapItem,
    ) -> StoreResult<()> {
        let Some(index) = self.roadmap_items.iter().position(|item| item.id == id) else {
            return Err(not_found(event, StoreError::ItemNotFound(id)));
        };

        let mut next = self.roadmap_items.clone();
        next[index] = change(&self.roadmap_items[index]);
        self.replace_items(next);

        info!("event={event} module=store status=ok item_id={id}");
        Ok(())
    }

    fn replace_projects(&mut self, next: Vec<Project>) {
        self.projects = next;
        self.persist(Collection::Projects);
    }

    fn replace_items(&mut self, next: Vec<RoadmapItem>) {
        self.roadmap_items = next;
        self.persist(Collection::RoadmapItems);
    }

    // Write failures are kept off the mutation result: the change already
    // happened in memory and stays visible for this session.
    fn persist(&mut self, collection: Collection) {
        if let Err(err) = self.write(collection) {
            error!(
                "event=store_persist module=store status=error key={} unsaved_keys={} error={}",
                collection.key(),
                self.unsaved.len(),
                err
            );
        }
    }

    fn write(&mut self, collection: Collection) -> Result<(), BlobError> {
        let key = collection.key();
        let result = self.back_up_undecoded(collection).and_then(|()| match collection {
            Collection::Projects => save_json(&mut self.blobs, key, &self.projects),
            Collection::RoadmapItems => save_json(&mut self.blobs, key, &self.roadmap_items),
            Collection::Theme => save_json(&mut self.blobs, key, &self.theme),
        });
        match result {
            Ok(()) => {
                self.unsaved.remove(&collection);
                Ok(())
            }
            Err(err) => {
                self.unsaved.insert(collection);
                Err(err)
            }
        }
    }
}

/// Current time, clamped so it never precedes the newest existing timestamp.
fn next_timestamp(existing: impl Iterator<Item = DateTime<Utc>>) -> DateTime<Utc> {
    let now = Utc::now();
    existing.max().map_or(now, |latest| now.max(latest))
}

fn reject_invalid(event: &'static str, result: Result<(), ValidationError>) -> StoreResult<()> {
    result.map_err(|err| {
        debug!("event={event} module=store status=rejected reason=validation error={err}");
        StoreError::Validation(err)
    })
}

fn not_found(event: &'static str, err: StoreError) -> StoreError {
    debug!("event={event} module=store status=rejected reason=not_found error={err}");
    err
}

#[cfg(test)]
mod tests {
    use super::next_timestamp;
    use chrono::{Duration, Utc};

    #[test]
    fn next_timestamp_never_goes_backwards() {
        let future = Utc::now() + Duration::hours(1);
        assert_eq!(next_timestamp([future].into_iter()), future);
    }

    #[test]
    fn next_timestamp_uses_clock_when_ahead() {
        let before = Utc::now();
        let past = before - Duration::days(3);
        assert!(next_timestamp([past].into_iter()) >= before);
        assert!(next_timestamp(std::iter::empty()) >= before);
    }
}
