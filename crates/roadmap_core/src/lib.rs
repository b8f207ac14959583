//! Core domain logic for the roadmap tracker.
//! This crate owns the project/item invariants and the derived list views.

pub mod db;
pub mod logging;
pub mod markup;
pub mod model;
pub mod repo;
pub mod service;
pub mod view;

pub use logging::{default_log_level, init_logging, logging_status};
pub use markup::inline::{
    render_blocks, render_excerpt_blocks, render_inline, render_summary, Block, Span,
};
pub use model::project::{Project, ProjectDraft, ProjectId};
pub use model::roadmap_item::{ItemType, Priority, RoadmapItem, RoadmapItemDraft, RoadmapItemId};
pub use model::theme::Theme;
pub use model::validation::ValidationError;
pub use repo::blob_repo::{
    load_json, load_records, load_value, save_json, BlobError, BlobResult, BlobStore, Loaded,
    MemoryBlobStore, SqliteBlobStore,
};
pub use service::roadmap_store::{ActiveView, RoadmapStore, StoreError, StoreResult};
pub use view::dashboard::{dashboard, filter_projects, ProjectSummary};
pub use view::project_items::{project_items, ItemFilter, ProjectItemsQuery, SortKey};
pub use view::recent::{recent_feed, recent_ideas, FeedEntry, RECENT_IDEAS_LIMIT};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
