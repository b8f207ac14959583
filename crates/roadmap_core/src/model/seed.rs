//! Sample data installed when storage holds no collections yet.
//!
//! Ids are fixed so that reopening an untouched store yields the same records.

use crate::model::project::{Project, ProjectId};
use crate::model::roadmap_item::{ItemType, Priority, RoadmapItem};
use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

pub const WEBSITE_PROJECT_ID: ProjectId = Uuid::from_u128(0x5eed_0001_0000_4000_8000_000000000001);
pub const MOBILE_PROJECT_ID: ProjectId = Uuid::from_u128(0x5eed_0001_0000_4000_8000_000000000002);

/// Returns the two sample projects.
pub fn seed_projects() -> Vec<Project> {
    sample_projects().unwrap_or_default()
}

/// Returns the four sample items, one of them archived.
pub fn seed_roadmap_items() -> Vec<RoadmapItem> {
    sample_items().unwrap_or_default()
}

fn sample_projects() -> Option<Vec<Project>> {
    Some(vec![
        Project {
            id: WEBSITE_PROJECT_ID,
            title: "Website Redesign".to_string(),
            description: "Complete overhaul of the corporate website.".to_string(),
            created_at: at(2023, 10, 1, 10, 0)?,
            logo: None,
        },
        Project {
            id: MOBILE_PROJECT_ID,
            title: "Mobile App Launch".to_string(),
            description: "Develop and launch the new mobile application for iOS and Android."
                .to_string(),
            created_at: at(2023, 11, 15, 14, 30)?,
            logo: None,
        },
    ])
}

fn sample_items() -> Option<Vec<RoadmapItem>> {
    Some(vec![
        RoadmapItem {
            id: item_id(1),
            project_id: WEBSITE_PROJECT_ID,
            kind: ItemType::Add,
            title: "Implement new design system".to_string(),
            description: "Integrate the new Figma design system into the frontend codebase."
                .to_string(),
            created_at: at(2023, 10, 5, 9, 0)?,
            priority: Priority::High,
            is_pinned: false,
            is_done: false,
            is_archived: false,
            due_date: NaiveDate::from_ymd_opt(2024, 8, 15),
        },
        RoadmapItem {
            id: item_id(2),
            project_id: WEBSITE_PROJECT_ID,
            kind: ItemType::Edit,
            title: "Refactor authentication flow".to_string(),
            description: "Update the user login and registration process for better UX."
                .to_string(),
            created_at: at(2023, 10, 10, 11, 0)?,
            priority: Priority::Medium,
            is_pinned: false,
            is_done: true,
            is_archived: false,
            due_date: NaiveDate::from_ymd_opt(2024, 7, 20),
        },
        RoadmapItem {
            id: item_id(3),
            project_id: MOBILE_PROJECT_ID,
            kind: ItemType::Add,
            title: "Setup CI/CD pipeline".to_string(),
            description: "Create a continuous integration and deployment pipeline for both mobile platforms."
                .to_string(),
            created_at: at(2023, 11, 20, 16, 0)?,
            priority: Priority::Urgent,
            is_pinned: true,
            is_done: false,
            is_archived: false,
            due_date: None,
        },
        RoadmapItem {
            id: item_id(4),
            project_id: WEBSITE_PROJECT_ID,
            kind: ItemType::Remove,
            title: "Legacy IE11 support".to_string(),
            description: "Drop support for Internet Explorer 11 as per the new browser support policy."
                .to_string(),
            created_at: at(2023, 10, 12, 15, 0)?,
            priority: Priority::Low,
            is_pinned: false,
            is_done: false,
            is_archived: true,
            due_date: None,
        },
    ])
}

fn item_id(n: u128) -> Uuid {
    Uuid::from_u128(0x5eed_0002_0000_4000_8000_000000000000 | n)
}

fn at(year: i32, month: u32, day: u32, hour: u32, minute: u32) -> Option<DateTime<Utc>> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0).single()
}
