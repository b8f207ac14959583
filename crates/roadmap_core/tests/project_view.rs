use chrono::{NaiveDate, TimeZone, Utc};
use roadmap_core::{
    project_items, ItemFilter, ItemType, Priority, ProjectId, ProjectItemsQuery, RoadmapItem,
    SortKey,
};
use uuid::Uuid;

fn item(project_id: ProjectId, kind: ItemType, title: &str, day: u32) -> RoadmapItem {
    RoadmapItem {
        id: Uuid::new_v4(),
        project_id,
        kind,
        title: title.to_string(),
        description: String::new(),
        created_at: Utc.with_ymd_and_hms(2023, 10, day, 9, 0, 0).unwrap(),
        priority: Priority::Medium,
        is_pinned: false,
        is_done: false,
        is_archived: false,
        due_date: None,
    }
}

fn titles(items: &[&RoadmapItem]) -> Vec<String> {
    items.iter().map(|item| item.title.clone()).collect()
}

fn query(project_id: ProjectId, filter: ItemFilter, sort: SortKey) -> ProjectItemsQuery {
    ProjectItemsQuery {
        filter,
        sort,
        ..ProjectItemsQuery::new(project_id)
    }
}

#[test]
fn only_items_of_the_requested_project_are_listed() {
    let project = Uuid::new_v4();
    let other = Uuid::new_v4();
    let items = vec![
        item(project, ItemType::Add, "mine", 1),
        item(other, ItemType::Add, "theirs", 2),
    ];

    let listed = project_items(&items, &ProjectItemsQuery::new(project));
    assert_eq!(titles(&listed), vec!["mine"]);
}

#[test]
fn search_matches_title_or_description_ignoring_case() {
    let project = Uuid::new_v4();
    let mut described = item(project, ItemType::Edit, "Refactor auth", 1);
    described.description = "Better LOGIN flow".to_string();
    let items = vec![
        described,
        item(project, ItemType::Add, "Login page", 2),
        item(project, ItemType::Add, "Unrelated", 3),
    ];

    let mut q = ProjectItemsQuery::new(project);
    q.search = "login".to_string();
    let listed = project_items(&items, &q);
    assert_eq!(titles(&listed), vec!["Login page", "Refactor auth"]);

    q.search = String::new();
    assert_eq!(project_items(&items, &q).len(), 3);
}

#[test]
fn archived_filter_shows_archived_items_of_every_type() {
    let project = Uuid::new_v4();
    let mut archived_add = item(project, ItemType::Add, "old add", 1);
    archived_add.is_archived = true;
    let mut archived_remove = item(project, ItemType::Remove, "old remove", 2);
    archived_remove.is_archived = true;
    let items = vec![
        archived_add,
        archived_remove,
        item(project, ItemType::Add, "live add", 3),
    ];

    let listed = project_items(&items, &query(project, ItemFilter::Archived, SortKey::Date));
    assert_eq!(titles(&listed), vec!["old remove", "old add"]);
    assert!(listed.iter().all(|item| item.is_archived));
}

#[test]
fn type_filters_hide_archived_items() {
    let project = Uuid::new_v4();
    let mut archived_add = item(project, ItemType::Add, "old add", 1);
    archived_add.is_archived = true;
    let items = vec![
        archived_add,
        item(project, ItemType::Add, "live add", 2),
        item(project, ItemType::Edit, "live edit", 3),
    ];

    let adds = project_items(&items, &query(project, ItemFilter::Add, SortKey::Date));
    assert_eq!(titles(&adds), vec!["live add"]);

    let all = project_items(&items, &query(project, ItemFilter::All, SortKey::Date));
    assert_eq!(titles(&all), vec!["live edit", "live add"]);
}

#[test]
fn done_items_sink_below_open_and_pinned_rise_above_unpinned() {
    let project = Uuid::new_v4();
    let mut done_pinned = item(project, ItemType::Add, "done pinned", 4);
    done_pinned.is_done = true;
    done_pinned.is_pinned = true;
    let mut open_pinned = item(project, ItemType::Add, "open pinned", 1);
    open_pinned.is_pinned = true;
    let items = vec![
        done_pinned,
        item(project, ItemType::Add, "open newest", 5),
        open_pinned,
    ];

    let listed = project_items(&items, &ProjectItemsQuery::new(project));
    assert_eq!(
        titles(&listed),
        vec!["open pinned", "open newest", "done pinned"]
    );
}

#[test]
fn pinned_medium_beats_unpinned_high_under_priority_sort() {
    let project = Uuid::new_v4();
    let mut pinned = item(project, ItemType::Add, "pinned medium", 1);
    pinned.is_pinned = true;
    pinned.priority = Priority::Medium;
    let mut high = item(project, ItemType::Add, "unpinned high", 2);
    high.priority = Priority::High;
    let mut urgent = item(project, ItemType::Add, "unpinned urgent", 3);
    urgent.priority = Priority::Urgent;
    let items = vec![high, pinned, urgent];

    let listed = project_items(&items, &query(project, ItemFilter::All, SortKey::Priority));
    assert_eq!(
        titles(&listed),
        vec!["pinned medium", "unpinned urgent", "unpinned high"]
    );
}

#[test]
fn due_date_sort_is_ascending_with_undated_last() {
    let project = Uuid::new_v4();
    let mut august = item(project, ItemType::Add, "august", 1);
    august.due_date = NaiveDate::from_ymd_opt(2024, 8, 15);
    let mut july = item(project, ItemType::Add, "july", 2);
    july.due_date = NaiveDate::from_ymd_opt(2024, 7, 20);
    let undated = item(project, ItemType::Add, "undated", 3);
    let items = vec![undated, august, july];

    let listed = project_items(&items, &query(project, ItemFilter::All, SortKey::DueDate));
    assert_eq!(titles(&listed), vec!["july", "august", "undated"]);
}

#[test]
fn name_sort_ignores_case() {
    let project = Uuid::new_v4();
    let items = vec![
        item(project, ItemType::Add, "charlie", 1),
        item(project, ItemType::Add, "Bravo", 2),
        item(project, ItemType::Add, "alpha", 3),
    ];

    let listed = project_items(&items, &query(project, ItemFilter::All, SortKey::Name));
    assert_eq!(titles(&listed), vec!["alpha", "Bravo", "charlie"]);
}

#[test]
fn full_ties_keep_collection_order() {
    let project = Uuid::new_v4();
    let mut items = vec![
        item(project, ItemType::Add, "first", 1),
        item(project, ItemType::Add, "second", 1),
        item(project, ItemType::Add, "third", 1),
    ];
    for entry in &mut items {
        entry.due_date = None;
        entry.priority = Priority::Low;
    }

    for sort in [SortKey::Date, SortKey::Priority, SortKey::DueDate] {
        let listed = project_items(&items, &query(project, ItemFilter::All, sort));
        assert_eq!(titles(&listed), vec!["first", "second", "third"], "sort={sort}");
    }
}
