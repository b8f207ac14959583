use roadmap_core::db::migrations::latest_version;
use roadmap_core::db::{open_db, open_db_in_memory};
use roadmap_core::{
    load_json, save_json, BlobError, BlobStore, ItemType, ProjectDraft, RoadmapItemDraft,
    RoadmapStore, SqliteBlobStore, Theme,
};
use rusqlite::Connection;

#[test]
fn sqlite_blob_store_reads_back_written_values() {
    let conn = open_db_in_memory().unwrap();
    let mut blobs = SqliteBlobStore::try_new(&conn).unwrap();

    assert_eq!(blobs.read("projects").unwrap(), None);
    blobs.write("projects", "[]").unwrap();
    blobs.write("projects", "[1]").unwrap();
    blobs.write("theme", "\"dark\"").unwrap();

    assert_eq!(blobs.read("projects").unwrap().as_deref(), Some("[1]"));
    assert_eq!(blobs.keys().unwrap(), vec!["projects", "theme"]);
}

#[test]
fn json_helpers_round_trip_through_sqlite() {
    let conn = open_db_in_memory().unwrap();
    let mut blobs = SqliteBlobStore::try_new(&conn).unwrap();

    save_json(&mut blobs, "theme", &Theme::Light).unwrap();
    assert_eq!(load_json(&blobs, "theme", Theme::Dark), Theme::Light);

    blobs.write("theme", "\"sepia\"").unwrap();
    assert_eq!(load_json(&blobs, "theme", Theme::Dark), Theme::Dark);
}

#[test]
fn store_state_survives_reopening_the_database_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roadmap.db");

    let (projects, items) = {
        let conn = open_db(&path).unwrap();
        let mut store = RoadmapStore::open_empty(SqliteBlobStore::try_new(&conn).unwrap());
        let project_id = store
            .add_project(ProjectDraft::new("Core", "Rust rewrite").with_logo("data:image/png;base64,AA=="))
            .unwrap();
        let item_id = store
            .add_roadmap_item(RoadmapItemDraft::new(project_id, ItemType::Add, "Blob store"))
            .unwrap();
        store.toggle_done(item_id).unwrap();
        store.set_theme(Theme::Light);
        assert!(store.unsaved_keys().is_empty());
        (store.projects().to_vec(), store.roadmap_items().to_vec())
    };

    let conn = open_db(&path).unwrap();
    let store = RoadmapStore::open(SqliteBlobStore::try_new(&conn).unwrap());
    assert_eq!(store.projects(), projects.as_slice());
    assert_eq!(store.roadmap_items(), items.as_slice());
    assert_eq!(store.theme(), Theme::Light);
}

#[test]
fn blob_store_rejects_uninitialized_connection() {
    let conn = Connection::open_in_memory().unwrap();

    match SqliteBlobStore::try_new(&conn) {
        Err(BlobError::UninitializedConnection {
            expected_version,
            actual_version: 0,
        }) => assert_eq!(expected_version, latest_version()),
        Err(other) => panic!("unexpected error: {other}"),
        Ok(_) => panic!("expected uninitialized connection error"),
    }
}

#[test]
fn blob_store_rejects_connection_without_blobs_table() {
    let conn = Connection::open_in_memory().unwrap();
    conn.execute_batch(&format!("PRAGMA user_version = {};", latest_version()))
        .unwrap();

    assert!(matches!(
        SqliteBlobStore::try_new(&conn),
        Err(BlobError::MissingRequiredTable("blobs"))
    ));
}
