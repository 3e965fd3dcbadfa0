use museion::db::{DbActorHandle, EntityCreate, ExhibitCreate};
use museion::import::{IMPORT_REGISTRY, ImportPlan};
use museion::schema::{Entity, EntityKind, ImportRecord};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::fs;

async fn spawn_seeded(tag: &str) -> (DbActorHandle, PathBuf) {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("system time before UNIX_EPOCH")
        .as_nanos();
    let mut db_path = std::env::temp_dir();
    db_path.push(format!(
        "museion-import-{tag}-{}-{}.sqlite",
        std::process::id(),
        nanos
    ));
    let database_url = format!("sqlite:{}", db_path.display());

    let db = museion::db::spawn(&database_url).await;
    let templates = museion::config::Config::default().catalog.templates;
    db.seed(templates).await.expect("bootstrap seed succeeds");
    (db, db_path)
}

async fn cleanup(db_path: &Path) {
    let wal_path = PathBuf::from(format!("{}-wal", db_path.to_string_lossy()));
    let shm_path = PathBuf::from(format!("{}-shm", db_path.to_string_lossy()));
    let _ = fs::remove_file(&wal_path).await;
    let _ = fs::remove_file(&shm_path).await;
    let _ = fs::remove_file(db_path).await;
}

#[tokio::test]
async fn batch_of_five_shares_one_revision_and_arrives_in_one_delta() {
    let (db, db_path) = spawn_seeded("five").await;

    db.create(EntityCreate::Exhibit(ExhibitCreate::new("Before", "")))
        .await
        .unwrap();
    let previous = db.current_revision().await.unwrap();
    assert_eq!(previous, 1);

    // Deliberately out of dependency order: the exhibit references rows defined after it.
    let records = vec![
        ImportRecord::new("Exhibit", ["", "Mammoth", "Ice age giant", "10", "20", "30"]),
        ImportRecord::new("ExhibitSection", ["10", "Ice Age"]),
        ImportRecord::new("MediaResource", ["30", "mammoth.jpg"]),
        ImportRecord::new("MediaResource", ["31", "tusk.mp4"]),
        ImportRecord::new(
            "ViewController",
            ["20", "ExhibitImageViewController", "toExhibitImageViewController"],
        ),
    ];
    let plan = ImportPlan::build(&IMPORT_REGISTRY, &records).expect("plan builds");
    let receipt = db.import(plan.into_creates()).await.unwrap();

    assert_eq!(receipt.count, 5);
    assert_eq!(receipt.revision, previous + 1);
    assert_eq!(db.current_revision().await.unwrap(), previous + 1);

    let delta = db.delta(previous).await.unwrap();
    assert_eq!(delta.revision, receipt.revision);
    assert_eq!(delta.exhibits.len(), 1);
    assert_eq!(delta.exhibit_sections.len(), 1);
    assert_eq!(delta.resources.len(), 2);
    assert!(delta.exhibits.iter().all(|e| e.revision == receipt.revision));
    assert!(delta.exhibit_sections.iter().all(|s| s.revision == receipt.revision));
    assert!(delta.resources.iter().all(|r| r.revision == receipt.revision));

    let exhibit = &delta.exhibits[0];
    assert_eq!(exhibit.exhibit_section_id, 10);
    assert_eq!(exhibit.view_controller_id, 20);
    assert_eq!(exhibit.resource_id, 30);

    // Templates are served by the catalog, filtered by the same checkpoint.
    let catalog = db.catalog(Some(previous)).await.unwrap();
    assert_eq!(catalog.view_controllers.len(), 1);
    assert_eq!(catalog.view_controllers[0].id, 20);
    assert_eq!(catalog.view_controllers[0].revision, receipt.revision);
    assert_eq!(db.catalog(None).await.unwrap().view_controllers.len(), 2);

    cleanup(&db_path).await;
}

#[tokio::test]
async fn failing_record_rolls_back_the_whole_batch() {
    let (db, db_path) = spawn_seeded("rollback").await;

    let records = vec![
        ImportRecord::new("media_resource", ["", "hall.jpg"]),
        ImportRecord::new("exhibit_section", ["", "Hall"]),
        // Section 77 is neither in the store nor in the batch.
        ImportRecord::new("exhibit", ["", "Orphan", "", "77", "1", "1"]),
    ];
    let plan = ImportPlan::build(&IMPORT_REGISTRY, &records).expect("plan builds");
    let err = db.import(plan.into_creates()).await.unwrap_err();
    assert!(err.is_constraint(), "expected constraint violation, got {err}");

    assert_eq!(db.current_revision().await.unwrap(), 0);
    let delta = db.delta(0).await.unwrap();
    assert!(delta.is_empty(), "no partial batch may be visible: {delta:?}");

    // A clean retry gets the next number.
    let records = vec![ImportRecord::new("media_resource", ["", "hall.jpg"])];
    let plan = ImportPlan::build(&IMPORT_REGISTRY, &records).expect("plan builds");
    let receipt = db.import(plan.into_creates()).await.unwrap();
    assert_eq!(receipt.revision, 1);
    assert_eq!(receipt.count, 1);

    // Duplicates inside one batch are caught by the unique constraint as well.
    let records = vec![
        ImportRecord::new("media_resource", ["", "dup.jpg"]),
        ImportRecord::new("media_resource", ["", "dup.jpg"]),
    ];
    let plan = ImportPlan::build(&IMPORT_REGISTRY, &records).expect("plan builds");
    assert!(db.import(plan.into_creates()).await.unwrap_err().is_constraint());
    assert_eq!(db.current_revision().await.unwrap(), 1);

    cleanup(&db_path).await;
}

#[tokio::test]
async fn imported_ids_can_be_store_assigned() {
    let (db, db_path) = spawn_seeded("assigned").await;

    let records = vec![
        ImportRecord::new("information", ["", "Welcome", "Lot B", "9-17", "Main St 1"]),
        ImportRecord::new("exhibit_section", ["", ""]),
    ];
    let plan = ImportPlan::build(&IMPORT_REGISTRY, &records).expect("plan builds");
    let receipt = db.import(plan.into_creates()).await.unwrap();

    let delta = db.delta(0).await.unwrap();
    assert_eq!(delta.information.len(), 1);
    assert_eq!(delta.exhibit_sections.len(), 1);
    let section = &delta.exhibit_sections[0];
    // The placeholder holds id 1, so the store assigns the next one.
    assert!(section.id > 1);
    assert_eq!(section.name, None);
    assert_eq!(section.revision, receipt.revision);

    let found = db
        .get(EntityKind::Information, delta.information[0].id)
        .await
        .unwrap();
    assert!(matches!(found, Some(Entity::Information(_))));

    cleanup(&db_path).await;
}
