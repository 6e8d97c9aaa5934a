use lux_report::model::{InspectorRecord, JobData, MeasurementKind};
use lux_report::store::{FileStore, ListOptions};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct Rec {
    name: String,
}

fn mk_store(case: &str) -> PathBuf {
    let root = std::env::temp_dir().join(format!(
        "lux-report-store-{}-{case}",
        std::process::id()
    ));
    let _ = std::fs::remove_dir_all(&root);
    std::fs::create_dir_all(&root).unwrap();
    root
}

fn write_doc(root: &Path, collection: &str, id: &str, json: &str) {
    let dir = root.join(collection);
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join(format!("{id}.json")), json).unwrap();
}

#[test]
fn job_decodes_legacy_field_names() {
    let root = mk_store("legacy");
    write_doc(
        &root,
        "jobs",
        "J-1",
        r#"{
            "customerName": "Acme",
            "reportCreator": "สมหญิง",
            "results": [
                {"measurementType": "spot", "spotValue": "350", "evaluation": "ผ่าน"},
                {"areaAvgValue": "250", "areaMinValue": "180"}
            ]
        }"#,
    );

    let store = FileStore::open(&root).unwrap();
    let job = store.job("J-1").unwrap().expect("job present");
    assert_eq!(job.customer_name.as_deref(), Some("Acme"));
    assert_eq!(job.report_creator.as_deref(), Some("สมหญิง"));
    assert_eq!(job.results.len(), 2);
    assert_eq!(job.results[0].kind, MeasurementKind::Spot);
    // missing measurementType defaults to the area kind
    assert_eq!(job.results[1].kind, MeasurementKind::Area);

    assert!(store.job("J-2").unwrap().is_none());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn document_ids_never_escape_the_collection() {
    let root = mk_store("ids");
    let store = FileStore::open(&root).unwrap();
    assert!(store.document::<JobData>("jobs", "../jobs/J-1").is_err());
    assert!(store.document::<JobData>("jobs", "a/b").is_err());
    assert!(store.document::<JobData>("jobs", "").is_err());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn listing_is_deterministic_and_ignores_non_json() {
    let root = mk_store("list");
    write_doc(&root, "people", "b", r#"{"name": "B"}"#);
    write_doc(&root, "people", "a", r#"{"name": "A"}"#);
    write_doc(&root, "people", "c", r#"{"name": "C"}"#);
    std::fs::write(root.join("people").join("notes.txt"), "skip me").unwrap();

    let store = FileStore::open(&root).unwrap();
    let docs: Vec<(String, Rec)> = store.documents("people", &ListOptions::default()).unwrap();
    let ids: Vec<&str> = docs.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn order_filter_and_limit() {
    let root = mk_store("opts");
    write_doc(&root, "jobs", "1", r#"{"name": "ค", "status": "done"}"#);
    write_doc(&root, "jobs", "2", r#"{"name": "ก", "status": "open"}"#);
    write_doc(&root, "jobs", "3", r#"{"name": "ข", "status": "done"}"#);

    let store = FileStore::open(&root).unwrap();

    let by_name: Vec<(String, Rec)> = store
        .documents(
            "jobs",
            &ListOptions {
                order_by: Some("name".into()),
                ascending: true,
                ..ListOptions::default()
            },
        )
        .unwrap();
    let names: Vec<&str> = by_name.iter().map(|(_, r)| r.name.as_str()).collect();
    assert_eq!(names, vec!["ก", "ข", "ค"]);

    let reversed: Vec<(String, Rec)> = store
        .documents(
            "jobs",
            &ListOptions {
                order_by: Some("name".into()),
                ascending: false,
                ..ListOptions::default()
            },
        )
        .unwrap();
    let names: Vec<&str> = reversed.iter().map(|(_, r)| r.name.as_str()).collect();
    assert_eq!(names, vec!["ค", "ข", "ก"]);

    let done: Vec<(String, Rec)> = store
        .documents(
            "jobs",
            &ListOptions {
                filter_eq: Some(("status".into(), "done".into())),
                ..ListOptions::default()
            },
        )
        .unwrap();
    let ids: Vec<&str> = done.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(ids, vec!["1", "3"]);

    let capped: Vec<(String, Rec)> = store
        .documents(
            "jobs",
            &ListOptions {
                limit: Some(2),
                ..ListOptions::default()
            },
        )
        .unwrap();
    assert_eq!(capped.len(), 2);
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn missing_collection_lists_empty() {
    let root = mk_store("empty");
    let store = FileStore::open(&root).unwrap();
    let docs: Vec<(String, Rec)> = store.documents("nothing", &ListOptions::default()).unwrap();
    assert!(docs.is_empty());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn corrupt_document_is_an_error_not_a_miss() {
    let root = mk_store("corrupt");
    write_doc(&root, "jobs", "bad", "{ not json");
    let store = FileStore::open(&root).unwrap();
    assert!(store.job("bad").is_err());
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn master_data_orders_inspectors_and_takes_first_company() {
    let root = mk_store("master");
    write_doc(
        &root,
        "inspectors",
        "x",
        r#"{"name": "ขวัญ", "title": "ผู้ตรวจวัดและวิเคราะห์"}"#,
    );
    write_doc(
        &root,
        "inspectors",
        "y",
        r#"{"name": "กานต์", "title": "ผู้ควบคุมดูแล"}"#,
    );
    write_doc(&root, "company", "02-alt", r#"{"name": "บริษัท สอง"}"#);
    write_doc(&root, "company", "01-main", r#"{"name": "บริษัท หนึ่ง"}"#);

    let store = FileStore::open(&root).unwrap();
    let master = store.master_data().unwrap();
    let names: Vec<&str> = master.inspectors.iter().map(|i| i.name.as_str()).collect();
    assert_eq!(names, vec!["กานต์", "ขวัญ"]);
    assert_eq!(
        master.company.as_ref().and_then(|c| c.name.as_deref()),
        Some("บริษัท หนึ่ง")
    );
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn inspector_record_accepts_legacy_keys() {
    let root = mk_store("legacy-keys");
    write_doc(
        &root,
        "inspectors",
        "i1",
        r#"{"inspectorName": "สมชาย", "inspectorTitle": "นักวิชาการ", "inspectorLicense": "กท-5"}"#,
    );
    let store = FileStore::open(&root).unwrap();
    let rec: InspectorRecord = store
        .document("inspectors", "i1")
        .unwrap()
        .expect("record present");
    assert_eq!(rec.name, "สมชาย");
    assert_eq!(rec.title, "นักวิชาการ");
    assert_eq!(rec.license.as_deref(), Some("กท-5"));
    let _ = std::fs::remove_dir_all(&root);
}

#[test]
fn open_requires_existing_root() {
    let missing = std::env::temp_dir().join(format!(
        "lux-report-store-{}-does-not-exist",
        std::process::id()
    ));
    assert!(FileStore::open(&missing).is_err());
}
