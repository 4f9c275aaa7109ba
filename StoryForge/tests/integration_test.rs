use std::fs;
use std::path::Path;

use pretty_assertions::assert_eq;
use serde_json::{Value, json};
use storyforge::prelude::*;
use tempfile::tempdir;

fn write_json(dir: &Path, name: &str, value: &Value) {
    fs::write(dir.join(name), value.to_string()).unwrap();
}

/// A one-package export: an entity with a portrait, a dialogue whose flow
/// fragment follows a spoken line, a dangling edge and a fragment whose
/// dialogue was never exported.
fn write_sample_project(dir: &Path) {
    fs::create_dir_all(dir.join("Assets")).unwrap();
    fs::write(dir.join("Assets/portrait.JPG"), b"\xff\xd8\xff").unwrap();

    write_json(
        dir,
        "manifest.json",
        &json!({
            "Project": {"Name": "Harbor"},
            "Packages": [{
                "Files": {
                    "Objects": {"FileName": "package_objects.json"},
                    "Texts": {"FileName": "package_texts.json"}
                }
            }]
        }),
    );

    write_json(
        dir,
        "package_objects.json",
        &json!({"Objects": [
            {"Type": "Asset", "Category": "Image", "AssetRef": "Assets\\portrait.JPG",
             "Properties": {"Id": "P1", "Size": {"w": 64, "h": 64}}},
            {"Type": "Entity", "Properties": {
                "Id": "E1", "DisplayName": "E1.Name", "PreviewImage": {"Asset": "P1"}}},
            {"Type": "Dialogue", "Properties": {"Id": "D1", "DisplayName": "D1.Name"}},
            {"Type": "DialogueFragment", "Properties": {
                "Id": "F1", "Parent": "D1", "Text": "F1.Text", "Speaker": "E1",
                "OutputPins": [{"Connections": [{"Target": "F2"}, {"Target": "F9"}]}]
            }},
            {"Type": "FlowFragment", "Properties": {
                "Id": "F2", "Parent": "D1", "Text": "F2.Text",
                "Speaker": "0x0000000000000000"
            }},
            {"Type": "DialogueFragment", "Properties": {
                "Id": "F3", "Parent": "D404", "Text": "F3.Text", "Speaker": "E1",
                "OutputPins": [{"Connections": [{"Target": "F1"}]}]
            }},
            {"Type": "Jump", "Properties": {"Id": "J1"}}
        ]}),
    );

    write_json(
        dir,
        "package_texts.json",
        &json!({
            "E1.Name": {"": {"Text": "Captain"}},
            "D1.Name": {"": {"Text": "Arrival"}},
            "F1.Text": {
                "": {"Text": "Welcome aboard."},
                "VO_EN": {"Text": "Welcome aboard!", "VoAsset": "vo/f1.ogg"}
            },
            "F2.Text": {"": {"Text": ""}},
            "F3.Text": {"": {"Text": "Lost line"}}
        }),
    );
}

#[test]
fn test_convert_end_to_end() {
    let dir = tempdir().unwrap();
    write_sample_project(dir.path());

    let options = ConvertOptions::new()
        .with_output_path(dir.path().join("out/data.json"))
        .with_database_path(dir.path().join("out/story.db"));
    let summary = convert(dir.path(), &options).unwrap();

    assert_eq!(summary.project, "Harbor");
    assert_eq!(summary.images, 1);
    assert_eq!(summary.entities, 1);
    assert_eq!(summary.dialogues, 1);
    assert_eq!(summary.fragments, 3);
    assert_eq!(summary.localization_keys, 5);
    assert_eq!(summary.graph.dangling_edges, 1);
    assert_eq!(summary.graph.edges, 2);
    assert_eq!(summary.graph.inferred_speakers, 1);

    let db = summary.database.expect("database stats");
    assert_eq!(db.assets, 1);
    assert_eq!(db.localizations, 5);
    assert_eq!(db.entities, 1);
    assert_eq!(db.dialogue_speakers, 1);
    assert_eq!(db.fragments, 2);
    assert_eq!(db.skipped_fragments, 1);
    assert_eq!(db.connections, 2);
}

#[test]
fn test_document_contents() {
    let dir = tempdir().unwrap();
    write_sample_project(dir.path());

    let output = dir.path().join("data.json");
    let options = ConvertOptions::new()
        .with_output_path(&output)
        .without_database();
    let summary = convert(dir.path(), &options).unwrap();
    assert!(summary.database.is_none());
    assert!(!dir.path().join("story.db").exists());

    let doc: Value = serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
    let keys: Vec<&str> = doc.as_object().unwrap().keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["project", "localization", "entities", "dialogues", "fragments", "images"]
    );

    assert_eq!(doc["project"], json!("Harbor"));
    assert_eq!(doc["images"]["P1"]["width"], json!(64));
    assert_eq!(doc["images"]["P1"]["uri"], json!("data:image/jpeg;base64,/9j/"));
    assert_eq!(doc["entities"]["E1"]["preview"], json!("P1"));
    assert_eq!(doc["dialogues"]["D1"]["speakers"], json!(["E1"]));

    assert_eq!(doc["fragments"]["F1"]["outputs"], json!(["F2"]));
    assert_eq!(doc["fragments"]["F1"]["inputs"], json!(["F3"]));
    assert_eq!(doc["fragments"]["F2"]["inputs"], json!(["F1"]));
    assert_eq!(doc["fragments"]["F2"]["speaker"], json!("E1"));
    // Left out of the database, still in the document.
    assert_eq!(doc["fragments"]["F3"]["dialogue"], json!("D404"));

    let f1_text = &doc["localization"]["F1.Text"];
    assert_eq!(f1_text[""]["text"], json!("Welcome aboard."));
    assert_eq!(f1_text["vo_en"]["voasset"], json!("vo/f1.ogg"));
}

#[test]
fn test_database_rows() {
    let dir = tempdir().unwrap();
    write_sample_project(dir.path());

    let mut project = parse_project(dir.path()).unwrap();
    project.resolve();

    let mut db = StoryDatabase::open_in_memory().unwrap();
    db.materialize(&project).unwrap();
    let conn = db.connection();

    let meta: String = conn
        .query_row("SELECT meta FROM asset", [], |row| row.get(0))
        .unwrap();
    let meta: Value = serde_json::from_str(&meta).unwrap();
    assert_eq!(meta, json!({"width": 64, "height": 64}));

    let name: String = conn
        .query_row(
            "SELECT l.text FROM entity e JOIN localization l ON l.id = e.name_id",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(name, "Captain");

    // The flow fragment is stored under its inferred speaker.
    let speakers: Vec<String> = conn
        .prepare(
            "SELECT l.text FROM fragment f
             JOIN entity e ON e.id = f.speaker_id
             JOIN localization l ON l.id = e.name_id
             ORDER BY f.id",
        )
        .unwrap()
        .query_map([], |row| row.get(0))
        .unwrap()
        .collect::<std::result::Result<_, _>>()
        .unwrap();
    assert_eq!(speakers, vec!["Captain", "Captain"]);

    let connections: i64 = conn
        .query_row("SELECT COUNT(*) FROM fragmentconnection", [], |row| row.get(0))
        .unwrap();
    assert_eq!(connections, 2);
}

#[test]
fn test_reparse_is_stable() {
    let dir = tempdir().unwrap();
    write_sample_project(dir.path());

    let mut first = parse_project(dir.path()).unwrap();
    first.resolve();
    let mut second = parse_project(dir.path()).unwrap();
    second.resolve();
    second.resolve();

    assert_eq!(
        storyforge::export::to_document(&first, false).unwrap(),
        storyforge::export::to_document(&second, false).unwrap()
    );
}

#[test]
fn test_missing_image_aborts_before_output() {
    let dir = tempdir().unwrap();
    write_sample_project(dir.path());
    fs::remove_file(dir.path().join("Assets/portrait.JPG")).unwrap();

    let output = dir.path().join("data.json");
    let err = convert(dir.path(), &ConvertOptions::new().with_output_path(&output)).unwrap_err();
    assert!(matches!(err, Error::AssetNotFound { .. }));
    assert!(!output.exists());
}

#[test]
fn test_unresolved_reference_after_document() {
    let dir = tempdir().unwrap();
    write_sample_project(dir.path());
    write_json(
        dir.path(),
        "package_texts.json",
        &json!({"D1.Name": {"": {"Text": "Arrival"}}}),
    );

    let output = dir.path().join("data.json");
    let options = ConvertOptions::new()
        .with_output_path(&output)
        .with_database_path(dir.path().join("story.db"));
    let err = convert(dir.path(), &options).unwrap_err();

    match err {
        Error::UnresolvedReference { kind, key } => {
            assert_eq!(kind, ReferenceKind::Localization);
            assert_eq!(key, "E1.Name");
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(output.exists());
}

#[test]
fn test_missing_manifest() {
    let dir = tempdir().unwrap();
    let err = parse_project(dir.path()).unwrap_err();
    assert!(matches!(err, Error::FileNotFound { .. }));
}

#[test]
fn test_progress_phases() {
    use std::cell::RefCell;

    let dir = tempdir().unwrap();
    write_sample_project(dir.path());

    let phases = RefCell::new(Vec::new());
    let options = ConvertOptions::new()
        .with_output_path(dir.path().join("data.json"))
        .without_database();
    convert_with_progress(dir.path(), &options, &|phase| phases.borrow_mut().push(phase)).unwrap();

    assert_eq!(
        phases.into_inner(),
        vec![
            ConvertPhase::ReadingProject,
            ConvertPhase::ResolvingGraph,
            ConvertPhase::WritingDocument,
        ]
    );
}

#[test]
fn test_float_sizes_and_separate_database_dir() {
    let dir = tempdir().unwrap();
    write_sample_project(dir.path());
    let objects_path = dir.path().join("package_objects.json");
    let objects = fs::read_to_string(&objects_path).unwrap();
    assert!(objects.contains(r#"{"w":64,"h":64}"#));
    fs::write(&objects_path, objects.replace(r#"{"w":64,"h":64}"#, r#"{"w":64.0,"h":64.0}"#))
        .unwrap();

    let database = dir.path().join("build/db/story.db");
    let options = ConvertOptions::new()
        .with_output_path(dir.path().join("data.json"))
        .with_database_path(&database);
    let summary = convert(dir.path(), &options).unwrap();
    assert_eq!(summary.database.map(|db| db.fragments), Some(2));

    let db = StoryDatabase::open(&database).unwrap();
    let meta: String = db
        .connection()
        .query_row("SELECT meta FROM asset", [], |row| row.get(0))
        .unwrap();
    let meta: Value = serde_json::from_str(&meta).unwrap();
    assert_eq!(meta, json!({"width": 64.0, "height": 64.0}));
}
