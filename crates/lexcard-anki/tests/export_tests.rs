//! Integration tests for lexcard-anki
//!
//! Export a package, unpack it, and read the collection back.

use lexcard_anki::{AnkiExporter, BASIC_MODEL_ID, CLOZE_MODEL_ID, DECK_ID, FIELD_SEPARATOR};
use lexcard_domain::{Card, CardType, PackageExporter};
use rusqlite::Connection;
use std::io::Read;
use tempfile::TempDir;

fn unpack(package: &std::path::Path, into: &std::path::Path) -> (Connection, String) {
    let mut archive = zip::ZipArchive::new(std::fs::File::open(package).unwrap()).unwrap();

    let mut media = String::new();
    archive
        .by_name("media")
        .unwrap()
        .read_to_string(&mut media)
        .unwrap();

    let mut db = Vec::new();
    archive
        .by_name("collection.anki2")
        .unwrap()
        .read_to_end(&mut db)
        .unwrap();
    let db_path = into.join("collection.anki2");
    std::fs::write(&db_path, db).unwrap();

    (Connection::open(db_path).unwrap(), media)
}

fn legal_card() -> Card {
    Card {
        card_type: CardType::Basic,
        question: "什么是垄断协议？".to_string(),
        answer: "排除、限制竞争的协议、决定或者其他协同行为。".to_string(),
        source_doc: "反垄断法.pdf".to_string(),
        source_loc: "第十六条".to_string(),
        tags: vec!["statute".to_string(), "kw:垄断协议".to_string()],
        difficulty: Some("中等".to_string()),
        evidence: Some("本法所称垄断协议，是指排除、限制竞争的协议、决定或者其他协同行为。".to_string()),
        quality: 0.9,
    }
}

#[test]
fn test_export_writes_package() {
    let out = TempDir::new().unwrap();
    let exporter = AnkiExporter::new(out.path().join("exports"));

    let path = exporter.export("反垄断法", &[legal_card()]).unwrap();

    assert_eq!(path, out.path().join("exports").join("反垄断法.apkg"));
    assert!(path.exists());

    let scratch = TempDir::new().unwrap();
    let (conn, media) = unpack(&path, scratch.path());
    assert_eq!(media, "{}");

    let (mid, flds, tags): (i64, String, String) = conn
        .query_row("SELECT mid, flds, tags FROM notes", [], |r| {
            Ok((r.get(0)?, r.get(1)?, r.get(2)?))
        })
        .unwrap();
    assert_eq!(mid, BASIC_MODEL_ID);
    assert_eq!(tags, " statute kw:垄断协议 ");

    let fields: Vec<&str> = flds.split(FIELD_SEPARATOR).collect();
    assert_eq!(fields.len(), 7);
    assert_eq!(fields[0], "什么是垄断协议？");
    assert_eq!(fields[2], "反垄断法.pdf");
    assert_eq!(fields[3], "第十六条");
    assert_eq!(
        fields[4],
        "<span class='tag'>statute</span> <span class='tag'>kw:垄断协议</span>"
    );
    assert_eq!(fields[5], "<span class='badge diff-medium'>中等</span>");
    assert!(fields[6].starts_with("本法所称垄断协议"));

    let did: i64 = conn
        .query_row("SELECT did FROM cards", [], |r| r.get(0))
        .unwrap();
    assert_eq!(did, DECK_ID);

    let decks: String = conn
        .query_row("SELECT decks FROM col", [], |r| r.get(0))
        .unwrap();
    let decks: serde_json::Value = serde_json::from_str(&decks).unwrap();
    assert_eq!(decks[DECK_ID.to_string()]["name"], "反垄断法");
}

#[test]
fn test_mixed_basic_and_cloze() {
    let out = TempDir::new().unwrap();
    let mut cloze = legal_card();
    cloze.card_type = CardType::Cloze;
    cloze.answer = "{{c1::垄断协议}}是指排除、{{c2::限制竞争}}的协议".to_string();

    let path = AnkiExporter::new(out.path())
        .export("deck", &[legal_card(), cloze])
        .unwrap();

    let scratch = TempDir::new().unwrap();
    let (conn, _) = unpack(&path, scratch.path());

    let notes: i64 = conn.query_row("SELECT COUNT(*) FROM notes", [], |r| r.get(0)).unwrap();
    let cards: i64 = conn.query_row("SELECT COUNT(*) FROM cards", [], |r| r.get(0)).unwrap();
    assert_eq!(notes, 2);
    assert_eq!(cards, 3);

    let cloze_fields: String = conn
        .query_row("SELECT flds FROM notes WHERE mid = ?1", [CLOZE_MODEL_ID], |r| r.get(0))
        .unwrap();
    let fields: Vec<&str> = cloze_fields.split(FIELD_SEPARATOR).collect();
    assert_eq!(fields.len(), 6);
    assert!(fields[0].starts_with("{{c1::垄断协议}}"));
}

#[test]
fn test_empty_deck_is_still_a_package() {
    let out = TempDir::new().unwrap();
    let path = AnkiExporter::new(out.path()).export("empty", &[]).unwrap();

    let scratch = TempDir::new().unwrap();
    let (conn, _) = unpack(&path, scratch.path());
    let notes: i64 = conn.query_row("SELECT COUNT(*) FROM notes", [], |r| r.get(0)).unwrap();
    assert_eq!(notes, 0);

    // Only the package is left behind.
    let entries: Vec<_> = std::fs::read_dir(out.path()).unwrap().collect();
    assert_eq!(entries.len(), 1);
}

#[test]
fn test_export_overwrites_existing_package() {
    let out = TempDir::new().unwrap();
    let exporter = AnkiExporter::new(out.path());

    exporter.export("deck", &[legal_card(), legal_card()]).unwrap();
    let path = exporter.export("deck", &[legal_card()]).unwrap();

    let scratch = TempDir::new().unwrap();
    let (conn, _) = unpack(&path, scratch.path());
    let notes: i64 = conn.query_row("SELECT COUNT(*) FROM notes", [], |r| r.get(0)).unwrap();
    assert_eq!(notes, 1);
}
