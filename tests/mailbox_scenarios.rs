//! Mailbox extraction against the fixture mbox
//!
//! `tests/fixtures/attachments.mbox` holds two messages:
//! - `photo.jpg` ("hello") and `notes.txt` ("some notes")
//! - `Photo Copy.JPG` ("hello"), `photo.jpg` ("world") and an empty `empty.dat`

use filededup::{Admission, Attachment, DedupStore, IdentityKey, MboxSource, Result};
use regex::{Regex, RegexBuilder};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn fixture() -> &'static Path {
    Path::new(concat!(
        env!("CARGO_MANIFEST_DIR"),
        "/tests/fixtures/attachments.mbox"
    ))
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

// ============================================================================
// Attachment walk
// ============================================================================

#[test]
fn test_fixture_attachments_in_order() {
    let attachments: Vec<Attachment> = MboxSource::new(fixture())
        .attachments()
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();

    let names: Vec<&str> = attachments.iter().map(|a| a.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["photo.jpg", "notes.txt", "Photo Copy.JPG", "photo.jpg", "empty.dat"]
    );
    assert_eq!(attachments[0].content, b"hello");
    assert_eq!(attachments[3].content, b"world");
    assert!(attachments[4].content.is_empty());
}

#[test]
fn test_blobs_skip_empty_parts() {
    let mut blobs: Vec<_> = MboxSource::new(fixture())
        .blobs()
        .unwrap()
        .collect::<Result<_>>()
        .unwrap();

    assert_eq!(blobs.len(), 4);
    assert!(blobs.iter_mut().all(|b| b.name() != "empty.dat"));
    assert_eq!(&blobs[1].content()[..], b"some notes");
}

// ============================================================================
// Defiling into a store
// ============================================================================

#[test]
fn test_defile_into_store() {
    let dir = tempdir().unwrap();
    let mut store = DedupStore::open(dir.path()).unwrap();

    let outcomes: Vec<Admission> = MboxSource::new(fixture())
        .blobs()
        .unwrap()
        .map(|blob| store.admit(blob.unwrap()).unwrap())
        .collect();

    let world = format!("{}.jpg", IdentityKey::digest(b"world"));
    assert_eq!(
        outcomes[2],
        Admission::Duplicate {
            on_disk_name: "photo.jpg".into()
        }
    );
    assert_eq!(
        outcomes[3],
        Admission::Stored {
            on_disk_name: world.clone(),
            renamed: true
        }
    );

    let mut expected = vec![world.clone(), "notes.txt".to_string(), "photo.jpg".to_string()];
    expected.sort();
    assert_eq!(file_names(dir.path()), expected);
    assert_eq!(fs::read(dir.path().join(&world)).unwrap(), b"world");

    let report = store.report();
    assert_eq!(report["photo.jpg"].duplicates, vec!["Photo Copy.JPG"]);
    assert_eq!(report[&world].original.as_deref(), Some("photo.jpg"));
}

#[test]
fn test_defile_twice_writes_nothing_new() {
    let dir = tempdir().unwrap();
    for _ in 0..2 {
        let mut store = DedupStore::open(dir.path()).unwrap();
        for blob in MboxSource::new(fixture()).blobs().unwrap() {
            store.admit(blob.unwrap()).unwrap();
        }
    }
    assert_eq!(file_names(dir.path()).len(), 3);
}

// ============================================================================
// Name listing
// ============================================================================

#[test]
fn test_name_counts() {
    let source = MboxSource::new(fixture());

    let all = source.name_counts(&[Regex::new(".*").unwrap()]).unwrap();
    assert_eq!(all.get("photo.jpg"), Some(&2));
    assert_eq!(all.values().sum::<usize>(), 5);

    let jpg = source.name_counts(&[Regex::new(r"\.jpg$").unwrap()]).unwrap();
    assert_eq!(jpg.values().sum::<usize>(), 2);

    let caseless = RegexBuilder::new(r"\.jpg$")
        .case_insensitive(true)
        .build()
        .unwrap();
    let jpg_any_case = source.name_counts(&[caseless]).unwrap();
    assert_eq!(jpg_any_case.values().sum::<usize>(), 3);
    assert_eq!(jpg_any_case.get("Photo Copy.JPG"), Some(&1));
}

#[test]
fn test_name_counts_any_filter_matches() {
    let filters = [
        Regex::new(r"^notes").unwrap(),
        Regex::new(r"\.dat$").unwrap(),
    ];
    let counts = MboxSource::new(fixture()).name_counts(&filters).unwrap();
    let names: Vec<&String> = counts.keys().collect();
    assert_eq!(names, vec!["empty.dat", "notes.txt"]);
}
