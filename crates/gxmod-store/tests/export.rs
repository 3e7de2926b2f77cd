//! End-to-end export tests against real directory and archive sinks.

use gxmod_schema::{build_manifest, ManifestDocument, ModMetadata, Payload, Section};
use gxmod_store::{
    export, ArchiveFormat, ExportOutcome, ExportTarget, FileMap, SkipReason, StoreError,
    EMPTY_DIGEST,
};
use serde_json::{json, Value};
use std::fs;
use std::io::Read;

fn wallpaper_doc(files: &FileMap) -> ManifestDocument {
    let mut payload = Payload::new();
    payload.set(
        Section::Wallpaper,
        json!([{"id": "wp_0", "name": "Dusk", "dark": {"image": "wallpaper/dusk.png"}}]),
    );
    build_manifest(&ModMetadata::new("Dusk", "1.0.0"), &payload, files, None)
}

fn completed(outcome: ExportOutcome) -> gxmod_store::ExportReport {
    match outcome {
        ExportOutcome::Completed(report) => report,
        ExportOutcome::Aborted { missing } => panic!("export aborted, missing {missing:?}"),
    }
}

#[test]
fn directory_export_writes_assets_and_manifest() {
    let src = tempfile::tempdir().unwrap();
    let out = tempfile::tempdir().unwrap();
    let image = src.path().join("dusk.png");
    fs::write(&image, b"png-bytes").unwrap();

    let mut files = FileMap::new();
    files.insert_file("wallpaper/dusk.png", &image);
    files.insert_inline("icon_512.png", b"icon".to_vec());

    let target = ExportTarget::Directory(out.path().join("bundle"));
    let report = completed(export(wallpaper_doc(&files), &files, &target, |_| false).unwrap());

    let bundle = out.path().join("bundle");
    assert_eq!(fs::read(bundle.join("wallpaper/dusk.png")).unwrap(), b"png-bytes");
    let manifest: Value =
        serde_json::from_str(&fs::read_to_string(bundle.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest["name"], "Dusk");
    assert_eq!(manifest["icons"]["512"], "icon_512.png");
    assert_eq!(manifest["mod"]["flavor"]["hash"], report.flavor_hash.as_str());
    assert_eq!(manifest["mod"]["flavor"]["parent_hash"], EMPTY_DIGEST);
    assert_eq!(report.written.len(), 2);
}

#[test]
fn flavor_hash_covers_only_written_entries() {
    let out = tempfile::tempdir().unwrap();
    let mut files = FileMap::new();
    files.insert_inline("wallpaper/dusk.png", b"png-bytes".to_vec());
    files.insert_inline("/tmp/outside.png", b"outside".to_vec());
    files.insert_inline("manifest.json", b"{}".to_vec());

    let target = ExportTarget::Directory(out.path().join("bundle"));
    let report = completed(export(wallpaper_doc(&files), &files, &target, |_| true).unwrap());
    assert_eq!(report.written, vec!["wallpaper/dusk.png"]);
    assert_eq!(report.skipped.len(), 2);

    let mut written_only = FileMap::new();
    written_only.insert_inline("wallpaper/dusk.png", b"png-bytes".to_vec());
    assert_eq!(report.flavor_hash, gxmod_store::flavor_fingerprint(&written_only));
}

#[test]
fn declined_export_leaves_no_destination() {
    let out = tempfile::tempdir().unwrap();
    let files = FileMap::new();
    let target = ExportTarget::Directory(out.path().join("bundle"));

    let mut prompts = 0;
    let outcome = export(wallpaper_doc(&files), &files, &target, |missing| {
        prompts += 1;
        assert_eq!(missing, ["wallpaper/dusk.png"]);
        false
    })
    .unwrap();

    assert_eq!(prompts, 1);
    assert!(matches!(outcome, ExportOutcome::Aborted { .. }));
    assert!(!out.path().join("bundle").exists());
}

#[test]
fn accepted_missing_paths_are_reported() {
    let out = tempfile::tempdir().unwrap();
    let files = FileMap::new();
    let target = ExportTarget::Directory(out.path().to_path_buf());
    let report = completed(export(wallpaper_doc(&files), &files, &target, |_| true).unwrap());
    assert_eq!(report.missing, vec!["wallpaper/dusk.png"]);
    assert!(out.path().join("manifest.json").exists());
}

#[test]
fn unreadable_source_is_skipped_not_fatal() {
    let out = tempfile::tempdir().unwrap();
    let mut files = FileMap::new();
    files.insert_file("wallpaper/dusk.png", out.path().join("vanished.png"));
    files.insert_inline("license.txt", b"MIT".to_vec());

    let target = ExportTarget::Directory(out.path().join("bundle"));
    let report = completed(export(wallpaper_doc(&files), &files, &target, |_| true).unwrap());

    assert_eq!(report.written, vec!["license.txt"]);
    assert_eq!(report.skipped.len(), 1);
    assert!(matches!(report.skipped[0].reason, SkipReason::Unreadable(_)));
    assert!(out.path().join("bundle/manifest.json").exists());
}

#[test]
fn zip_export_places_manifest_last() {
    let out = tempfile::tempdir().unwrap();
    let mut files = FileMap::new();
    files.insert_inline("wallpaper/dusk.png", b"png".to_vec());
    files.insert_inline("sounds/click.wav", b"wav".to_vec());

    let path = out.path().join("dusk.zip");
    let target = ExportTarget::archive(&path, ArchiveFormat::Tar);
    assert!(matches!(target, ExportTarget::Archive { format: ArchiveFormat::Zip, .. }));
    completed(export(wallpaper_doc(&files), &files, &target, |_| false).unwrap());

    let mut archive = zip::ZipArchive::new(fs::File::open(&path).unwrap()).unwrap();
    let names: Vec<String> = archive.file_names().map(str::to_owned).collect();
    assert_eq!(archive.len(), 3);
    let last = archive.by_index(2).unwrap().name().to_owned();
    assert_eq!(last, "manifest.json");
    assert!(names.contains(&"sounds/click.wav".to_owned()));

    let mut text = String::new();
    archive
        .by_name("manifest.json")
        .unwrap()
        .read_to_string(&mut text)
        .unwrap();
    assert!(text.contains("\"manifest_version\": 3"));
}

#[test]
fn tar_export_round_trips_bytes() {
    let out = tempfile::tempdir().unwrap();
    let mut files = FileMap::new();
    files.insert_inline("wallpaper/dusk.png", b"png".to_vec());

    let path = out.path().join("dusk.bundle");
    let target = ExportTarget::archive(&path, ArchiveFormat::Tar);
    completed(export(wallpaper_doc(&files), &files, &target, |_| false).unwrap());

    let mut archive = tar::Archive::new(fs::File::open(&path).unwrap());
    let mut names = Vec::new();
    for entry in archive.entries().unwrap() {
        let entry = entry.unwrap();
        names.push(entry.path().unwrap().to_string_lossy().into_owned());
    }
    assert_eq!(names, vec!["wallpaper/dusk.png", "manifest.json"]);
}

#[test]
fn unwritable_sink_is_fatal() {
    let out = tempfile::tempdir().unwrap();
    let blocker = out.path().join("occupied");
    fs::write(&blocker, b"file").unwrap();
    let files = FileMap::new();
    let doc = build_manifest(&ModMetadata::default(), &Payload::new(), &files, None);

    let target = ExportTarget::Directory(blocker.join("bundle"));
    let err = export(doc, &files, &target, |_| true).unwrap_err();
    assert!(matches!(err, StoreError::Sink { .. }));
}
