//! CLI subprocess integration tests.
//!
//! These tests invoke the `gxmod` binary as a subprocess and verify exit
//! codes, stdout content, and the files an export leaves behind.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

struct Project {
    dir: tempfile::TempDir,
}

impl Project {
    fn new() -> Self {
        Self {
            dir: tempfile::tempdir().unwrap(),
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn session(&self) -> PathBuf {
        self.path().join("session.json")
    }

    fn write(&self, rel: &str, bytes: &[u8]) -> PathBuf {
        let path = self.path().join(rel);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, bytes).unwrap();
        path
    }

    fn gxmod(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_gxmod"));
        cmd.env("GXMOD_CONFIG", self.path().join("no-config.json"))
            .env_remove("GXMOD_LOG")
            .arg("--session")
            .arg(self.session());
        cmd
    }

    fn run(&self, args: &[&str]) -> Output {
        self.gxmod().args(args).output().unwrap()
    }

    fn run_ok(&self, args: &[&str]) -> String {
        let output = self.run(args);
        assert!(
            output.status.success(),
            "gxmod {args:?} must exit 0. stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        String::from_utf8_lossy(&output.stdout).into_owned()
    }

    fn json(&self, args: &[&str]) -> serde_json::Value {
        let mut all = vec!["--json"];
        all.extend_from_slice(args);
        serde_json::from_str(&self.run_ok(&all)).unwrap()
    }
}

fn arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

#[test]
fn cli_version_exits_zero() {
    let output = Command::new(env!("CARGO_BIN_EXE_gxmod"))
        .arg("--version")
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("gxmod"));
}

#[test]
fn cli_help_lists_commands() {
    let output = Command::new(env!("CARGO_BIN_EXE_gxmod"))
        .arg("--help")
        .output()
        .unwrap();
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    for command in ["new", "import", "validate", "fix", "export"] {
        assert!(stdout.contains(command), "help must list '{command}'");
    }
}

#[test]
fn cli_without_session_suggests_new() {
    let project = Project::new();
    let output = project.run(&["info"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("gxmod new"));
}

#[test]
fn cli_new_refuses_to_overwrite_without_force() {
    let project = Project::new();
    project.run_ok(&["new", "Neon", "1.0.0"]);
    assert_eq!(project.run(&["new", "Other"]).status.code(), Some(1));
    project.run_ok(&["new", "Other", "--force"]);

    let info = project.json(&["info"]);
    assert_eq!(info["metadata"]["name"], "Other");
}

#[test]
fn cli_pack_attach_and_info() {
    let project = Project::new();
    let track = project.write("assets/night.mp3", b"night");
    let click = project.write("assets/click.wav", b"click");
    project.run_ok(&["new", "Neon", "1.0.0", "--author", "rin"]);
    project.run_ok(&["pack", "background-music", "Night", &arg(&track)]);
    project.run_ok(&["pack", "browser_sounds", "Clicks"]);
    project.run_ok(&["attach", "browser_sounds", "0", &arg(&click), "--slot", "CLICK"]);

    let info = project.json(&["info"]);
    assert_eq!(info["sections"]["background_music"], 1);
    assert_eq!(info["sections"]["browser_sounds"], 1);
    assert_eq!(info["files"], 2);

    let preview: serde_json::Value = serde_json::from_str(&project.run_ok(&["preview"])).unwrap();
    assert_eq!(preview["name"], "Neon");
    assert_eq!(
        preview["mod"]["payload"]["browser_sounds"][0]["sounds"]["CLICK"][0],
        "sounds/click.wav"
    );
    assert_eq!(preview["mod"]["payload"]["background_music"][0]["id"], "bgm_0");
}

#[test]
fn cli_validate_reports_issues_with_exit_one() {
    let project = Project::new();
    project.run_ok(&["new", "Neon"]);
    let missing = project.path().join("assets/gone.mp3");
    project.write("assets/gone.mp3", b"x");
    project.run_ok(&["pack", "background_music", "M", &arg(&missing)]);
    project.run_ok(&["register", "music/gone.mp3", "--remove"]);

    let output = project.run(&["--json", "validate"]);
    assert_eq!(output.status.code(), Some(1));
    let report: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(report["ok"], false);
    assert!(report["issues"][0].as_str().unwrap().contains("music/gone.mp3"));
}

#[test]
fn cli_fix_normalizes_legacy_sections() {
    let project = Project::new();
    project.run_ok(&["new", "Neon"]);
    let mut session: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(project.session()).unwrap()).unwrap();
    session["payload"]["browser_sounds"] = serde_json::json!({"CLICK": ["sfx/click.wav"]});
    std::fs::write(project.session(), session.to_string()).unwrap();

    let fixed = project.json(&["fix"]);
    assert_eq!(fixed["fixes"].as_array().unwrap().len(), 1);
    let again = project.json(&["fix"]);
    assert!(again["fixes"].as_array().unwrap().is_empty());

    let preview: serde_json::Value = serde_json::from_str(&project.run_ok(&["preview"])).unwrap();
    assert_eq!(
        preview["mod"]["payload"]["browser_sounds"][0]["id"],
        "browser_sounds_0"
    );
}

#[test]
fn cli_export_directory_writes_manifest_and_assets() {
    let project = Project::new();
    let icon = project.write("assets/icon.png", b"png");
    let track = project.write("assets/night.mp3", b"night");
    project.run_ok(&["new", "Neon", "2.0.0"]);
    project.run_ok(&["register", "icon_512.png", &arg(&icon)]);
    project.run_ok(&["pack", "background_music", "Night", &arg(&track)]);

    let out = project.path().join("out");
    let report = project.json(&["export", &arg(&out), "--dir"]);
    assert_eq!(report["status"], "exported");
    assert_eq!(report["flavor_hash"].as_str().unwrap().len(), 64);

    assert_eq!(std::fs::read(out.join("music/night.mp3")).unwrap(), b"night");
    assert_eq!(std::fs::read(out.join("icon_512.png")).unwrap(), b"png");
    let manifest: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out.join("manifest.json")).unwrap()).unwrap();
    assert_eq!(manifest["version"], "2.0.0");
    assert_eq!(manifest["icons"]["512"], "icon_512.png");
    assert_eq!(manifest["mod"]["flavor"]["hash"], report["flavor_hash"]);
}

#[test]
fn cli_export_zip_archive() {
    let project = Project::new();
    let track = project.write("assets/night.mp3", b"night");
    project.run_ok(&["new", "Neon"]);
    project.run_ok(&["pack", "background_music", "Night", &arg(&track)]);

    let out = project.path().join("neon.zip");
    project.run_ok(&["export", &arg(&out)]);

    let mut archive = zip::ZipArchive::new(std::fs::File::open(&out).unwrap()).unwrap();
    let names: Vec<String> = archive.file_names().map(str::to_owned).collect();
    assert!(names.contains(&"music/night.mp3".to_owned()));
    assert!(names.contains(&"manifest.json".to_owned()));
    assert!(archive.by_name("manifest.json").is_ok());
}

#[test]
fn cli_export_with_missing_files_aborts_when_not_interactive() {
    let project = Project::new();
    let track = project.write("assets/night.mp3", b"night");
    project.run_ok(&["new", "Neon"]);
    project.run_ok(&["pack", "background_music", "Night", &arg(&track)]);
    project.run_ok(&["register", "music/night.mp3", "--remove"]);

    let out = project.path().join("out");
    let output = project.run(&["export", &arg(&out), "--dir"]);
    assert_eq!(output.status.code(), Some(4));
    assert!(String::from_utf8_lossy(&output.stderr).contains("music/night.mp3"));
    assert!(!out.exists());

    let report = project.json(&["export", &arg(&out), "--dir", "--yes"]);
    assert_eq!(report["missing"][0], "music/night.mp3");
    assert!(out.join("manifest.json").exists());
}

#[test]
fn cli_import_round_trips_an_export() {
    let project = Project::new();
    let icon = project.write("assets/icon.png", b"png");
    let track = project.write("assets/night.mp3", b"night");
    project.run_ok(&["new", "Neon", "3.1.0", "--developer", "Rin Studio"]);
    project.run_ok(&["register", "icon_512.png", &arg(&icon)]);
    project.run_ok(&["pack", "background_music", "Night", &arg(&track)]);
    project.run_ok(&["key", "--value", "SECRET"]);
    let out = project.path().join("out");
    project.run_ok(&["export", &arg(&out), "--dir"]);

    let other = Project::new();
    other.run_ok(&["new", "Blank"]);
    let report = other.json(&["import", &arg(&out.join("manifest.json"))]);
    assert_eq!(report["sections"]["background_music"], 1);
    assert_eq!(report["key_loaded"], true);
    assert!(report["unresolved"].as_array().unwrap().is_empty());

    let info = other.json(&["info"]);
    assert_eq!(info["metadata"]["name"], "Neon");
    assert_eq!(info["metadata"]["version"], "3.1.0");
    assert_eq!(info["key"], true);
}

#[test]
fn cli_import_of_malformed_manifest_exits_two() {
    let project = Project::new();
    project.run_ok(&["new", "Neon"]);
    let bad = project.write("bad/manifest.json", b"{ not json");
    let output = project.run(&["import", &arg(&bad)]);
    assert_eq!(output.status.code(), Some(2));

    let info = project.json(&["info"]);
    assert_eq!(info["metadata"]["name"], "Neon");
}

#[test]
fn cli_placeholder_and_scan() {
    let project = Project::new();
    project.write("found/deep/hover.wav", b"hover");
    project.run_ok(&["new", "Neon"]);
    project.run_ok(&["pack", "keyboard_sounds", "Keys"]);
    let placeholder = project.json(&["placeholder", "keyboard_sounds", "0", "TYPING_ENTER"]);
    assert_eq!(placeholder["rel"], "keyboard/empty_TYPING_ENTER.mp3");

    let mut session: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(project.session()).unwrap()).unwrap();
    session["payload"]["keyboard_sounds"][0]["sounds"]["TYPING_SPACE"] =
        serde_json::json!(["keyboard/hover.wav"]);
    std::fs::write(project.session(), session.to_string()).unwrap();

    let scan = project.json(&["scan", &arg(&project.path().join("found"))]);
    assert!(scan["registered"]["keyboard/hover.wav"].is_string());
    assert!(scan["unmatched"].as_array().unwrap().is_empty());
    assert_eq!(project.run(&["validate"]).status.code(), Some(0));
}

#[test]
fn cli_theme_colors_are_clamped() {
    let project = Project::new();
    project.run_ok(&["new", "Neon"]);
    project.run_ok(&["pack", "theme", "Night"]);
    let entry = project.json(&[
        "theme",
        "0",
        "dark",
        "--accent",
        "400,120,50",
        "--secondary",
        "10,20,30",
    ]);
    assert_eq!(entry["dark"]["gx_accent"]["h"], 360);
    assert_eq!(entry["dark"]["gx_accent"]["s"], 100);
    assert_eq!(entry["dark"]["gx_secondary_base"]["l"], 30);
}

#[test]
fn cli_presets_lists_cursor_types() {
    let project = Project::new();
    let presets = project.json(&["presets", "cursors"]);
    assert!(presets["cursors"]
        .as_array()
        .unwrap()
        .iter()
        .any(|p| p == "POINTER"));
}

#[test]
fn cli_completions_bash() {
    let output = Command::new(env!("CARGO_BIN_EXE_gxmod"))
        .args(["completions", "bash"])
        .output()
        .unwrap();
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("gxmod"));
}
