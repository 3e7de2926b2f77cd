pub mod attach;
pub mod completions;
pub mod export;
pub mod fix;
pub mod import;
pub mod info;
pub mod key;
pub mod man_pages;
pub mod new;
pub mod pack;
pub mod placeholder;
pub mod presets;
pub mod preview;
pub mod register;
pub mod remove;
pub mod scan;
pub mod style;
pub mod validate;

use gxmod_core::{BuilderConfig, ColorScheme, Session};
use gxmod_schema::{Hsl, Section};
use indicatif::{ProgressBar, ProgressStyle};
use std::path::PathBuf;
use std::time::Duration;

pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_FAILURE: u8 = 1;
pub const EXIT_IMPORT_ERROR: u8 = 2;
pub const EXIT_EXPORT_ERROR: u8 = 3;
pub const EXIT_ABORTED: u8 = 4;

/// Resolved per-invocation settings shared by every command.
pub struct Context {
    pub session_path: PathBuf,
    pub config: BuilderConfig,
    pub json: bool,
}

impl Context {
    pub fn load_session(&self) -> Result<Session, String> {
        Session::load(&self.session_path).map_err(|e| e.to_string())
    }

    pub fn save_session(&self, session: &Session) -> Result<(), String> {
        session
            .save(&self.session_path)
            .map_err(|e| format!("failed to save session: {e}"))
    }

    /// Load, apply `edit`, and save only if the edit succeeded.
    pub fn edit_session<T>(
        &self,
        edit: impl FnOnce(&mut Session) -> Result<T, String>,
    ) -> Result<T, String> {
        let mut session = self.load_session()?;
        let out = edit(&mut session)?;
        self.save_session(&session)?;
        Ok(out)
    }
}

pub fn json_pretty(value: &impl serde::Serialize) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("JSON serialization failed: {e}"))
}

pub fn spinner(msg: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .expect("valid template")
            .tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]),
    );
    pb.set_message(msg.to_owned());
    pb.enable_steady_tick(Duration::from_millis(80));
    pb
}

pub fn spin_ok(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✓ {msg}"));
}

pub fn spin_fail(pb: &ProgressBar, msg: &str) {
    pb.set_style(ProgressStyle::with_template("{msg}").expect("valid template"));
    pb.finish_with_message(format!("✗ {msg}"));
}

pub fn parse_section(s: &str) -> Result<Section, String> {
    s.parse::<Section>().map_err(|e| e.to_string())
}

pub fn parse_scheme(s: &str) -> Result<ColorScheme, String> {
    s.parse::<ColorScheme>().map_err(|e| e.to_string())
}

/// Parse `h,s,l`; out-of-range channels are clamped.
pub fn parse_hsl(s: &str) -> Result<Hsl, String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    let [h, sat, light] = parts.as_slice() else {
        return Err(format!("expected h,s,l but got '{s}'"));
    };
    let channel = |v: &str| {
        v.parse::<u16>()
            .map_err(|e| format!("invalid colour channel '{v}': {e}"))
    };
    let (h, sat, light) = (channel(h)?, channel(sat)?, channel(light)?);
    Ok(Hsl::clamped(
        h,
        u8::try_from(sat.min(100)).unwrap_or(100),
        u8::try_from(light.min(100)).unwrap_or(100),
    ))
}

/// Print one line per item under a styled heading; nothing when empty.
pub fn print_list(heading: &str, items: &[String], style: &console::Style) {
    if items.is_empty() {
        return;
    }
    println!("{}", style.apply_to(heading));
    for item in items {
        println!("  - {item}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_pretty_serializes_string() {
        let val = serde_json::json!({"key": "value"});
        let result = json_pretty(&val).unwrap();
        assert!(result.contains("\"key\""));
        assert!(result.contains("\"value\""));
    }

    #[test]
    fn exit_codes_are_distinct() {
        let codes = [
            EXIT_SUCCESS,
            EXIT_FAILURE,
            EXIT_IMPORT_ERROR,
            EXIT_EXPORT_ERROR,
            EXIT_ABORTED,
        ];
        for (i, a) in codes.iter().enumerate() {
            assert!(codes[i + 1..].iter().all(|b| a != b));
        }
    }

    #[test]
    fn section_names_accept_dashes() {
        assert_eq!(parse_section("background-music").unwrap(), Section::BackgroundMusic);
        assert!(parse_section("soundtrack").is_err());
    }

    #[test]
    fn hsl_is_parsed_and_clamped() {
        assert_eq!(
            parse_hsl("200, 50, 40").unwrap(),
            Hsl { h: 200, s: 50, l: 40 }
        );
        assert_eq!(
            parse_hsl("999,300,101").unwrap(),
            Hsl { h: 360, s: 100, l: 100 }
        );
        assert!(parse_hsl("1,2").is_err());
        assert!(parse_hsl("a,b,c").is_err());
    }

    #[test]
    fn edit_session_does_not_save_on_error() {
        let dir = tempfile::tempdir().unwrap();
        let ctx = Context {
            session_path: dir.path().join("s.json"),
            config: BuilderConfig::default(),
            json: false,
        };
        ctx.save_session(&Session::default()).unwrap();
        let before = std::fs::read_to_string(&ctx.session_path).unwrap();

        let result: Result<(), String> = ctx.edit_session(|s| {
            s.metadata.name = "changed".to_owned();
            Err("nope".to_owned())
        });
        assert!(result.is_err());
        assert_eq!(std::fs::read_to_string(&ctx.session_path).unwrap(), before);
    }

    #[test]
    fn spinner_creates_progress_bar() {
        let pb = spinner("testing...");
        spin_ok(&pb, "done");
    }

    #[test]
    fn spinner_fail_creates_progress_bar() {
        let pb = spinner("testing...");
        spin_fail(&pb, "failed");
    }
}
