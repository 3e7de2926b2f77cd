use super::{
    json_pretty, spin_fail, spin_ok, spinner, Context, EXIT_ABORTED, EXIT_SUCCESS,
};
use console::Style;
use dialoguer::Confirm;
use gxmod_store::{ArchiveFormat, ExportOutcome, ExportTarget};
use std::io::{stderr, stdin, IsTerminal};
use std::path::Path;

fn target_for(output: &Path, dir: bool, format: Option<ArchiveFormat>, fallback: ArchiveFormat) -> ExportTarget {
    if dir {
        return ExportTarget::Directory(output.to_path_buf());
    }
    match format {
        Some(format) => ExportTarget::Archive {
            path: output.to_path_buf(),
            format,
        },
        None => ExportTarget::archive(output, fallback),
    }
}

/// Ask whether to export despite unregistered references.
///
/// Without `--yes` a non-interactive run always declines.
fn confirm_missing(missing: &[String], limit: usize, yes: bool) -> Result<bool, String> {
    if yes {
        return Ok(true);
    }
    let shown = missing.len().min(limit);
    eprintln!(
        "{}",
        Style::new()
            .yellow()
            .apply_to(format!("{} referenced file(s) are not registered:", missing.len()))
    );
    for rel in &missing[..shown] {
        eprintln!("  - {rel}");
    }
    if missing.len() > shown {
        eprintln!("  ... and {} more", missing.len() - shown);
    }
    if !(stdin().is_terminal() && stderr().is_terminal()) {
        eprintln!("not a terminal; pass --yes to export anyway");
        return Ok(false);
    }
    Confirm::new()
        .with_prompt("export anyway?")
        .default(false)
        .interact()
        .map_err(|e| format!("prompt failed: {e}"))
}

pub fn run(
    ctx: &Context,
    output: &Path,
    dir: bool,
    format: Option<ArchiveFormat>,
    yes: bool,
) -> Result<u8, String> {
    let session = ctx.load_session()?;
    let target = target_for(output, dir, format, ctx.config.archive_format);

    let limit = ctx.config.confirm_preview_limit;
    let pb = (!ctx.json).then(|| spinner(&format!("exporting to {}", output.display())));
    let mut prompt_error = None;
    let confirm = |missing: &[String]| {
        let answer = match &pb {
            Some(pb) => pb.suspend(|| confirm_missing(missing, limit, yes)),
            None => confirm_missing(missing, limit, yes),
        };
        answer.unwrap_or_else(|e| {
            prompt_error = Some(e);
            false
        })
    };

    let outcome = match session.export(&target, confirm) {
        Ok(outcome) => outcome,
        Err(e) => {
            if let Some(pb) = &pb {
                spin_fail(pb, "export failed");
            }
            return Err(format!("export error: {e}"));
        }
    };
    if let Some(e) = prompt_error {
        if let Some(pb) = &pb {
            pb.finish_and_clear();
        }
        return Err(e);
    }

    match outcome {
        ExportOutcome::Aborted { missing } => {
            if let Some(pb) = &pb {
                pb.finish_and_clear();
            }
            if ctx.json {
                let payload = serde_json::json!({ "status": "aborted", "missing": missing });
                println!("{}", json_pretty(&payload)?);
            } else {
                eprintln!("export aborted; nothing written");
            }
            Ok(EXIT_ABORTED)
        }
        ExportOutcome::Completed(report) => {
            if let Some(pb) = &pb {
                spin_ok(
                    pb,
                    &format!("exported {} file(s) to {}", report.written.len(), output.display()),
                );
            }
            if ctx.json {
                let payload = serde_json::json!({
                    "status": "exported",
                    "target": target.path().display().to_string(),
                    "flavor_hash": report.flavor_hash,
                    "written": report.written,
                    "skipped": report.skipped,
                    "missing": report.missing,
                });
                println!("{}", json_pretty(&payload)?);
            } else {
                println!("flavor: {}", report.flavor_hash);
                for skipped in &report.skipped {
                    eprintln!("skipped {}: {:?}", skipped.rel, skipped.reason);
                }
            }
            Ok(EXIT_SUCCESS)
        }
    }
}
