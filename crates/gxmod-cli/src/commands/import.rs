use super::{json_pretty, print_list, Context, EXIT_SUCCESS};
use console::Style;
use gxmod_core::import_manifest_file;
use std::path::Path;

pub fn run(ctx: &Context, manifest: &Path) -> Result<u8, String> {
    let report = ctx.edit_session(|session| {
        import_manifest_file(session, manifest).map_err(|e| format!("import error: {e}"))
    })?;

    if ctx.json {
        println!("{}", json_pretty(&report)?);
        return Ok(EXIT_SUCCESS);
    }
    println!("imported {}", manifest.display());
    if !report.metadata_fields.is_empty() {
        println!("metadata: {}", report.metadata_fields.join(", "));
    }
    for (section, count) in &report.sections {
        println!("  {section}: +{count}");
    }
    println!("registered {} file(s)", report.registered.len());
    if report.key_loaded {
        println!("key loaded");
    }
    let warn = Style::new().yellow();
    print_list("unresolved:", &report.unresolved, &warn);
    print_list("skipped sections:", &report.skipped_sections, &warn);
    Ok(EXIT_SUCCESS)
}
