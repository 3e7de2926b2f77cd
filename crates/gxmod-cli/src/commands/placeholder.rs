use super::{json_pretty, Context, EXIT_SUCCESS};
use gxmod_schema::{is_known_preset, Section};

pub fn run(
    ctx: &Context,
    section: Section,
    index: usize,
    event: &str,
    ext: Option<&str>,
) -> Result<u8, String> {
    let ext = ext.unwrap_or(&ctx.config.placeholder_extension);
    if !is_known_preset(section, event.trim()) {
        tracing::warn!("'{}' is not a known {section} event", event.trim());
    }
    let rel = ctx.edit_session(|session| {
        session
            .insert_placeholder(section, index, event, ext)
            .map_err(|e| e.to_string())
    })?;
    if ctx.json {
        println!("{}", json_pretty(&serde_json::json!({ "rel": rel }))?);
    } else {
        println!("{} now plays {rel}", event.trim());
    }
    Ok(EXIT_SUCCESS)
}
