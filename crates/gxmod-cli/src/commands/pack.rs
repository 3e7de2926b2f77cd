use super::{json_pretty, Context, EXIT_SUCCESS};
use gxmod_schema::Section;
use std::path::PathBuf;

pub fn run(
    ctx: &Context,
    section: Section,
    name: &str,
    files: &[PathBuf],
    id: Option<&str>,
    slot: Option<&str>,
) -> Result<u8, String> {
    let (index, entry) = ctx.edit_session(|session| {
        let index = session
            .add_pack(section, id, name, files, slot)
            .map_err(|e| e.to_string())?;
        let entry = session.payload.entries(section).get(index).cloned();
        Ok((index, entry.unwrap_or_default()))
    })?;

    if ctx.json {
        let payload = serde_json::json!({
            "section": section.as_str(),
            "index": index,
            "entry": entry,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        let id = entry.get("id").and_then(serde_json::Value::as_str).unwrap_or("?");
        println!("added {section}[{index}] ({id}) with {} file(s)", files.len());
    }
    Ok(EXIT_SUCCESS)
}
