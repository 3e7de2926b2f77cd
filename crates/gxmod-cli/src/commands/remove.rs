use super::{json_pretty, Context, EXIT_SUCCESS};
use gxmod_schema::Section;

pub fn run(ctx: &Context, section: Section, index: usize) -> Result<u8, String> {
    let removed = ctx.edit_session(|session| {
        session
            .remove_entry(section, index)
            .map_err(|e| e.to_string())
    })?;
    if ctx.json {
        println!("{}", json_pretty(&removed)?);
    } else {
        let id = removed.get("id").and_then(serde_json::Value::as_str).unwrap_or("?");
        println!("removed {section}[{index}] ({id})");
    }
    Ok(EXIT_SUCCESS)
}
