use super::{json_pretty, Context, EXIT_SUCCESS};
use gxmod_schema::Section;
use std::path::PathBuf;

pub fn run(
    ctx: &Context,
    section: Section,
    index: usize,
    files: &[PathBuf],
    slot: Option<&str>,
) -> Result<u8, String> {
    let keys = ctx.edit_session(|session| {
        session
            .attach(section, index, files, slot)
            .map_err(|e| e.to_string())
    })?;
    if ctx.json {
        println!("{}", json_pretty(&keys)?);
    } else {
        for key in &keys {
            println!("attached {key} to {section}[{index}]");
        }
    }
    Ok(EXIT_SUCCESS)
}
