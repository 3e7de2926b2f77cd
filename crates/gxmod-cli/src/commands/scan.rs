use super::{json_pretty, print_list, Context, EXIT_SUCCESS};
use console::Style;
use gxmod_core::auto_register;
use std::path::Path;

pub fn run(ctx: &Context, folder: &Path) -> Result<u8, String> {
    let report = ctx.edit_session(|session| {
        auto_register(session, folder).map_err(|e| format!("scan of {} failed: {e}", folder.display()))
    })?;
    if ctx.json {
        println!("{}", json_pretty(&report)?);
        return Ok(EXIT_SUCCESS);
    }
    for (rel, path) in &report.registered {
        println!("{rel} <- {}", path.display());
    }
    println!("registered {} file(s)", report.registered.len());
    print_list("still unregistered:", &report.unmatched, &Style::new().yellow());
    Ok(EXIT_SUCCESS)
}
