use super::{json_pretty, Context, EXIT_FAILURE, EXIT_SUCCESS};
use std::path::Path;

pub fn run(ctx: &Context, rel: &str, file: Option<&Path>, remove: bool) -> Result<u8, String> {
    if remove {
        let removed = ctx.edit_session(|session| Ok(session.unregister_file(rel)))?;
        if ctx.json {
            let payload = serde_json::json!({ "rel": rel, "removed": removed });
            println!("{}", json_pretty(&payload)?);
        } else if removed {
            println!("unregistered {rel}");
        } else {
            println!("{rel} was not registered");
        }
        return Ok(if removed { EXIT_SUCCESS } else { EXIT_FAILURE });
    }

    let file = file.ok_or_else(|| "no file given".to_owned())?;
    if !file.is_file() {
        return Err(format!("{} is not a readable file", file.display()));
    }
    ctx.edit_session(|session| session.register_file(rel, file).map_err(|e| e.to_string()))?;
    if ctx.json {
        let payload = serde_json::json!({ "rel": rel.trim(), "source": file.display().to_string() });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!("registered {} as {}", file.display(), rel.trim());
    }
    Ok(EXIT_SUCCESS)
}
