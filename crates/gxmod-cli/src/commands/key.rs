use super::{json_pretty, Context, EXIT_FAILURE, EXIT_SUCCESS};
use std::path::Path;

pub fn run(
    ctx: &Context,
    file: Option<&Path>,
    value: Option<&str>,
    clear: bool,
) -> Result<u8, String> {
    let is_set = ctx.edit_session(|session| {
        if clear {
            session.set_key(None);
        } else if let Some(file) = file {
            let loaded = session.load_key(file).map_err(|e| e.to_string())?;
            if !loaded {
                tracing::warn!("{} is blank; key unchanged", file.display());
            }
        } else if let Some(value) = value {
            session.set_key(Some(value));
        } else {
            return Err("give a key file, --value or --clear".to_owned());
        }
        Ok(session.key.is_some())
    })?;

    if ctx.json {
        println!("{}", json_pretty(&serde_json::json!({ "key_set": is_set }))?);
    } else if is_set {
        println!("key set");
    } else {
        println!("no key set");
    }
    Ok(if is_set || clear { EXIT_SUCCESS } else { EXIT_FAILURE })
}
