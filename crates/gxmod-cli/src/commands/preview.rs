use super::{Context, EXIT_SUCCESS};

/// Prints the manifest JSON regardless of `--json`.
pub fn run(ctx: &Context) -> Result<u8, String> {
    let session = ctx.load_session()?;
    let text = session.preview().map_err(|e| e.to_string())?;
    println!("{text}");
    Ok(EXIT_SUCCESS)
}
