use super::{json_pretty, Context, EXIT_SUCCESS};
use gxmod_core::{CoreError, Session};
use gxmod_schema::ModMetadata;

pub struct NewArgs {
    pub name: String,
    pub version: String,
    pub author: Option<String>,
    pub description: Option<String>,
    pub developer: Option<String>,
    pub update_url: Option<String>,
}

impl NewArgs {
    fn into_metadata(self) -> ModMetadata {
        let mut meta = ModMetadata::new(self.name.trim(), self.version.trim());
        meta.author = self.author.unwrap_or_default();
        meta.description = self.description.unwrap_or_default();
        meta.developer = self.developer.unwrap_or_default();
        meta.update_url = self.update_url.unwrap_or_default();
        meta
    }
}

pub fn run(ctx: &Context, args: NewArgs, force: bool) -> Result<u8, String> {
    if ctx.session_path.exists() && !force {
        return Err(format!(
            "{} (pass --force to replace it)",
            CoreError::SessionExists(ctx.session_path.clone())
        ));
    }
    let session = Session::new(args.into_metadata());
    ctx.save_session(&session)?;

    if ctx.json {
        let payload = serde_json::json!({
            "status": "created",
            "session": ctx.session_path.display().to_string(),
            "metadata": session.metadata,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        println!(
            "created session '{}' {} at {}",
            session.metadata.name,
            session.metadata.version,
            ctx.session_path.display()
        );
    }
    Ok(EXIT_SUCCESS)
}
