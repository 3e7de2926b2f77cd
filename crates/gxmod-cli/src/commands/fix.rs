use super::{json_pretty, Context, EXIT_SUCCESS};

pub fn run(ctx: &Context) -> Result<u8, String> {
    let fixes = ctx.edit_session(|session| Ok(session.fix()))?;
    if ctx.json {
        println!("{}", json_pretty(&serde_json::json!({ "fixes": fixes }))?);
    } else if fixes.is_empty() {
        println!("nothing to fix");
    } else {
        for fix in &fixes {
            println!("fixed: {fix}");
        }
    }
    Ok(EXIT_SUCCESS)
}
