use super::{json_pretty, print_list, Context, EXIT_FAILURE, EXIT_SUCCESS};
use console::Style;

pub fn run(ctx: &Context) -> Result<u8, String> {
    let session = ctx.load_session()?;
    let report = session.validate();
    if ctx.json {
        let payload = serde_json::json!({
            "ok": report.is_ok(),
            "issues": report.issues,
            "notes": report.notes,
        });
        println!("{}", json_pretty(&payload)?);
    } else {
        if report.is_ok() {
            println!("{}", Style::new().green().apply_to("payload OK"));
        }
        print_list("issues:", &report.issues, &Style::new().red().bold());
        print_list("notes:", &report.notes, &Style::new().yellow());
    }
    Ok(if report.is_ok() { EXIT_SUCCESS } else { EXIT_FAILURE })
}
