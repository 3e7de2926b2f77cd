use super::{json_pretty, Context, EXIT_SUCCESS};
use gxmod_core::ColorScheme;
use gxmod_schema::{Hsl, Section};

fn print_entry(ctx: &Context, section: Section, index: usize, what: &str) -> Result<u8, String> {
    let session = ctx.load_session()?;
    if ctx.json {
        let entry = session.payload.entries(section).get(index).cloned();
        println!("{}", json_pretty(&entry)?);
    } else {
        println!("{section}[{index}]: {what}");
    }
    Ok(EXIT_SUCCESS)
}

pub fn theme(
    ctx: &Context,
    index: usize,
    scheme: ColorScheme,
    accent: Hsl,
    secondary: Hsl,
) -> Result<u8, String> {
    ctx.edit_session(|session| {
        session
            .set_theme_colors(index, scheme, accent, secondary)
            .map_err(|e| e.to_string())
    })?;
    print_entry(ctx, Section::Theme, index, &format!("{scheme} colours updated"))
}

pub fn text_color(
    ctx: &Context,
    index: usize,
    scheme: ColorScheme,
    color: Option<&str>,
) -> Result<u8, String> {
    ctx.edit_session(|session| {
        session
            .set_wallpaper_text_color(index, scheme, color)
            .map_err(|e| e.to_string())
    })?;
    let what = match color.map(str::trim).filter(|c| !c.is_empty()) {
        Some(c) => format!("{scheme} text colour set to {c}"),
        None => format!("{scheme} text colour cleared"),
    };
    print_entry(ctx, Section::Wallpaper, index, &what)
}

pub fn matches(ctx: &Context, index: usize, patterns: &str) -> Result<u8, String> {
    ctx.edit_session(|session| {
        session
            .set_page_style_matches(index, patterns)
            .map_err(|e| e.to_string())
    })?;
    print_entry(ctx, Section::PageStyles, index, "match patterns replaced")
}
