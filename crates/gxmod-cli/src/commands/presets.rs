use super::{json_pretty, Context, EXIT_SUCCESS};
use gxmod_schema::{presets_for, Section};
use std::collections::BTreeMap;

pub fn run(ctx: &Context, section: Option<Section>) -> Result<u8, String> {
    let wanted: Vec<Section> = match section {
        Some(s) => vec![s],
        None => Section::ALL.into_iter().collect(),
    };
    let lists: BTreeMap<&str, &[&str]> = wanted
        .into_iter()
        .map(|s| (s.as_str(), presets_for(s)))
        .filter(|(_, names)| !names.is_empty() || section.is_some())
        .collect();

    if ctx.json {
        println!("{}", json_pretty(&lists)?);
    } else {
        for (name, presets) in &lists {
            println!("{name}:");
            if presets.is_empty() {
                println!("  (none)");
            }
            for preset in *presets {
                println!("  {preset}");
            }
        }
    }
    Ok(EXIT_SUCCESS)
}
