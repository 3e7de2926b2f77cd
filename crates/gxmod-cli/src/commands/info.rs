use super::{json_pretty, Context, EXIT_SUCCESS};
use gxmod_schema::Section;
use std::collections::BTreeMap;

pub fn run(ctx: &Context) -> Result<u8, String> {
    let session = ctx.load_session()?;
    let sections: BTreeMap<&str, usize> = Section::ALL
        .into_iter()
        .filter(|s| session.payload.contains(*s))
        .map(|s| (s.as_str(), session.payload.entries(s).len()))
        .collect();
    let flavor = session.flavor_hash();

    if ctx.json {
        let payload = serde_json::json!({
            "metadata": session.metadata,
            "sections": sections,
            "files": session.files.len(),
            "key": session.key.is_some(),
            "flavor_hash": flavor,
        });
        println!("{}", json_pretty(&payload)?);
        return Ok(EXIT_SUCCESS);
    }

    let meta = &session.metadata;
    println!("name:        {}", meta.name);
    println!("version:     {}", meta.version);
    if !meta.author.is_empty() {
        println!("author:      {}", meta.author);
    }
    if !meta.developer.is_empty() {
        println!("developer:   {}", meta.developer);
    }
    println!("files:       {}", session.files.len());
    println!("key:         {}", if session.key.is_some() { "set" } else { "none" });
    println!("flavor:      {flavor}");
    for (name, count) in &sections {
        println!("  {name}: {count}");
    }
    Ok(EXIT_SUCCESS)
}
