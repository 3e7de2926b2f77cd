use crate::payload::{next_free_id, Payload, Section};
use crate::shape::{decode, is_falsy, SectionShape};
use serde_json::{json, Map, Value};
use std::collections::BTreeSet;

const MUSIC_ID_PREFIX: &str = "bgm";
const MUSIC_PACK_NAME: &str = "Background Music";

/// Rewrite legacy and malformed section shapes into the canonical pack layout.
///
/// Pure and idempotent: `normalize(&normalize(p)) == normalize(p)`. Sections
/// already canonical pass through untouched, empty sections are dropped, and
/// scalars that cannot be repaired are left for the validator to report.
pub fn normalize(payload: &Payload) -> Payload {
    normalize_with_fixes(payload).0
}

/// Like [`normalize`], also returning one human-readable note per rewrite.
pub fn normalize_with_fixes(payload: &Payload) -> (Payload, Vec<String>) {
    let mut out = Payload::new();
    let mut fixes = Vec::new();

    for (section, value) in payload.iter() {
        let fixed = match section {
            Section::BrowserSounds | Section::KeyboardSounds => {
                fix_sound_packs(section, value, &mut fixes)
            }
            Section::BackgroundMusic => fix_background_music(value, &mut fixes),
            Section::Wallpaper | Section::PageStyles => wrap_mapping(section, value, &mut fixes),
            _ => drop_empty(section, value, &mut fixes),
        };
        if let Some(v) = fixed {
            out.set(section, v);
        }
    }

    (out, fixes)
}

fn drop_empty(section: Section, value: &Value, fixes: &mut Vec<String>) -> Option<Value> {
    if is_falsy(value) {
        fixes.push(format!("removed empty {section}"));
        None
    } else {
        Some(value.clone())
    }
}

fn fix_sound_packs(section: Section, value: &Value, fixes: &mut Vec<String>) -> Option<Value> {
    let items = match decode(value) {
        SectionShape::Empty => {
            fixes.push(format!("removed empty {section}"));
            return None;
        }
        SectionShape::LegacyMapping(map) => {
            fixes.push(format!("wrapped {section} mapping into a pack array"));
            return Some(json!([{
                "id": format!("{section}_0"),
                "name": section.as_str(),
                "sounds": Value::Object(map.clone()),
            }]));
        }
        SectionShape::Malformed(_) => return Some(value.clone()),
        SectionShape::Packs(items) | SectionShape::Mixed(items) => items,
        SectionShape::LegacyStringList(_) => value.as_array().map_or(&[][..], Vec::as_slice),
    };

    let mut packs = Vec::with_capacity(items.len());
    for item in items {
        let Value::Object(entry) = item else {
            fixes.push(format!("dropped non-object entry from {section}"));
            continue;
        };
        if entry.contains_key("sounds") {
            packs.push(item.clone());
            continue;
        }
        let index = packs.len();
        let sounds: Map<String, Value> = entry
            .iter()
            .filter(|(_, v)| v.is_array())
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        packs.push(json!({
            "id": entry.get("id").cloned().unwrap_or_else(|| json!(format!("{section}_{index}"))),
            "name": entry.get("name").cloned().unwrap_or_else(|| json!(section.as_str())),
            "sounds": sounds,
        }));
        fixes.push(format!("rebuilt {section}[{index}] with a 'sounds' mapping"));
    }

    if packs.is_empty() {
        fixes.push(format!("removed empty {section}"));
        None
    } else {
        Some(Value::Array(packs))
    }
}

fn fix_background_music(value: &Value, fixes: &mut Vec<String>) -> Option<Value> {
    match decode(value) {
        SectionShape::Empty => {
            fixes.push("removed empty background_music".to_owned());
            None
        }
        SectionShape::LegacyStringList(tracks) => {
            fixes.push("wrapped background_music track list into a pack".to_owned());
            Some(json!([music_pack(&format!("{MUSIC_ID_PREFIX}_0"), &tracks)]))
        }
        SectionShape::Mixed(items) => {
            let kept = |item: &Value| {
                item.is_object() && item.get("tracks").is_some_and(|t| !is_falsy(t))
            };
            let mut used: BTreeSet<String> = items
                .iter()
                .filter(|&item| kept(item))
                .filter_map(|item| item.get("id").and_then(Value::as_str))
                .map(str::to_owned)
                .collect();

            let mut packs = Vec::new();
            for item in items {
                if kept(item) {
                    packs.push(item.clone());
                } else if let Some(track) = item.as_str() {
                    let id = next_free_id(MUSIC_ID_PREFIX, &used);
                    used.insert(id.to_string());
                    packs.push(music_pack(&id, &[track]));
                }
            }

            if packs.is_empty() {
                fixes.push("removed background_music (no valid entries)".to_owned());
                None
            } else {
                fixes.push("normalized mixed background_music entries".to_owned());
                Some(Value::Array(packs))
            }
        }
        SectionShape::Packs(_) | SectionShape::LegacyMapping(_) | SectionShape::Malformed(_) => {
            Some(value.clone())
        }
    }
}

fn music_pack(id: &str, tracks: &[&str]) -> Value {
    json!({
        "id": id,
        "name": MUSIC_PACK_NAME,
        "tracks": tracks,
    })
}

fn wrap_mapping(section: Section, value: &Value, fixes: &mut Vec<String>) -> Option<Value> {
    match decode(value) {
        SectionShape::Empty => {
            fixes.push(format!("removed empty {section}"));
            None
        }
        SectionShape::LegacyMapping(map) => {
            fixes.push(format!("wrapped {section} mapping into an array"));
            Some(Value::Array(vec![Value::Object(map.clone())]))
        }
        _ => Some(value.clone()),
    }
}
