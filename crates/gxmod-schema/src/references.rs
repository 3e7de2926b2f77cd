use crate::assets::AssetIndex;
use crate::payload::Payload;
use serde_json::Value;
use std::collections::BTreeSet;

pub const PATH_SEPARATOR: char = '/';

/// Collect every path-shaped string leaf of an arbitrary JSON document.
///
/// A string counts as a path iff it contains [`PATH_SEPARATOR`]. Object keys
/// are never inspected, only values.
pub fn collect_references(node: &Value) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    walk(node, &mut out);
    out
}

pub fn collect_payload_references(payload: &Payload) -> BTreeSet<String> {
    let mut out = BTreeSet::new();
    for (_, value) in payload.iter() {
        walk(value, &mut out);
    }
    out
}

/// Referenced paths that have no registered asset.
pub fn unregistered_references(payload: &Payload, assets: &(impl AssetIndex + ?Sized)) -> Vec<String> {
    collect_payload_references(payload)
        .into_iter()
        .filter(|rel| !assets.contains_asset(rel))
        .collect()
}

fn walk(node: &Value, out: &mut BTreeSet<String>) {
    match node {
        Value::Object(map) => map.values().for_each(|v| walk(v, out)),
        Value::Array(items) => items.iter().for_each(|v| walk(v, out)),
        Value::String(s) if s.contains(PATH_SEPARATOR) => {
            out.insert(s.clone());
        }
        _ => {}
    }
}
