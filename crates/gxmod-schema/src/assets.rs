use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Reserved key of the 512px store icon.
pub const ICON_512_KEY: &str = "icon_512.png";
/// Reserved key of the license text.
pub const LICENSE_KEY: &str = "license.txt";
/// Keys with this prefix never contribute to the flavor fingerprint.
pub const ICON_PREFIX: &str = "icon_";
/// Name of the manifest written at the bundle root.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Lookup of registered relative asset keys.
///
/// Lets validation and manifest building consult whichever file inventory the
/// caller holds without depending on how bytes are sourced.
pub trait AssetIndex {
    fn contains_asset(&self, rel: &str) -> bool;
}

impl AssetIndex for BTreeSet<String> {
    fn contains_asset(&self, rel: &str) -> bool {
        self.contains(rel)
    }
}

impl AssetIndex for HashSet<String> {
    fn contains_asset(&self, rel: &str) -> bool {
        self.contains(rel)
    }
}

impl<V> AssetIndex for BTreeMap<String, V> {
    fn contains_asset(&self, rel: &str) -> bool {
        self.contains_key(rel)
    }
}

impl AssetIndex for [&str] {
    fn contains_asset(&self, rel: &str) -> bool {
        self.iter().any(|k| *k == rel)
    }
}
