use crate::files::FileMap;
use crate::is_bundle_key;
use gxmod_schema::{FlavorHash, ICON_PREFIX};
use tracing::warn;

/// blake3 digest of the empty byte sequence.
pub const EMPTY_DIGEST: &str = "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262";

/// Best-effort change fingerprint over every registered file.
///
/// Bytes are fed in key order into a single blake3 hasher. A source that
/// cannot be read is skipped, so the digest only reflects what was readable.
pub fn fingerprint(files: &FileMap) -> FlavorHash {
    fingerprint_filtered(files, |_| true)
}

/// Fingerprint used for the flavor hash.
///
/// Covers only keys an export writes, minus those starting with `icon_`.
pub fn flavor_fingerprint(files: &FileMap) -> FlavorHash {
    fingerprint_filtered(files, |rel| is_bundle_key(rel) && !rel.starts_with(ICON_PREFIX))
}

fn fingerprint_filtered(files: &FileMap, include: impl Fn(&str) -> bool) -> FlavorHash {
    let mut hasher = blake3::Hasher::new();
    for (rel, source) in files {
        if !include(rel) {
            continue;
        }
        match source.read() {
            Ok(bytes) => {
                hasher.update(&bytes);
            }
            Err(e) => warn!("fingerprint skips {rel}: {e}"),
        }
    }
    FlavorHash::new(hasher.finalize().to_hex().to_string())
}
