//! Content-addressed identity for unsaved buffers.

use sha2::{Digest, Sha256};

/// Deterministic pseudo-path for an in-memory document. The engine keys
/// per-document state on the path, so identical content must always map
/// to the same name and distinct content to distinct names. Nothing is
/// remembered between calls.
pub fn virtual_document_path(text: &str) -> String {
    let hash = Sha256::digest(text.as_bytes());
    format!("<virtual_document_{}.py>", hex_lower(&hash))
}

fn hex_lower(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{:02x}", b));
    }
    out
}
