/*!
 * Content fingerprints and fingerprinted blob names
 *
 * A fingerprint is the trailing slice of a file's SHA-1 hex digest. It is a
 * cache-busting token embedded in the blob name, not an integrity check.
 */

use sha1::{Digest, Sha1};
use std::io::{self, Read};

/// Number of trailing hex characters kept from the digest
pub const FINGERPRINT_LEN: usize = 10;

/// Hex length of the full SHA-1 digest
const DIGEST_HEX_LEN: usize = 40;

/// Fingerprint of `reader`'s bytes from its current position to EOF
pub fn fingerprint<R: Read>(reader: R) -> io::Result<String> {
    fingerprint_with_len(reader, FINGERPRINT_LEN)
}

/// Like [`fingerprint`], keeping the last `len` hex characters (capped at the digest length)
pub fn fingerprint_with_len<R: Read>(mut reader: R, len: usize) -> io::Result<String> {
    let mut hasher = Sha1::new();
    let mut buffer = [0u8; 64 * 1024];

    loop {
        let n = reader.read(&mut buffer)?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
    }

    let digest = hex::encode(hasher.finalize());
    let start = DIGEST_HEX_LEN - len.min(DIGEST_HEX_LEN);
    Ok(digest[start..].to_string())
}

/// Blob name for `logical_path` with `fragment` appended to its file stem
///
/// `css/site.css` + `0a1b2c3d4e` becomes `css/site-0a1b2c3d4e.css`. Backslashes
/// are treated as separators and a leading `/` is dropped, so root-level files
/// come out as `site-0a1b2c3d4e.css`.
pub fn fingerprinted_name(logical_path: &str, fragment: &str) -> String {
    let normalized = logical_path.replace('\\', "/");
    let path = normalized.trim_start_matches('/');

    let (dir, file_name) = match path.rsplit_once('/') {
        Some((dir, file_name)) => (dir, file_name),
        None => ("", path),
    };

    // A leading dot marks a hidden file, not an extension
    let (stem, ext) = match file_name.rfind('.') {
        Some(idx) if idx > 0 => file_name.split_at(idx),
        _ => (file_name, ""),
    };

    if dir.is_empty() {
        format!("{}-{}{}", stem, fragment, ext)
    } else {
        format!("{}/{}-{}{}", dir, stem, fragment, ext)
    }
}
