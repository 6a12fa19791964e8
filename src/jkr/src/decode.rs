//! Save payload decoding.
//!
//! Balatro writes its save as a serialized Lua table, usually deflate
//! compressed. [`decode`] normalizes either framing to the plain text form.

use std::io::Read;

use flate2::read::{DeflateDecoder, ZlibDecoder};

/// Serialized Lua saves start with a `return` statement.
const PLAIN_MARKER: &[u8] = b"return";

/// Decode raw save file bytes into their textual form.
///
/// Already-plain payloads pass through unchanged. Anything else gets a
/// decompression attempt; bytes that are neither come back unchanged, so
/// callers must validate the result by field extraction rather than relying
/// on this step to reject garbage.
pub fn decode(raw: &[u8]) -> Vec<u8> {
    if raw.starts_with(PLAIN_MARKER) {
        return raw.to_vec();
    }
    inflate(raw).unwrap_or_else(|| raw.to_vec())
}

/// Inflate `raw`, accepting either a zlib wrapper or the bare deflate
/// stream the game actually writes.
fn inflate(raw: &[u8]) -> Option<Vec<u8>> {
    let mut decoded = Vec::new();
    if ZlibDecoder::new(raw).read_to_end(&mut decoded).is_ok() {
        return Some(decoded);
    }
    decoded.clear();
    if DeflateDecoder::new(raw).read_to_end(&mut decoded).is_ok() {
        return Some(decoded);
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::{DeflateEncoder, ZlibEncoder};
    use flate2::Compression;
    use std::io::Write;

    const PAYLOAD: &str =
        r#"return {["GAME"]={["pseudorandom"]={["seed"]="ABCD1234"},["ante"]=3,["round"]=5}}"#;

    #[test]
    fn test_plain_payload_passes_through() {
        assert_eq!(decode(PAYLOAD.as_bytes()), PAYLOAD.as_bytes());
    }

    #[test]
    fn test_deflate_payload_is_inflated() {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(PAYLOAD.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(decode(&compressed), PAYLOAD.as_bytes());
    }

    #[test]
    fn test_zlib_payload_is_inflated() {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(PAYLOAD.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        assert_eq!(decode(&compressed), PAYLOAD.as_bytes());
    }

    #[test]
    fn test_unrecognized_bytes_pass_through() {
        let garbage = [0xFFu8; 16];
        assert_eq!(decode(&garbage), garbage);
    }

    #[test]
    fn test_text_without_marker_passes_through() {
        let text = b"not a lua save at all";
        assert_eq!(decode(text), text);
    }
}
