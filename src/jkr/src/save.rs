//! Save file records.
//!
//! A [`SaveRecord`] is the parsed form of one save payload: the run seed and
//! the ante/round counters pulled out of the serialized Lua table, plus
//! where the bytes came from.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::decode::decode;

static SEED_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\["seed"\]="([0-9a-zA-Z]+)""#).expect("seed pattern"));
static ANTE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\["ante"\]=(\d+)"#).expect("ante pattern"));
static ROUND_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"\["round"\]=(\d+)"#).expect("round pattern"));

/// One parsed save payload - the live file or a backup copy.
///
/// Two records compare equal when their decoded payloads are byte-identical;
/// that is how the backup matching the live save is found. `path` is unique
/// per backup (timestamped filename) and serves as the identity key for
/// listings.
#[derive(Debug, Clone, Serialize)]
pub struct SaveRecord {
    /// Where the payload was read from. Rewritten exactly once, when a live
    /// save is copied into the backup store.
    pub path: PathBuf,

    /// Decoded textual payload, retained for equality comparisons.
    #[serde(skip)]
    pub source: String,

    /// Run seed, e.g. `ABCD1234`.
    pub seed: String,

    /// Ante counter, as it appears in the payload.
    pub ante: String,

    /// Round counter, as it appears in the payload.
    pub round: String,

    /// Capture time in epoch seconds, decoded from a backup filename's
    /// trailing `-<timestamp>` segment. `None` for the live file.
    pub captured_at: Option<f64>,
}

impl PartialEq for SaveRecord {
    fn eq(&self, other: &Self) -> bool {
        self.source == other.source
    }
}

impl Eq for SaveRecord {}

impl SaveRecord {
    /// Parse the file at `path` into a record.
    ///
    /// Returns `None` when the bytes cannot be read or any of the three
    /// required fields is missing - which is what distinguishes a real save
    /// from an unrelated file sharing the watched directory.
    pub fn parse(path: &Path) -> Option<SaveRecord> {
        let raw = fs::read(path).ok()?;
        let source = String::from_utf8(decode(&raw)).ok()?;

        let seed = first_capture(&SEED_RE, &source)?;
        let ante = first_capture(&ANTE_RE, &source)?;
        let round = first_capture(&ROUND_RE, &source)?;

        Some(SaveRecord {
            captured_at: timestamp_suffix(path),
            path: path.to_path_buf(),
            source,
            seed,
            ante,
            round,
        })
    }
}

fn first_capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text).map(|captures| captures[1].to_string())
}

/// Decode the trailing `-<epoch-seconds>` segment of a backup filename.
fn timestamp_suffix(path: &Path) -> Option<f64> {
    let name = path.file_name()?.to_str()?;
    name.rsplit('-').next()?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::write::DeflateEncoder;
    use flate2::Compression;
    use std::io::Write;

    const PAYLOAD: &str =
        r#"return {["GAME"]={["pseudorandom"]={["seed"]="ABCD1234"},["ante"]=3,["round"]=5}}"#;

    #[test]
    fn test_parse_extracts_all_three_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.jkr");
        fs::write(&path, PAYLOAD).unwrap();

        let record = SaveRecord::parse(&path).unwrap();
        assert_eq!(record.seed, "ABCD1234");
        assert_eq!(record.ante, "3");
        assert_eq!(record.round, "5");
        assert_eq!(record.source, PAYLOAD);
        assert_eq!(record.captured_at, None);
        assert_eq!(record.path, path);
    }

    #[test]
    fn test_parse_compressed_payload() {
        let mut encoder = DeflateEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(PAYLOAD.as_bytes()).unwrap();
        let compressed = encoder.finish().unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("save.jkr");
        fs::write(&path, compressed).unwrap();

        let record = SaveRecord::parse(&path).unwrap();
        assert_eq!(record.seed, "ABCD1234");
        assert_eq!(record.source, PAYLOAD);
    }

    #[test]
    fn test_parse_rejects_payload_missing_a_field() {
        let dir = tempfile::tempdir().unwrap();

        for payload in [
            r#"return {["ante"]=3,["round"]=5}"#,
            r#"return {["seed"]="ABCD1234",["round"]=5}"#,
            r#"return {["seed"]="ABCD1234",["ante"]=3}"#,
            "return {}",
            "",
        ] {
            let path = dir.path().join("save.jkr");
            fs::write(&path, payload).unwrap();
            assert!(SaveRecord::parse(&path).is_none(), "accepted {payload:?}");
        }
    }

    #[test]
    fn test_parse_rejects_unreadable_path() {
        assert!(SaveRecord::parse(Path::new("/nonexistent/save.jkr")).is_none());
    }

    #[test]
    fn test_timestamp_from_backup_filename() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ABCD1234-3-5-1700000000.25");
        fs::write(&path, PAYLOAD).unwrap();

        let record = SaveRecord::parse(&path).unwrap();
        assert_eq!(record.captured_at, Some(1700000000.25));
    }

    #[test]
    fn test_no_timestamp_without_numeric_suffix() {
        let dir = tempfile::tempdir().unwrap();
        for name in ["save.jkr", "notes-final"] {
            let path = dir.path().join(name);
            fs::write(&path, PAYLOAD).unwrap();
            assert_eq!(SaveRecord::parse(&path).unwrap().captured_at, None);
        }
    }

    #[test]
    fn test_equality_is_payload_equality() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("ABCD1234-3-5-100.5");
        let b = dir.path().join("ABCD1234-3-5-200.5");
        fs::write(&a, PAYLOAD).unwrap();
        fs::write(&b, PAYLOAD).unwrap();

        let first = SaveRecord::parse(&a).unwrap();
        let second = SaveRecord::parse(&b).unwrap();
        assert_eq!(first, second);

        let other = dir.path().join("ZZ99-1-1-300.5");
        fs::write(&other, PAYLOAD.replace("ABCD1234", "ZZ99")).unwrap();
        assert_ne!(first, SaveRecord::parse(&other).unwrap());
    }
}
