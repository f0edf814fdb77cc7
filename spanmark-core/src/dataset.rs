//! Dataset files: a JSON array of `[text, {"entities": [[start, end, label], ...]}]`.
//!
//! Files are written pretty-printed with a two-space indent, non-ASCII
//! characters as `\uXXXX` escapes, and no trailing newline. That is the shape
//! the older Python tooling wrote, so loading and saving an untouched dataset
//! reproduces it byte for byte.

use std::fs;
use std::io;
use std::path::Path;

use serde::{Serialize, Serializer};
use serde_json::ser::{Formatter, PrettyFormatter};
use serde_json::Value;
use tracing::warn;

use crate::error::{Error, Result};
use crate::model::AnnotationRecord;

/// One dataset entry.
///
/// Entries that do not parse are kept verbatim so saving never discards
/// earlier work; they are skipped when annotating.
#[derive(Debug, Clone, PartialEq)]
pub enum Entry {
    Record(AnnotationRecord),
    Malformed { raw: Value, reason: String },
}

impl Entry {
    pub fn record(&self) -> Option<&AnnotationRecord> {
        match self {
            Entry::Record(record) => Some(record),
            Entry::Malformed { .. } => None,
        }
    }

    /// The record to annotate, or the malformed-record error for entry `index`
    pub fn record_mut(&mut self, index: usize) -> Result<&mut AnnotationRecord> {
        match self {
            Entry::Record(record) => Ok(record),
            Entry::Malformed { reason, .. } => Err(Error::malformed(index, reason.clone())),
        }
    }
}

impl Serialize for Entry {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Entry::Record(record) => record.serialize(serializer),
            Entry::Malformed { raw, .. } => raw.serialize(serializer),
        }
    }
}

/// An ordered sequence of annotation records
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    entries: Vec<Entry>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records(records: impl IntoIterator<Item = AnnotationRecord>) -> Self {
        Self {
            entries: records.into_iter().map(Entry::Record).collect(),
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let values: Vec<Value> = serde_json::from_str(json)?;
        let entries = values
            .into_iter()
            .enumerate()
            .map(|(index, raw)| match serde_json::from_value::<AnnotationRecord>(raw.clone()) {
                Ok(record) => Entry::Record(record),
                Err(e) => {
                    warn!(index, error = %e, "malformed dataset record kept as-is");
                    Entry::Malformed {
                        raw,
                        reason: e.to_string(),
                    }
                }
            })
            .collect();
        Ok(Self { entries })
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_json(&fs::read_to_string(path)?)
    }

    pub fn to_json(&self) -> Result<String> {
        let mut out = Vec::new();
        let mut ser = serde_json::Serializer::with_formatter(&mut out, AsciiFormatter::new());
        self.entries.serialize(&mut ser)?;
        // only ASCII is ever written
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [Entry] {
        &mut self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &AnnotationRecord> {
        self.entries.iter().filter_map(Entry::record)
    }

    pub fn malformed_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| matches!(e, Entry::Malformed { .. }))
            .count()
    }

    pub fn push(&mut self, record: AnnotationRecord) {
        self.entries.push(Entry::Record(record));
    }
}

/// Two-space pretty printer that escapes every non-ASCII character as
/// lowercase `\uXXXX`, using a surrogate pair outside the BMP.
struct AsciiFormatter {
    pretty: PrettyFormatter<'static>,
}

impl AsciiFormatter {
    fn new() -> Self {
        Self {
            pretty: PrettyFormatter::with_indent(b"  "),
        }
    }
}

impl Formatter for AsciiFormatter {
    fn begin_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_array(writer)
    }

    fn end_array<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array(writer)
    }

    fn begin_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.pretty.begin_array_value(writer, first)
    }

    fn end_array_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_array_value(writer)
    }

    fn begin_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object(writer)
    }

    fn end_object<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object(writer)
    }

    fn begin_object_key<W: ?Sized + io::Write>(&mut self, writer: &mut W, first: bool) -> io::Result<()> {
        self.pretty.begin_object_key(writer, first)
    }

    fn begin_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.begin_object_value(writer)
    }

    fn end_object_value<W: ?Sized + io::Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.pretty.end_object_value(writer)
    }

    fn write_string_fragment<W: ?Sized + io::Write>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()> {
        let mut units = [0u16; 2];
        let mut plain = 0;
        for (idx, ch) in fragment.char_indices() {
            if ch.is_ascii() {
                continue;
            }
            writer.write_all(fragment[plain..idx].as_bytes())?;
            for unit in ch.encode_utf16(&mut units).iter() {
                write!(writer, "\\u{:04x}", unit)?;
            }
            plain = idx + ch.len_utf8();
        }
        writer.write_all(fragment[plain..].as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Span;

    const DATASET: &str = r#"[
  [
    "Hello, world!",
    {
      "entities": [
        [
          0,
          5,
          "KEYWORD"
        ]
      ]
    }
  ],
  [
    "no labels yet",
    {
      "entities": []
    }
  ],
  [
    "caf\u00e9 \ud83d\ude80 launch",
    {
      "entities": [
        [
          0,
          4,
          "KEYWORD"
        ]
      ]
    }
  ]
]"#;

    #[test]
    fn test_load_save_is_stable() {
        let dataset = Dataset::from_json(DATASET).unwrap();
        assert_eq!(dataset.len(), 3);
        assert_eq!(dataset.to_json().unwrap(), DATASET);
    }

    #[test]
    fn test_non_ascii_written_as_escapes() {
        let dataset = Dataset::from_json(DATASET).unwrap();
        let third = dataset.records().nth(2).unwrap();
        assert_eq!(third.text, "café 🚀 launch");
        assert_eq!(third.surface(&third.spans[0]), "café");

        let fresh = Dataset::from_records([AnnotationRecord::new("naïve \"Ω\"\n")]);
        let json = fresh.to_json().unwrap();
        assert!(json.is_ascii());
        assert!(json.contains(r#""na\u00efve \"\u03a9\"\n""#));
    }

    #[test]
    fn test_records_parse() {
        let dataset = Dataset::from_json(DATASET).unwrap();
        let first = dataset.records().next().unwrap();
        assert_eq!(first.text, "Hello, world!");
        assert_eq!(first.spans, vec![Span::new(0, 5, "KEYWORD")]);
    }

    #[test]
    fn test_spans_written_in_start_order() {
        let dataset = Dataset::from_json(
            r#"[["ab cd", {"entities": [[3, 5, "KEYWORD"], [0, 2, "KEYWORD"]]}]]"#,
        )
        .unwrap();
        let json = dataset.to_json().unwrap();
        assert!(json.find("3,").unwrap() > json.find("0,").unwrap());
    }

    #[test]
    fn test_missing_entities_is_surfaced_and_preserved() {
        let json = r#"[["kept text", {"labels": []}], ["fine", {"entities": []}]]"#;
        let dataset = Dataset::from_json(json).unwrap();

        assert_eq!(dataset.malformed_count(), 1);
        assert!(matches!(
            dataset.clone().entries_mut()[0].record_mut(0),
            Err(Error::MalformedRecord { index: 0, .. })
        ));
        assert!(dataset.clone().entries_mut()[1].record_mut(1).is_ok());

        let saved = dataset.to_json().unwrap();
        assert!(saved.contains("\"labels\": []"));
        assert!(saved.contains("kept text"));
    }

    #[test]
    fn test_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dataset.json");

        let mut dataset = Dataset::new();
        dataset.push(AnnotationRecord::with_spans("Rust 1.80", vec![Span::new(0, 4, "SOFTWARE")]));
        dataset.save(&path).unwrap();

        let loaded = Dataset::load(&path).unwrap();
        assert_eq!(loaded, dataset);
    }

    #[test]
    fn test_top_level_must_be_an_array() {
        assert!(matches!(Dataset::from_json(r#"{"entities": []}"#), Err(Error::Json(_))));
    }
}
