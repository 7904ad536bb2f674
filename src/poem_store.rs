//! Per-configuration poem store.
//!
//! Each configuration's backing file holds one poem per line:
//!
//! ```text
//! id,date,title,filepath
//! 3f2c…,2024.01.05,morning-light,/home/poet/poems/2024.01.05_1_morning-light.txt
//! ```
//!
//! Lines are split into at most four fields; the fourth absorbs every
//! remaining comma, so filepaths with commas survive verbatim. Titles may not
//! contain commas and are rejected at ingestion if they do.
//!
//! Like the registry, listing skips malformed lines while a removal refuses to
//! rewrite a file that contains one.

use crate::error::{EntityKind, Error, Result, ValidationError};
use crate::flatfile;
use crate::naming::{self, basename};
use crate::types::{ConfigurationRecord, MatchedBy, PoemRecord, RemovedPoem};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

const FIELD_COUNT: usize = 4;

/// Flat-file store of the poems registered under one configuration.
#[derive(Debug, Clone)]
pub struct PoemStore {
    path: PathBuf,
}

impl PoemStore {
    pub fn open(config: &ConfigurationRecord) -> Self {
        Self::at(config.backing_file.clone())
    }

    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All poems in file order. Malformed lines are skipped.
    pub fn list(&self) -> Result<Vec<PoemRecord>> {
        let lines = flatfile::read_lines(&self.path)?;
        Ok(lines.iter().filter_map(|l| l.text().and_then(parse_line)).collect())
    }

    /// Append a poem. Fails with [`Error::Duplicate`] if a poem with the same
    /// filepath is already stored.
    pub fn add(&self, record: PoemRecord) -> Result<PoemRecord> {
        validate_fields(&record)?;
        if self.list()?.iter().any(|r| r.filepath == record.filepath) {
            return Err(Error::duplicate(EntityKind::Poem, &record.filepath));
        }
        flatfile::append_line(&self.path, &format_line(&record))?;
        Ok(record)
    }

    /// Remove the first poem, in file order, that `identifier` matches.
    ///
    /// Each record is tested against its id, then title, then filepath, then
    /// the filepath's final component. Records are visited in file order, so
    /// an earlier record matching on its title wins over a later record
    /// matching on its id.
    ///
    /// An identifier naming an existing file also matches the canonical
    /// filepath stored for it, however it is spelled.
    pub fn remove(&self, identifier: &str) -> Result<RemovedPoem> {
        let lines = flatfile::read_lines(&self.path)?;
        let canonical = canonical_filepath(Path::new(identifier));

        let mut kept = Vec::with_capacity(lines.len());
        let mut removed = None;
        for line in &lines {
            let Some((text, record)) = line.text().and_then(|t| parse_line(t).map(|r| (t, r)))
            else {
                return Err(line.corrupt(&self.path));
            };
            if removed.is_none()
                && let Some(matched_by) = match_field(&record, identifier, canonical.as_deref())
            {
                removed = Some(RemovedPoem { record, matched_by });
                continue;
            }
            kept.push(text.to_string());
        }

        let removed = removed.ok_or_else(|| Error::not_found(EntityKind::Poem, identifier))?;
        flatfile::rewrite(&self.path, &kept)?;
        Ok(removed)
    }
}

/// Build a new record for a source file.
///
/// The file must exist and its name must match the poem filename grammar. The
/// stored filepath is the canonical absolute path, so one file has one
/// filepath however it was spelled on the way in. The title defaults to the
/// one in the filename. A fresh id is assigned here and never recomputed.
pub fn ingest(source: &Path, title: Option<&str>) -> Result<PoemRecord> {
    if !source.is_file() {
        return Err(Error::not_found(
            EntityKind::SourceFile,
            source.display().to_string(),
        ));
    }
    let canonical = fs::canonicalize(source)?;
    let filepath = canonical.to_str().ok_or_else(|| ValidationError::Field {
        field: "filepath",
        value: canonical.display().to_string(),
        reason: "must be valid UTF-8",
    })?;
    let parsed = naming::parse_poem_filename(basename(filepath))?;

    let record = PoemRecord {
        id: Uuid::new_v4().to_string(),
        date: parsed.date,
        title: title.map(str::to_string).unwrap_or(parsed.title),
        filepath: filepath.to_string(),
    };
    validate_fields(&record)?;
    Ok(record)
}

/// Canonical UTF-8 form of `path`, if it names an existing file.
fn canonical_filepath(path: &Path) -> Option<String> {
    let canonical = fs::canonicalize(path).ok()?;
    if !canonical.is_file() {
        return None;
    }
    canonical.to_str().map(str::to_string)
}

fn match_field(record: &PoemRecord, identifier: &str, canonical: Option<&str>) -> Option<MatchedBy> {
    if record.id == identifier {
        Some(MatchedBy::Id)
    } else if record.title == identifier {
        Some(MatchedBy::Title)
    } else if record.filepath == identifier || Some(record.filepath.as_str()) == canonical {
        Some(MatchedBy::Filepath)
    } else if basename(&record.filepath) == identifier {
        Some(MatchedBy::Basename)
    } else {
        None
    }
}

/// Reject values that would not read back as the same record.
fn validate_fields(record: &PoemRecord) -> std::result::Result<(), ValidationError> {
    fn invalid(field: &'static str, value: &str, reason: &'static str) -> ValidationError {
        ValidationError::Field {
            field,
            value: value.to_string(),
            reason,
        }
    }
    fn has_break(s: &str) -> bool {
        s.contains(['\n', '\r'])
    }

    let single_fields = [
        ("id", record.id.as_str()),
        ("date", record.date.as_str()),
        ("title", record.title.as_str()),
    ];
    for (field, value) in single_fields {
        if value.contains(',') || has_break(value) {
            return Err(invalid(field, value, "must not contain commas or line breaks"));
        }
    }
    if record.id.is_empty() {
        return Err(invalid("id", &record.id, "must not be empty"));
    }
    if record.filepath.trim().is_empty() || has_break(&record.filepath) {
        return Err(invalid(
            "filepath",
            &record.filepath,
            "must be non-empty and on one line",
        ));
    }
    Ok(())
}

fn parse_line(text: &str) -> Option<PoemRecord> {
    let fields: Vec<&str> = text.splitn(FIELD_COUNT, ',').collect();
    if fields.len() != FIELD_COUNT {
        return None;
    }
    Some(PoemRecord {
        id: fields[0].to_string(),
        date: fields[1].to_string(),
        title: fields[2].to_string(),
        filepath: fields[3].to_string(),
    })
}

fn format_line(record: &PoemRecord) -> String {
    format!(
        "{},{},{},{}",
        record.id, record.date, record.title, record.filepath
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::*;
    use std::fs;
    use tempfile::TempDir;

    fn store_in(tmp: &TempDir) -> PoemStore {
        PoemStore::at(tmp.path().join("poems.cfg"))
    }

    fn record(id: &str, title: &str, filepath: &str) -> PoemRecord {
        PoemRecord {
            id: id.into(),
            date: "2024.01.05".into(),
            title: title.into(),
            filepath: filepath.into(),
        }
    }

    // =========================================================================
    // Line format
    // =========================================================================

    #[test]
    fn filepath_keeps_embedded_commas() {
        let r = parse_line("id1,2024.01.05,title,dir,with,commas/a.txt").unwrap();
        assert_eq!(r.title, "title");
        assert_eq!(r.filepath, "dir,with,commas/a.txt");
    }

    #[test]
    fn short_lines_do_not_parse() {
        assert_eq!(parse_line("id1,2024.01.05,title"), None);
        assert_eq!(parse_line("garbage"), None);
    }

    #[test]
    fn list_skips_malformed_line() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        fs::write(
            store.path(),
            "a,2024.01.05,one,p/one.txt\nthis line is broken\nb,2024.01.06,two,p/two.txt\n",
        )
        .unwrap();
        let records = store.list().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "a");
        assert_eq!(records[1].id, "b");
    }

    #[test]
    fn missing_store_file_lists_empty() {
        let tmp = TempDir::new().unwrap();
        assert!(store_in(&tmp).list().unwrap().is_empty());
    }

    // =========================================================================
    // Add
    // =========================================================================

    #[test]
    fn add_appends_in_order() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.add(record("a", "one", "p/one.txt")).unwrap();
        store.add(record("b", "two", "p/two.txt")).unwrap();
        let ids: Vec<String> = store.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["a", "b"]);
    }

    #[test]
    fn add_duplicate_filepath_rejected_without_mutation() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.add(record("a", "one", "p/one.txt")).unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let err = store.add(record("b", "other", "p/one.txt")).unwrap_err();
        assert!(err.is_duplicate());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
        assert_eq!(store.list().unwrap().len(), 1);
    }

    #[test]
    fn add_same_basename_in_other_directory_is_allowed() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.add(record("a", "one", "x/one.txt")).unwrap();
        store.add(record("b", "one", "y/one.txt")).unwrap();
        assert_eq!(store.list().unwrap().len(), 2);
    }

    #[test]
    fn add_rejects_comma_in_title() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let err = store.add(record("a", "one, two", "p/a.txt")).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::Field { field: "title", .. })
        ));
        assert!(!store.path().exists());
    }

    #[test]
    fn add_rejects_line_break_in_filepath() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let err = store.add(record("a", "one", "p/a\n.txt")).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::Field { field: "filepath", .. })
        ));
    }

    // =========================================================================
    // Ingest
    // =========================================================================

    #[test]
    fn ingest_parses_filename_and_assigns_id() {
        let tmp = TempDir::new().unwrap();
        let source = write_poem(tmp.path(), "2024.01.05_1_morning-light.txt", "dawn");
        let r = ingest(&source, None).unwrap();
        assert_eq!(r.date, "2024.01.05");
        assert_eq!(r.title, "morning-light");
        assert_eq!(r.filepath, fs::canonicalize(&source).unwrap().to_str().unwrap());
        assert!(Uuid::parse_str(&r.id).is_ok());
    }

    #[test]
    fn ingest_assigns_distinct_ids() {
        let tmp = TempDir::new().unwrap();
        let source = write_poem(tmp.path(), "2024.01.05_1_a.txt", "");
        let first = ingest(&source, None).unwrap();
        let second = ingest(&source, None).unwrap();
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn ingest_uses_title_override() {
        let tmp = TempDir::new().unwrap();
        let source = write_poem(tmp.path(), "2024.01.05_1_a.txt", "");
        assert_eq!(ingest(&source, Some("First Snow")).unwrap().title, "First Snow");
    }

    #[test]
    fn ingest_missing_source_is_not_found() {
        let tmp = TempDir::new().unwrap();
        let err = ingest(&tmp.path().join("2024.01.05_1_a.txt"), None).unwrap_err();
        assert!(matches!(
            err,
            Error::NotFound {
                kind: EntityKind::SourceFile,
                ..
            }
        ));
    }

    #[test]
    fn ingest_rejects_bad_filename() {
        let tmp = TempDir::new().unwrap();
        let source = write_poem(tmp.path(), "morning-light.txt", "");
        let err = ingest(&source, None).unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::Filename(name)) if name == "morning-light.txt"
        ));
    }

    #[test]
    fn ingest_rejects_comma_in_parsed_title() {
        let tmp = TempDir::new().unwrap();
        let source = write_poem(tmp.path(), "2024.01.05_1_one,two.txt", "");
        assert!(matches!(
            ingest(&source, None).unwrap_err(),
            Error::Validation(ValidationError::Field { field: "title", .. })
        ));
    }

    #[test]
    fn same_file_under_two_spellings_is_duplicate() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let poems = tmp.path().join("poems");
        write_poem(&poems, "2024.01.05_1_a.txt", "a");

        store.add(ingest(&poems.join("2024.01.05_1_a.txt"), None).unwrap()).unwrap();
        let respelled = poems.join(".").join("2024.01.05_1_a.txt");
        let err = store.add(ingest(&respelled, None).unwrap()).unwrap_err();

        assert!(err.is_duplicate());
        assert_eq!(store.list().unwrap().len(), 1);
    }

    // =========================================================================
    // Remove
    // =========================================================================

    fn seeded(tmp: &TempDir) -> PoemStore {
        let store = store_in(tmp);
        store.add(record("id-1", "first", "p/2024.01.01_1_first.txt")).unwrap();
        store.add(record("id-2", "second", "p/2024.01.02_1_second.txt")).unwrap();
        store.add(record("id-3", "third", "p/2024.01.03_1_third.txt")).unwrap();
        store
    }

    fn remaining_ids(store: &PoemStore) -> Vec<String> {
        store.list().unwrap().into_iter().map(|r| r.id).collect()
    }

    #[test]
    fn remove_by_id_title_filepath_and_basename() {
        let cases = [
            ("id-2", MatchedBy::Id),
            ("second", MatchedBy::Title),
            ("p/2024.01.02_1_second.txt", MatchedBy::Filepath),
            ("2024.01.02_1_second.txt", MatchedBy::Basename),
        ];
        for (identifier, expected) in cases {
            let tmp = TempDir::new().unwrap();
            let store = seeded(&tmp);
            let removed = store.remove(identifier).unwrap();
            assert_eq!(removed.record.id, "id-2", "identifier {identifier}");
            assert_eq!(removed.matched_by, expected);
            assert_eq!(remaining_ids(&store), ["id-1", "id-3"]);
        }
    }

    #[test]
    fn remove_missing_is_not_found_without_mutation() {
        let tmp = TempDir::new().unwrap();
        let store = seeded(&tmp);
        let before = fs::read_to_string(store.path()).unwrap();
        assert!(store.remove("nope").unwrap_err().is_not_found());
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn remove_shared_title_takes_earliest_record() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.add(record("a", "same", "p/a.txt")).unwrap();
        store.add(record("b", "same", "p/b.txt")).unwrap();
        assert_eq!(store.remove("same").unwrap().record.id, "a");
        assert_eq!(remaining_ids(&store), ["b"]);
    }

    /// Record A's title equals record B's basename. The identifier is
    /// ambiguous across records; the earliest record in file order wins,
    /// whichever field it matched on.
    #[test]
    fn remove_cross_field_ambiguity_takes_earliest_record() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.add(record("a", "b.txt", "p/a.txt")).unwrap();
        store.add(record("b", "bee", "p/b.txt")).unwrap();

        let removed = store.remove("b.txt").unwrap();
        assert_eq!(removed.record.id, "a");
        assert_eq!(removed.matched_by, MatchedBy::Title);
        assert_eq!(remaining_ids(&store), ["b"]);
    }

    /// Same ambiguity with the order reversed: a later record's id does not
    /// take priority over an earlier record's basename.
    #[test]
    fn remove_earlier_basename_beats_later_id() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.add(record("x", "one", "p/target")).unwrap();
        store.add(record("target", "two", "p/two.txt")).unwrap();

        let removed = store.remove("target").unwrap();
        assert_eq!(removed.record.id, "x");
        assert_eq!(removed.matched_by, MatchedBy::Basename);
    }

    #[test]
    fn remove_refuses_corrupt_store() {
        let tmp = TempDir::new().unwrap();
        let store = seeded(&tmp);
        flatfile::append_line(store.path(), "broken").unwrap();
        let before = fs::read_to_string(store.path()).unwrap();

        let err = store.remove("id-1").unwrap_err();
        assert!(matches!(err, Error::Corrupt { line: 4, .. }));
        assert_eq!(fs::read_to_string(store.path()).unwrap(), before);
    }

    #[test]
    fn remove_preserves_comma_filepaths_of_other_records() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        store.add(record("a", "one", "p/a.txt")).unwrap();
        store.add(record("b", "two", "dir,with,commas/b.txt")).unwrap();
        store.remove("a").unwrap();
        assert_eq!(store.list().unwrap()[0].filepath, "dir,with,commas/b.txt");
    }

    #[test]
    fn remove_by_any_spelling_of_the_source_path() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        let poems = tmp.path().join("poems");
        let source = write_poem(&poems, "2024.01.05_1_a.txt", "a");
        store.add(ingest(&source, None).unwrap()).unwrap();

        let respelled = poems.join(".").join("2024.01.05_1_a.txt");
        let removed = store.remove(respelled.to_str().unwrap()).unwrap();
        assert_eq!(removed.matched_by, MatchedBy::Filepath);
        assert!(store.list().unwrap().is_empty());
    }

    // =========================================================================
    // Non-UTF-8 lines
    // =========================================================================

    const MIXED_STORE: &[u8] = b"a,2024.01.01,one,p/a.txt\n\
b,2024.01.05,\xff\xfe,p/bad.txt\n\
c,2024.01.02,two,p/c.txt\n";

    #[test]
    fn list_skips_line_with_invalid_utf8() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        fs::write(store.path(), MIXED_STORE).unwrap();
        let ids: Vec<String> = store.list().unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, ["a", "c"]);
    }

    #[test]
    fn remove_refuses_line_with_invalid_utf8() {
        let tmp = TempDir::new().unwrap();
        let store = store_in(&tmp);
        fs::write(store.path(), MIXED_STORE).unwrap();

        let err = store.remove("c").unwrap_err();
        assert!(matches!(err, Error::Corrupt { line: 2, .. }));
        assert_eq!(fs::read(store.path()).unwrap(), MIXED_STORE);
    }
}
