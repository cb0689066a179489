//! Delimited text file I/O for bug records.
//!
//! Each line holds one record:
//!
//! ```text
//! id,title,description,STATUS,PRIORITY,assignedTo,comment1|comment2|...
//! ```
//!
//! Fields are not quoted or escaped. A comma inside a text field shifts the
//! field count and the line is skipped on the next load.

use std::fs;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{BugError, Result};
use crate::model::{BugRecord, Priority, Status};

/// Separates the seven fields of a line.
pub const FIELD_DELIMITER: &str = ",";

/// Separates comments inside the last field.
pub const COMMENT_DELIMITER: &str = "|";

const FIELD_COUNT: usize = 7;

/// A line dropped during load.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedLine {
    /// 1-based line number.
    pub line: usize,
    pub reason: String,
}

/// Result of scanning a bug file.
#[derive(Debug, Default)]
pub struct Loaded {
    pub records: Vec<BugRecord>,
    pub skipped: Vec<SkippedLine>,
    /// A read error stopped the scan early; `records` holds what came before it.
    pub truncated: bool,
}

/// Parse one line into a record.
///
/// # Errors
///
/// Returns `MalformedLine` if the line does not have exactly seven fields
/// or the ID is not a non-negative integer.
pub fn parse_line(line_no: usize, line: &str) -> Result<BugRecord> {
    let parts: Vec<&str> = line.split(FIELD_DELIMITER).collect();
    if parts.len() != FIELD_COUNT {
        return Err(BugError::MalformedLine {
            line: line_no,
            reason: format!("expected {FIELD_COUNT} fields, found {}", parts.len()),
        });
    }

    let id = parts[0].parse::<u32>().map_err(|e| BugError::MalformedLine {
        line: line_no,
        reason: format!("invalid id '{}': {e}", parts[0]),
    })?;

    let comments_field = parts[6].trim();
    let comments = if comments_field.is_empty() {
        Vec::new()
    } else {
        comments_field.split(COMMENT_DELIMITER).map(String::from).collect()
    };

    Ok(BugRecord {
        id,
        title: parts[1].to_string(),
        description: parts[2].to_string(),
        status: Status::coerce(parts[3]),
        priority: Priority::coerce(parts[4]),
        assigned_to: parts[5].to_string(),
        comments,
    })
}

/// Serialize one record as a line (without the trailing newline).
#[must_use]
pub fn format_line(record: &BugRecord) -> String {
    let id = record.id.to_string();
    let comments = record.comments.join(COMMENT_DELIMITER);
    let fields: [&str; FIELD_COUNT] = [
        id.as_str(),
        record.title.as_str(),
        record.description.as_str(),
        record.status.as_str(),
        record.priority.as_str(),
        record.assigned_to.as_str(),
        comments.as_str(),
    ];
    fields.join(FIELD_DELIMITER)
}

/// Scan records from a reader, skipping malformed lines.
///
/// A read error ends the scan; the records parsed so far are kept and
/// `truncated` is set.
pub fn read<R: BufRead>(reader: R) -> Loaded {
    let mut loaded = Loaded::default();

    for (idx, line) in reader.lines().enumerate() {
        let line_no = idx + 1;
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Error reading bugs at line {line_no}: {e}");
                loaded.truncated = true;
                break;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        match parse_line(line_no, &line) {
            Ok(record) => loaded.records.push(record),
            Err(BugError::MalformedLine { line, reason }) => {
                tracing::debug!("Skipping line {line}: {reason}");
                loaded.skipped.push(SkippedLine { line, reason });
            }
            Err(e) => {
                tracing::debug!("Skipping line {line_no}: {e}");
                loaded.skipped.push(SkippedLine {
                    line: line_no,
                    reason: e.to_string(),
                });
            }
        }
    }

    loaded
}

/// Load records from a bug file.
///
/// A missing file loads as an empty collection.
///
/// # Errors
///
/// Returns `Io` if the file exists but cannot be opened.
pub fn load(path: &Path) -> Result<Loaded> {
    let file = match fs::File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            tracing::debug!("No bug file at {}; starting empty", path.display());
            return Ok(Loaded::default());
        }
        Err(e) => return Err(BugError::Io(e)),
    };

    let loaded = read(BufReader::new(file));
    tracing::debug!(
        "Loaded {} bug(s) from {} ({} skipped)",
        loaded.records.len(),
        path.display(),
        loaded.skipped.len()
    );
    Ok(loaded)
}

/// Write every record as one line.
///
/// # Errors
///
/// Returns any error from the underlying writer.
pub fn write<W: Write>(writer: &mut W, records: &[BugRecord]) -> io::Result<()> {
    for record in records {
        writeln!(writer, "{}", format_line(record))?;
    }
    writer.flush()
}

/// Replace the bug file with `records`.
///
/// Writes to a sibling temp file and renames it over the target, creating
/// parent directories as needed.
///
/// # Errors
///
/// Returns `Io` if the file cannot be written.
pub fn save(path: &Path, records: &[BugRecord]) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }

    let tmp_path = temp_path(path);
    let result = write_and_rename(&tmp_path, path, records);
    if result.is_err() {
        let _ = fs::remove_file(&tmp_path);
    }
    result?;

    tracing::debug!("Saved {} bug(s) to {}", records.len(), path.display());
    Ok(())
}

fn write_and_rename(tmp_path: &Path, path: &Path, records: &[BugRecord]) -> io::Result<()> {
    let mut writer = BufWriter::new(fs::File::create(tmp_path)?);
    write(&mut writer, records)?;
    writer.into_inner().map_err(io::IntoInnerError::into_error)?;
    fs::rename(tmp_path, path)
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn make_bug(id: u32, title: &str) -> BugRecord {
        BugRecord {
            id,
            title: title.to_string(),
            description: "Something broke".to_string(),
            status: Status::InProgress,
            priority: Priority::High,
            assigned_to: "alice".to_string(),
            comments: vec![],
        }
    }

    #[test]
    fn test_format_line_field_order() {
        let mut bug = make_bug(4, "Crash");
        bug.comments = vec!["first".to_string(), "second".to_string()];
        assert_eq!(
            format_line(&bug),
            "4,Crash,Something broke,IN_PROGRESS,HIGH,alice,first|second"
        );
    }

    #[test]
    fn test_format_line_empty_comments() {
        let bug = make_bug(1, "Crash");
        assert_eq!(
            format_line(&bug),
            "1,Crash,Something broke,IN_PROGRESS,HIGH,alice,"
        );
    }

    #[test]
    fn test_parse_line_coerces_enums() {
        let bug = parse_line(1, "9,T,D,resolved,bogus,bob,").unwrap();
        assert_eq!(bug.id, 9);
        assert_eq!(bug.status, Status::Resolved);
        assert_eq!(bug.priority, Priority::Low);
        assert!(bug.comments.is_empty());

        let bug = parse_line(1, "9,T,D,???,critical,bob,a|b").unwrap();
        assert_eq!(bug.status, Status::New);
        assert_eq!(bug.priority, Priority::Critical);
        assert_eq!(bug.comments, vec!["a", "b"]);
    }

    #[test]
    fn test_parse_line_rejects_wrong_field_count() {
        let err = parse_line(3, "1,a,b,NEW,LOW").unwrap_err();
        assert!(matches!(err, BugError::MalformedLine { line: 3, .. }));

        // An unescaped comma inside a text field corrupts the split.
        let err = parse_line(4, "1,Crash, again,b,NEW,LOW,carol,").unwrap_err();
        assert!(matches!(err, BugError::MalformedLine { line: 4, .. }));
    }

    #[test]
    fn test_parse_line_rejects_bad_id() {
        assert!(parse_line(1, "abc,T,D,NEW,LOW,bob,").is_err());
        assert!(parse_line(1, "-1,T,D,NEW,LOW,bob,").is_err());
    }

    #[test]
    fn test_blank_comment_field_is_empty() {
        let bug = parse_line(1, "2,T,D,NEW,LOW,bob,   ").unwrap();
        assert!(bug.comments.is_empty());
    }

    #[test]
    fn test_comment_field_is_trimmed_before_split() {
        let bug = parse_line(1, "2,T,D,NEW,LOW,bob, a|b ").unwrap();
        assert_eq!(bug.comments, vec!["a", "b"]);
    }

    #[test]
    fn test_read_skips_malformed_lines() {
        let input = "1,Good,desc,NEW,LOW,amy,\n1,2,3,4,5\n\n2,Also good,desc,CLOSED,HIGH,bo,x\n";
        let loaded = read(input.as_bytes());
        assert_eq!(loaded.records.len(), 2);
        assert_eq!(loaded.skipped.len(), 1);
        assert_eq!(loaded.skipped[0].line, 2);
        assert!(!loaded.truncated);
    }

    #[test]
    fn test_load_missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = load(&dir.path().join("missing.txt")).unwrap();
        assert!(loaded.records.is_empty());
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn test_load_directory_is_truncated() {
        let dir = tempfile::tempdir().unwrap();
        // Opening a directory succeeds on unix but reading it fails.
        match load(dir.path()) {
            Ok(loaded) => {
                assert!(loaded.records.is_empty());
                assert!(loaded.truncated);
            }
            Err(BugError::Io(_)) => {}
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_save_creates_parent_and_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("data").join("bugs.txt");

        save(&path, &[make_bug(1, "One"), make_bug(2, "Two")]).unwrap();
        save(&path, &[make_bug(3, "Three")]).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content, "3,Three,Something broke,IN_PROGRESS,HIGH,alice,\n");
        assert!(!temp_path(&path).exists());
    }

    #[test]
    fn test_save_failure_leaves_no_temp_file() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("taken");
        fs::create_dir(&target).unwrap();
        fs::write(target.join("keep"), "x").unwrap();

        assert!(save(&target, &[make_bug(1, "One")]).is_err());
        assert!(!temp_path(&target).exists());
    }

    fn text_field() -> impl Strategy<Value = String> {
        "[A-Za-z0-9 _.:;!?'-]{0,24}"
    }

    fn comment() -> impl Strategy<Value = String> {
        "[A-Za-z0-9_.:;!?'-]([A-Za-z0-9 _.:;!?'-]{0,22}[A-Za-z0-9_.:;!?'-])?"
    }

    fn record() -> impl Strategy<Value = BugRecord> {
        (
            any::<u32>(),
            text_field(),
            text_field(),
            proptest::sample::select(Status::ALL.to_vec()),
            proptest::sample::select(Priority::ALL.to_vec()),
            text_field(),
            proptest::collection::vec(comment(), 0..4),
        )
            .prop_map(
                |(id, title, description, status, priority, assigned_to, comments)| BugRecord {
                    id,
                    title,
                    description,
                    status,
                    priority,
                    assigned_to,
                    comments,
                },
            )
    }

    proptest! {
        #[test]
        fn prop_save_then_load_preserves_records(records in proptest::collection::vec(record(), 0..8)) {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("bugs.txt");
            save(&path, &records).unwrap();
            let loaded = load(&path).unwrap();
            prop_assert!(loaded.skipped.is_empty());
            prop_assert_eq!(loaded.records, records);
        }
    }
}
