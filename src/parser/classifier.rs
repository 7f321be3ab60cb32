// src/parser/classifier.rs
use chrono::{DateTime, Duration, Local, LocalResult, NaiveDateTime, Offset, TimeZone, Timelike};
use tracing::{debug, trace};

use super::scanner::RawBlock;
use crate::error::{MakesError, MakesResult};

/// Marker make prints inside the block of every phony target
pub const PHONY_MARKER: &str = "Phony target (prerequisite of .PHONY)";

/// Marker of the modification time line
pub const LAST_MODIFIED_MARKER: &str = "Last modified";

/// Layout of the modification time; make may append fractional seconds
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Fixed-width part of a timestamp, `d` standing for one digit
const TIMESTAMP_SHAPE: &[u8; 19] = b"dddd-dd-dd dd:dd:dd";

/// A block that survived filtering, with the metadata make reports for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedTarget {
    pub name: String,
    pub is_phony: bool,
    pub last_update: Option<DateTime<Local>>,
}

/// Whether a block describes a user-facing target.
///
/// Comments, make's bookkeeping entries and the `.PHONY` declaration are
/// rejected.
pub fn is_target(block: &RawBlock) -> bool {
    let name = block.name();
    !(name.starts_with('#') || name.starts_with(".PHONY"))
}

pub fn is_phony(block: &RawBlock) -> bool {
    block.lines().iter().any(|line| line.contains(PHONY_MARKER))
}

/// Modification time of the first "Last modified" line, if there is one
pub fn last_update(block: &RawBlock) -> MakesResult<Option<DateTime<Local>>> {
    let line = match block.lines().iter().find(|line| line.contains(LAST_MODIFIED_MARKER)) {
        Some(line) => line,
        None => return Ok(None),
    };

    let tokens: Vec<&str> = line.split_whitespace().collect();
    let value = match tokens.as_slice() {
        [.., date, time] => format!("{} {}", date, time),
        _ => {
            return Err(MakesError::InvalidTimestamp {
                target: block.name().to_string(),
                value: line.clone(),
                message: "expected a date and a time".to_string(),
            })
        }
    };

    parse_local_timestamp(&value)
        .map(Some)
        .map_err(|message| MakesError::InvalidTimestamp {
            target: block.name().to_string(),
            value,
            message,
        })
}

/// Whether `value` is `YYYY-MM-DD HH:MM:SS` with an optional `.digits` suffix
fn has_timestamp_shape(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() < TIMESTAMP_SHAPE.len() {
        return false;
    }

    let (head, fraction) = bytes.split_at(TIMESTAMP_SHAPE.len());
    let head_matches = head.iter().zip(TIMESTAMP_SHAPE).all(|(&b, &expected)| match expected {
        b'd' => b.is_ascii_digit(),
        _ => b == expected,
    });

    head_matches
        && match fraction {
            [] => true,
            [b'.', digits @ ..] => !digits.is_empty() && digits.iter().all(u8::is_ascii_digit),
            _ => false,
        }
}

fn parse_local_timestamp(value: &str) -> Result<DateTime<Local>, String> {
    if !has_timestamp_shape(value) {
        return Err(format!("expected {}", String::from_utf8_lossy(TIMESTAMP_SHAPE)));
    }

    let naive = NaiveDateTime::parse_from_str(value, TIMESTAMP_FORMAT)
        .map_err(|e| e.to_string())?;
    // chrono stores second 60 as a leap nanosecond overflow
    if naive.nanosecond() >= 1_000_000_000 {
        return Err("second out of range".to_string());
    }

    resolve_local(&Local, &naive)
        .ok_or_else(|| "time cannot be placed in the local time zone".to_string())
}

/// Place a wall-clock time in `tz`.
///
/// Ambiguous times take the earliest instant. Times skipped by a forward
/// transition are read with the offset in effect before it, so they land
/// after the transition.
fn resolve_local<Tz: TimeZone>(tz: &Tz, naive: &NaiveDateTime) -> Option<DateTime<Tz>> {
    match tz.from_local_datetime(naive) {
        LocalResult::Single(time) => Some(time),
        LocalResult::Ambiguous(earliest, _) => Some(earliest),
        LocalResult::None => {
            let before = tz
                .offset_from_local_datetime(&(*naive - Duration::days(1)))
                .earliest()?;
            let utc = *naive - Duration::seconds(i64::from(before.fix().local_minus_utc()));
            Some(tz.from_utc_datetime(&utc))
        }
    }
}

pub fn classify(block: &RawBlock) -> MakesResult<ClassifiedTarget> {
    Ok(ClassifiedTarget {
        name: block.name().to_string(),
        is_phony: is_phony(block),
        last_update: last_update(block)?,
    })
}

/// Filter and classify blocks, preserving dump order and duplicates
pub fn classify_all(blocks: &[RawBlock]) -> MakesResult<Vec<ClassifiedTarget>> {
    let mut targets = Vec::new();

    for block in blocks {
        if !is_target(block) {
            trace!("Skipping block {:?}", block.name());
            continue;
        }
        targets.push(classify(block)?);
    }

    debug!("Classified {} of {} blocks as targets", targets.len(), blocks.len());
    Ok(targets)
}
