//! Staleness check deciding whether an entry must be copied.
//!
//! Uses size + coarse mtime, no content hashing. Timestamps are shifted into a
//! fixed reference offset and truncated to whole seconds before comparison,
//! because filesystems and copy tools round sub-second precision differently.

use crate::fs::{DestAttrs, Entry};
use chrono::{DateTime, FixedOffset, Offset, SubsecRound, Utc};
use std::time::SystemTime;

/// Reference offset for timestamp comparison (UTC+05:30, no DST).
pub const REFERENCE_OFFSET_SECS: i32 = 5 * 3600 + 30 * 60;

fn reference_zone() -> FixedOffset {
    FixedOffset::east_opt(REFERENCE_OFFSET_SECS).unwrap_or_else(|| Utc.fix())
}

/// A timestamp in the reference zone at whole-second resolution
pub fn canonical_time(time: SystemTime) -> DateTime<FixedOffset> {
    DateTime::<Utc>::from(time)
        .with_timezone(&reference_zone())
        .trunc_subsecs(0)
}

/// True if the two timestamps land on different reference-zone seconds.
pub fn timestamps_differ(a: SystemTime, b: SystemTime) -> bool {
    canonical_time(a) != canonical_time(b)
}

/// Decide whether `source` must be copied over `dest`.
///
/// - nothing at the destination: always copy
/// - source is not a regular file: never copy, existence is enough
/// - regular file: copy when sizes differ or the canonical mtimes differ
pub fn should_copy(source: &Entry, dest: Option<&DestAttrs>) -> bool {
    let Some(dest) = dest else {
        return true;
    };

    if !source.is_regular_file() {
        return false;
    }

    source.size != dest.size || timestamps_differ(source.modified, dest.modified)
}
