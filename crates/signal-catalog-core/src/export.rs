//! CSV export of the signal table.
//!
//! Column order is fixed and matches the persisted schema, so an export can
//! be re-imported (ids are regenerated on import).

use std::io;

use crate::error::Result;
use crate::signal::{join_tags, Signal};
use crate::storage::format_ts;

/// Export column order. Matches the `signals` table.
pub const CSV_COLUMNS: [&str; 13] = [
    "id",
    "title",
    "category",
    "severity",
    "owner",
    "due_date",
    "status",
    "notes",
    "source",
    "tags",
    "created_at",
    "updated_at",
    "closed_at",
];

/// Write signals as CSV to `out`, header first.
pub fn write_csv<W: io::Write>(signals: &[Signal], out: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(out);
    writer.write_record(CSV_COLUMNS)?;
    for signal in signals {
        writer.write_record([
            signal.id.to_string(),
            signal.title.clone(),
            signal.category.clone().unwrap_or_default(),
            signal
                .severity
                .map(|s| s.as_str().to_string())
                .unwrap_or_default(),
            signal.owner.clone().unwrap_or_default(),
            signal.due.map(|d| d.to_string()).unwrap_or_default(),
            signal.status.as_str().to_string(),
            signal.notes.clone().unwrap_or_default(),
            signal.source.clone().unwrap_or_default(),
            join_tags(&signal.tags),
            format_ts(signal.created_at),
            format_ts(signal.updated_at),
            signal.closed_at.map(format_ts).unwrap_or_default(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}
