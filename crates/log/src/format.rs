//! Line rendering
//!
//! Every facility gets the same layout, differing only in the timestamp:
//!
//! ```text
//! 14:03:07 WARN  netdev eth.c:42: link down
//! 2024-01-01 14:03:07 WARN  netdev eth.c:42: link down
//! ```

use std::fmt::{self, Write as _};

use time::OffsetDateTime;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

use crate::facility::Facility;
use crate::level::Severity;
use crate::utils::truncate_at_boundary;

/// Longest rendered line in bytes, trailing newline included
pub const MAX_LINE_LEN: usize = 1024;

const CONSOLE_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[hour]:[minute]:[second]");
const FILE_TIME: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Timestamp prefix of a rendered line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeStyle {
    /// `HH:MM:SS`
    Clock,
    /// `YYYY-MM-DD HH:MM:SS`
    DateTime,
    /// No timestamp; the receiver stamps lines itself
    None,
}

impl TimeStyle {
    /// Timestamp style used for a facility's lines
    pub const fn for_facility(facility: Facility) -> Self {
        match facility {
            Facility::Console => TimeStyle::Clock,
            Facility::File => TimeStyle::DateTime,
            Facility::Syslog => TimeStyle::None,
        }
    }

    fn items(self) -> Option<&'static [BorrowedFormatItem<'static>]> {
        match self {
            TimeStyle::Clock => Some(CONSOLE_TIME),
            TimeStyle::DateTime => Some(FILE_TIME),
            TimeStyle::None => None,
        }
    }
}

/// Everything about a message except its timestamp style
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    /// Capture time
    pub timestamp: OffsetDateTime,
    /// Message severity
    pub level: Severity,
    /// Module name
    pub module: &'a str,
    /// Source file of the call site
    pub file: &'a str,
    /// Source line of the call site
    pub line: u32,
    /// User message
    pub args: fmt::Arguments<'a>,
}

/// Render one newline-terminated line
///
/// Lines longer than [`MAX_LINE_LEN`] lose the tail of the message. The header
/// is never cut.
pub fn render_line(style: TimeStyle, record: &Record<'_>) -> String {
    let mut out = String::with_capacity(128);

    if let Some(items) = style.items() {
        // Formatting only fails for components the offset cannot supply.
        if let Ok(stamp) = record.timestamp.format(items) {
            out.push_str(&stamp);
            out.push(' ');
        }
    }
    let _ = write!(
        out,
        "{:<5} {:<5} {}:{}: ",
        record.level, record.module, record.file, record.line
    );
    let header_len = out.len();

    let _ = out.write_fmt(record.args);
    truncate_at_boundary(&mut out, MAX_LINE_LEN - 1, header_len);
    out.push('\n');
    out
}
