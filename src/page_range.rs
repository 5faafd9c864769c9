use crate::error::UsageError;
use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

static RANGE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(-?)([0-9]+)-([0-9]+)$").expect("valid range pattern"));

/// A range as typed by the user, before the document's size is known.
///
/// `start` has already been clamped to 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestedRange {
    pub start: u64,
    pub end: u64,
}

/// An inclusive, 1-based page range that fits inside a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRange {
    pub start: u32,
    pub end: u32,
}

impl PageRange {
    /// Parse a range specification like "3-10".
    ///
    /// A start of zero or below ("0-4", "-5-10") is clamped to 1. Numbers
    /// too large for a `u64` saturate.
    pub fn parse(s: &str) -> Result<RequestedRange, UsageError> {
        let caps = RANGE_PATTERN.captures(s).ok_or(UsageError::Format)?;

        let negative = !caps[1].is_empty();
        let start = parse_page_number(&caps[2]);
        let end = parse_page_number(&caps[3]);

        if !negative && start > end {
            return Err(UsageError::Order);
        }

        // "0-0" and "-5-0" become the empty range 1-0.
        Ok(RequestedRange {
            start: if negative { 1 } else { start.max(1) },
            end,
        })
    }

    pub fn len(&self) -> u32 {
        self.end.saturating_add(1).saturating_sub(self.start)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Name of the file the numbered extract is written to.
    pub fn output_file_name(&self) -> String {
        format!("out_{}.pdf", self)
    }
}

impl RequestedRange {
    /// Fit the range to a document with `total_pages` pages.
    ///
    /// An end past the last page is clamped; a start past it is an error.
    pub fn bound_to(self, total_pages: u32) -> Result<PageRange, UsageError> {
        let total = u64::from(total_pages);
        if self.start > total {
            return Err(UsageError::Bounds(total_pages));
        }

        Ok(PageRange {
            start: self.start as u32,
            end: self.end.min(total) as u32,
        })
    }

    pub fn is_clamped_by(&self, range: &PageRange) -> bool {
        self.end != u64::from(range.end)
    }
}

impl fmt::Display for PageRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}

/// `digits` is known to be ASCII digits, so parsing only fails on overflow.
fn parse_page_number(digits: &str) -> u64 {
    digits.parse::<u64>().unwrap_or(u64::MAX)
}
