//! Course completion certificate.

use chrono::{DateTime, Datelike, Utc};
use serde::Serialize;

pub const COURSE_TITLE: &str = "Kurikulum Barista Dasar KopiStart";
pub const ISSUER: &str = "KopiStart";

const MONTHS_ID: [&str; 12] = [
    "Januari",
    "Februari",
    "Maret",
    "April",
    "Mei",
    "Juni",
    "Juli",
    "Agustus",
    "September",
    "Oktober",
    "November",
    "Desember",
];

#[derive(Debug, Clone, Serialize)]
pub struct Certificate {
    pub recipient: String,
    pub course_title: String,
    pub issuer: String,
    pub issued_at: DateTime<Utc>,
    /// `issued_at` as "19 Oktober 2026".
    pub issued_on: String,
}

impl Certificate {
    pub fn new(recipient: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            recipient: recipient.into(),
            course_title: COURSE_TITLE.to_string(),
            issuer: ISSUER.to_string(),
            issued_on: format_indonesian_date(issued_at),
            issued_at,
        }
    }
}

/// Formats a date as `d MMMM yyyy` with Indonesian month names.
pub fn format_indonesian_date<D: Datelike>(date: D) -> String {
    format!(
        "{} {} {}",
        date.day(),
        MONTHS_ID[date.month0() as usize],
        date.year()
    )
}
