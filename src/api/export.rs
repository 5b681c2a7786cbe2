use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::DataTableModel;

pub const CSV_MIME: &str = "text/csv;charset=utf-8";
pub const PNG_MIME: &str = "image/png";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Csv,
    Png,
}

impl ExportFormat {
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Png => "png",
        }
    }

    #[must_use]
    pub const fn mime(self) -> &'static str {
        match self {
            Self::Csv => CSV_MIME,
            Self::Png => PNG_MIME,
        }
    }
}

/// A finished export ready to hand to the page as a download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportArtifact {
    pub file_name: String,
    pub format: ExportFormat,
    pub bytes: Vec<u8>,
}

impl ExportArtifact {
    #[must_use]
    pub fn csv(stem: &str, table: &DataTableModel, at: DateTime<Utc>) -> Self {
        Self {
            file_name: export_file_name(stem, ExportFormat::Csv, at),
            format: ExportFormat::Csv,
            bytes: to_csv(table).into_bytes(),
        }
    }

    #[must_use]
    pub fn png(stem: &str, bytes: Vec<u8>, at: DateTime<Utc>) -> Self {
        Self {
            file_name: export_file_name(stem, ExportFormat::Png, at),
            format: ExportFormat::Png,
            bytes,
        }
    }

    #[must_use]
    pub fn mime(&self) -> &'static str {
        self.format.mime()
    }
}

/// Serializes the table as RFC 4180 CSV: header record first, CRLF line
/// breaks, fields quoted only when they contain a comma, quote or newline.
#[must_use]
pub fn to_csv(table: &DataTableModel) -> String {
    let mut out = String::new();
    push_record(&mut out, table.headers.iter().map(String::as_str));
    for row in &table.rows {
        push_record(
            &mut out,
            std::iter::once(row.category.as_str()).chain(row.values.iter().map(String::as_str)),
        );
    }
    out
}

/// `<stem>-YYYYMMDD-HHMMSS.<ext>`, with the stem reduced to `[A-Za-z0-9_-]`.
#[must_use]
pub fn export_file_name(stem: &str, format: ExportFormat, at: DateTime<Utc>) -> String {
    let mut clean: String = stem
        .chars()
        .map(|ch| {
            if ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' {
                ch
            } else {
                '-'
            }
        })
        .collect();
    if clean.trim_matches('-').is_empty() {
        clean = "chart".to_owned();
    }
    format!(
        "{clean}-{}.{}",
        at.format("%Y%m%d-%H%M%S"),
        format.extension()
    )
}

fn push_record<'a>(out: &mut String, fields: impl Iterator<Item = &'a str>) {
    for (index, field) in fields.enumerate() {
        if index > 0 {
            out.push(',');
        }
        push_field(out, field);
    }
    out.push_str("\r\n");
}

fn push_field(out: &mut String, field: &str) {
    if field.contains([',', '"', '\r', '\n']) {
        out.push('"');
        out.push_str(&field.replace('"', "\"\""));
        out.push('"');
    } else {
        out.push_str(field);
    }
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};

    use super::{ExportFormat, export_file_name, push_field};

    #[test]
    fn fields_are_quoted_only_when_needed() {
        let mut out = String::new();
        push_field(&mut out, "plain");
        push_field(&mut out, "a,b");
        push_field(&mut out, "say \"hi\"");
        assert_eq!(out, "plain\"a,b\"\"say \"\"hi\"\"\"");
    }

    #[test]
    fn file_names_carry_a_utc_timestamp() {
        let at = Utc
            .with_ymd_and_hms(2026, 3, 9, 14, 5, 7)
            .single()
            .expect("valid timestamp");
        assert_eq!(
            export_file_name("market growth", ExportFormat::Csv, at),
            "market-growth-20260309-140507.csv"
        );
        assert_eq!(
            export_file_name("???", ExportFormat::Png, at),
            "chart-20260309-140507.png"
        );
    }
}
