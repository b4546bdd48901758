use chrono::TimeZone;

use super::common::*;
use crate::admin::export::{export_csv, export_filename, CSV_HEADERS};
use crate::registration::domain::{Priority, RegistrationStatus};

#[test]
fn export_starts_with_the_utf8_byte_order_mark() {
    let body = export_csv(&[record("a", 0)]).expect("export succeeds");
    assert_eq!(&body[..3], &[0xEF, 0xBB, 0xBF]);
}

#[test]
fn export_has_header_plus_one_line_per_record() {
    let records = vec![record("a", 0), record("b", 5), record("c", 10)];
    let body = export_csv(&records).expect("export succeeds");
    let text = String::from_utf8(body[3..].to_vec()).expect("valid utf-8");

    let lines: Vec<_> = text.lines().collect();
    assert_eq!(lines.len(), records.len() + 1);
    assert!(lines[0].starts_with("\"登録日時\",\"氏名\""));
}

#[test]
fn every_field_is_double_quoted() {
    let body = export_csv(&[record("a", 0)]).expect("export succeeds");
    let text = String::from_utf8(body[3..].to_vec()).expect("valid utf-8");

    for line in text.lines() {
        assert!(line.starts_with('"') && line.ends_with('"'), "line: {line}");
        assert_eq!(
            line.matches("\",\"").count(),
            CSV_HEADERS.len() - 1,
            "line: {line}"
        );
    }
}

#[test]
fn header_row_matches_the_console_column_order() {
    let body = export_csv(&[]).expect("export succeeds");
    let text = String::from_utf8(body[3..].to_vec()).expect("valid utf-8");
    let expected: Vec<String> = CSV_HEADERS.iter().map(|h| format!("\"{h}\"")).collect();
    assert_eq!(text.lines().next().unwrap(), expected.join(","));
}

#[test]
fn fields_are_mapped_to_display_strings() {
    let mut rec = record("a", 0);
    rec.priority = Some(Priority::Benefits);
    rec.qualifications = vec!["介護福祉士".to_string(), "正看護師".to_string()];
    rec.apply_for_agent = true;
    rec.status = RegistrationStatus::Approved;

    let body = export_csv(&[rec]).expect("export succeeds");
    let text = String::from_utf8(body[3..].to_vec()).expect("valid utf-8");
    let row = text.lines().nth(1).expect("data row");

    assert!(row.contains("\"福利厚生\""));
    assert!(row.contains("\"介護福祉士、正看護師\""));
    assert!(row.contains("\"希望する\""));
    assert!(row.contains("\"承認済み\""));
    // Timestamp format is yyyy/MM/dd HH:mm:ss.
    assert!(row.contains("\"2025/06/01 09:00:00\""));
}

#[test]
fn filename_embeds_the_export_timestamp() {
    let now = chrono::Local
        .with_ymd_and_hms(2025, 6, 1, 14, 30, 5)
        .single()
        .expect("valid instant");
    assert_eq!(export_filename(now), "registrations_20250601_143005.csv");
}
