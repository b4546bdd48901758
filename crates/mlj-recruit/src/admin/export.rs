//! CSV export of the currently-filtered-and-sorted review view.
//!
//! The output is UTF-8 with a byte-order mark so spreadsheet software picks
//! the right encoding, every field is double-quoted, and the header row is
//! fixed in the localized column order the console displays.

use chrono::{DateTime, Local};
use csv::{QuoteStyle, WriterBuilder};

use crate::registration::domain::RegistrationRecord;

pub const CSV_HEADERS: [&str; 10] = [
    "登録日時",
    "氏名",
    "年齢",
    "都道府県",
    "電話番号",
    "メールアドレス",
    "優先条件",
    "資格",
    "エージェント希望",
    "ステータス",
];

const UTF8_BOM: [u8; 3] = [0xEF, 0xBB, 0xBF];

/// Serialize the given view in row order. Returns the complete file body,
/// BOM included.
pub fn export_csv(records: &[RegistrationRecord]) -> Result<Vec<u8>, csv::Error> {
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(UTF8_BOM.to_vec());

    writer.write_record(CSV_HEADERS)?;

    for record in records {
        writer.write_record([
            record.created_at.format("%Y/%m/%d %H:%M:%S").to_string(),
            record.full_name.clone(),
            record.age.clone(),
            record.prefecture.clone(),
            record.phone_number.clone(),
            record.email.clone(),
            record
                .priority
                .map(|priority| priority.label().to_string())
                .unwrap_or_default(),
            record.qualifications.join("、"),
            if record.apply_for_agent {
                "希望する".to_string()
            } else {
                "希望しない".to_string()
            },
            record.status.label().to_string(),
        ])?;
    }

    // Flushing into a Vec cannot fail, but the writer API surfaces it anyway.
    writer.into_inner().map_err(|err| {
        csv::Error::from(std::io::Error::new(
            std::io::ErrorKind::Other,
            err.to_string(),
        ))
    })
}

/// `registrations_<YYYYMMDD>_<HHMMSS>.csv`, from the export-time clock.
pub fn export_filename(now: DateTime<Local>) -> String {
    format!("registrations_{}.csv", now.format("%Y%m%d_%H%M%S"))
}
