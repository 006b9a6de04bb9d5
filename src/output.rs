use chrono::NaiveDate;
use encoding_rs::Encoding;
use std::{
    fs::File,
    io::BufWriter,
    path::{Path, PathBuf},
};

use crate::config::Config;
use crate::encoding::EncodingWriter;
use crate::error::{Error, Result};
use crate::roster::RosterRow;

/// `<prefix><MMDD><extension>`
pub fn output_file_name(prefix: &str, extension: &str, date: NaiveDate) -> String {
    format!("{prefix}{}{extension}", date.format("%m%d"))
}

/// Writes `rows` as comma-delimited, CRLF-terminated text in `encoding`.
pub fn write_roster(path: &Path, rows: &[RosterRow], encoding: &'static Encoding) -> Result<()> {
    let write_err = |source: csv::Error| Error::Write {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(|source| Error::FileCreate {
        path: path.to_path_buf(),
        source,
    })?;

    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b',')
        .terminator(csv::Terminator::CRLF)
        .has_headers(false)
        .from_writer(EncodingWriter::new(BufWriter::new(file), encoding));

    for row in rows {
        wtr.serialize(row).map_err(write_err)?;
    }

    let encoder = wtr
        .into_inner()
        .map_err(|e| write_err(e.into_error().into()))?;
    encoder.finish().map_err(|e| write_err(e.into()))?;

    Ok(())
}

pub fn roster_path(config: &Config, date: NaiveDate) -> PathBuf {
    config.output_dir.join(output_file_name(
        &config.output_prefix,
        &config.output_extension,
        date,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::SHIFT_JIS;

    fn roster_row(id: &str, name: &str) -> RosterRow {
        RosterRow {
            subject_id: id.into(),
            subject_name: name.into(),
            phonetic: "ﾔﾏﾀﾞ".into(),
            sex: "1".into(),
            birth_date: "19800101".into(),
            employee_no: "E1".into(),
            company_name: "ACME, Inc.".into(),
            company_code: "C1".into(),
            department_code: "D1".into(),
            department_name: "DeptA".into(),
        }
    }

    #[test]
    fn file_name_uses_zero_padded_month_and_day() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(
            output_file_name("眼底ノートPC用受診者名簿", ".csv", date),
            "眼底ノートPC用受診者名簿0307.csv"
        );
    }

    #[test]
    fn roster_path_uses_configured_name() {
        let date = NaiveDate::from_ymd_opt(2024, 12, 25).unwrap();
        let config = Config {
            output_dir: PathBuf::from("out"),
            output_prefix: "list".into(),
            output_extension: ".txt".into(),
            ..Config::default()
        };
        assert_eq!(
            roster_path(&config, date),
            Path::new("out").join("list1225.txt")
        );
    }

    #[test]
    fn writes_crlf_shift_jis_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        write_roster(&path, &[roster_row("1", "山田"), roster_row("2", "佐藤")], SHIFT_JIS).unwrap();

        let bytes = std::fs::read(&path).unwrap();
        let (text, _, had_errors) = SHIFT_JIS.decode(&bytes);
        assert!(!had_errors);
        assert_eq!(
            text,
            "1,山田,ﾔﾏﾀﾞ,1,19800101,E1,\"ACME, Inc.\",C1,D1,DeptA\r\n\
             2,佐藤,ﾔﾏﾀﾞ,1,19800101,E1,\"ACME, Inc.\",C1,D1,DeptA\r\n"
        );
    }

    #[test]
    fn every_line_has_ten_fields() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        write_roster(&path, &[roster_row("1", "山田")], SHIFT_JIS).unwrap();

        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .from_path(&path)
            .unwrap();
        for record in rdr.byte_records() {
            assert_eq!(record.unwrap().len(), 10);
        }
    }

    #[test]
    fn unencodable_value_fails() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roster.csv");
        let result = write_roster(&path, &[roster_row("1", "😀")], SHIFT_JIS);

        assert!(matches!(result, Err(Error::Write { .. })));
    }

    #[test]
    fn missing_directory_fails_to_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("absent").join("roster.csv");
        let result = write_roster(&path, &[], SHIFT_JIS);

        assert!(matches!(result, Err(Error::FileCreate { .. })));
    }
}
