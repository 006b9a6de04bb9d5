use encoding_rs::Encoding;
use std::{
    fs::File,
    io::{self, Read},
    path::Path,
};

use crate::encoding::DecodingReader;
use crate::error::{Error, Result};

pub type Row = Vec<String>;

/// Reads a tab-delimited file in `encoding` into rows of text.
///
/// The first row decides the width: every row, the header included, keeps
/// one field fewer than the header has. Empty input yields an empty table.
pub fn read_table<P: AsRef<Path>>(path: P, encoding: &'static Encoding) -> Result<Vec<Row>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| Error::FileOpen {
        path: path.to_path_buf(),
        source,
    })?;

    // The CSV reader is buffered and pulls decoded text straight from the
    // transcoder, so the file is never held in its raw form.
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .from_reader(StrictQuotes::new(DecodingReader::new(file, encoding), b'\t'));

    let mut rows = Vec::new();
    let mut keep = 0;
    for (index, record) in rdr.records().enumerate() {
        let record = record.map_err(|source| Error::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        if index == 0 {
            keep = record.len().saturating_sub(1);
        }
        rows.push(record.iter().take(keep).map(str::to_owned).collect());
    }

    tracing::info!(path = %path.display(), rows = rows.len(), width = keep, "read input table");
    Ok(rows)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quoting {
    FieldStart,
    Unquoted,
    Quoted,
    // Saw a quote inside a quoted field: either an escape or the closing quote.
    QuoteInQuoted,
    // Closing quote followed by CR; only LF may come next.
    ClosedCr,
}

/// Rejects quotes the CSV reader would otherwise accept and rewrite.
///
/// A quote inside an unquoted field, or anything but a delimiter or line
/// end after a closing quote, is an `InvalidData` error.
struct StrictQuotes<R> {
    inner: R,
    delimiter: u8,
    state: Quoting,
    line: u64,
}

impl<R: Read> StrictQuotes<R> {
    fn new(inner: R, delimiter: u8) -> Self {
        Self {
            inner,
            delimiter,
            state: Quoting::FieldStart,
            line: 1,
        }
    }

    fn step(&mut self, byte: u8) -> io::Result<()> {
        let end_of_field = byte == self.delimiter || byte == b'\n';
        self.state = match (self.state, byte) {
            (Quoting::Quoted, b'"') => Quoting::QuoteInQuoted,
            (Quoting::Quoted, _) => Quoting::Quoted,
            (Quoting::FieldStart, b'"') => Quoting::Quoted,
            (Quoting::QuoteInQuoted, b'"') => Quoting::Quoted,
            (Quoting::QuoteInQuoted, b'\r') => Quoting::ClosedCr,
            (Quoting::ClosedCr, b'\n') => Quoting::FieldStart,
            (Quoting::FieldStart | Quoting::Unquoted | Quoting::QuoteInQuoted, _)
                if end_of_field =>
            {
                Quoting::FieldStart
            }
            (Quoting::FieldStart | Quoting::Unquoted, b'"') => {
                return Err(self.invalid("bare quote in unquoted field"));
            }
            (Quoting::FieldStart | Quoting::Unquoted, _) => Quoting::Unquoted,
            (Quoting::QuoteInQuoted | Quoting::ClosedCr, _) => {
                return Err(self.invalid("extraneous text after closing quote"));
            }
        };
        if byte == b'\n' {
            self.line += 1;
        }
        Ok(())
    }

    fn invalid(&self, reason: &str) -> io::Error {
        io::Error::new(
            io::ErrorKind::InvalidData,
            format!("{reason} on line {}", self.line),
        )
    }
}

impl<R: Read> Read for StrictQuotes<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.inner.read(buf)?;
        for &byte in &buf[..n] {
            self.step(byte)?;
        }
        Ok(n)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::SHIFT_JIS;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn sjis_file(content: &str) -> NamedTempFile {
        let (bytes, _, had_errors) = SHIFT_JIS.encode(content);
        assert!(!had_errors);
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&bytes).unwrap();
        file
    }

    #[test]
    fn test_read_table_drops_trailing_column() {
        let file = sjis_file("受診者ID\t受診者名\t\r\n1\t山田\t\r\n2\t佐藤\t\r\n");
        let rows = read_table(file.path(), SHIFT_JIS).unwrap();

        let expected: Vec<Row> = vec![
            vec!["受診者ID".into(), "受診者名".into()],
            vec!["1".into(), "山田".into()],
            vec!["2".into(), "佐藤".into()],
        ];
        assert_eq!(rows, expected);
    }

    #[test]
    fn test_read_table_quoted_fields() {
        let file = sjis_file("a\tb\tz\n\"x\ty\"\t\"line\nbreak\"\t\n");
        let rows = read_table(file.path(), SHIFT_JIS).unwrap();

        assert_eq!(rows[1], vec!["x\ty".to_string(), "line\nbreak".to_string()]);
    }

    #[test]
    fn test_read_table_escaped_quotes() {
        let file = sjis_file("a\tb\tz\r\n\"say \"\"hi\"\"\"\t\"x\"\t\r\n");
        let rows = read_table(file.path(), SHIFT_JIS).unwrap();

        assert_eq!(rows[1], vec!["say \"hi\"".to_string(), "x".to_string()]);
    }

    #[test]
    fn test_read_table_text_after_closing_quote() {
        let file = sjis_file("a\tb\tz\n\"A\"B\tx\t\n1\t2\t\n");
        let result = read_table(file.path(), SHIFT_JIS);

        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_read_table_bare_quote() {
        let file = sjis_file("a\tb\tz\nA\tx\"y\t\n1\t2\t\n");
        let result = read_table(file.path(), SHIFT_JIS);

        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_read_table_empty_file() {
        let file = sjis_file("");
        let rows = read_table(file.path(), SHIFT_JIS).unwrap();

        assert!(rows.is_empty());
    }

    #[test]
    fn test_read_table_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = read_table(dir.path().join("absent.txt"), SHIFT_JIS);

        assert!(matches!(result, Err(Error::FileOpen { .. })));
    }

    #[test]
    fn test_read_table_ragged_row() {
        let file = sjis_file("a\tb\tc\n1\t2\n");
        let result = read_table(file.path(), SHIFT_JIS);

        assert!(matches!(result, Err(Error::Parse { .. })));
    }

    #[test]
    fn test_read_table_undecodable_bytes() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&[b'a', b'\t', 0x81, 0x20, b'\n']).unwrap();
        let result = read_table(file.path(), SHIFT_JIS);

        assert!(matches!(result, Err(Error::Parse { .. })));
    }
}
