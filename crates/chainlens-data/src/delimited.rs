//! 구분자 텍스트 (CSV) 읽기/쓰기.

use crate::error::{DataError, Result};
use chainlens_core::{RawTable, Table};
use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;
use tracing::{debug, warn};

const UTF8_BOM: char = '\u{feff}';

/// CSV 읽기/쓰기 옵션.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvOptions {
    /// 필드 구분자
    pub delimiter: u8,
}

impl Default for CsvOptions {
    fn default() -> Self {
        Self { delimiter: b',' }
    }
}

impl CsvOptions {
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self { delimiter }
    }
}

/// 헤더 행이 있는 구분자 텍스트를 읽습니다.
///
/// 값은 문자열 그대로 보존합니다. 헤더보다 짧은 레코드는 빈 문자열로
/// 채우고, 긴 레코드는 잘라냅니다.
pub fn read_raw_table<R: Read>(reader: R, options: &CsvOptions) -> Result<RawTable> {
    let mut rdr = csv::ReaderBuilder::new()
        .delimiter(options.delimiter)
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let mut headers: Vec<String> = rdr.headers()?.iter().map(str::to_string).collect();
    if let Some(first) = headers.first_mut() {
        if first.starts_with(UTF8_BOM) {
            *first = first.trim_start_matches(UTF8_BOM).to_string();
        }
    }
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(DataError::InvalidData("missing header row".to_string()));
    }

    let width = headers.len();
    let mut records = Vec::new();
    let mut reshaped = 0usize;

    for record in rdr.records() {
        let record = record?;
        let mut values: Vec<String> = record.iter().map(str::to_string).collect();
        if values.len() != width {
            reshaped += 1;
            values.resize(width, String::new());
        }
        records.push(values);
    }

    if reshaped > 0 {
        warn!(reshaped, width, "Records with mismatched width were padded or truncated");
    }
    debug!(columns = width, records = records.len(), "Delimited text loaded");

    Ok(RawTable::new(headers, records))
}

/// 파일에서 테이블을 읽습니다.
pub fn read_raw_table_from_path(path: &Path, options: &CsvOptions) -> Result<RawTable> {
    let file = File::open(path)
        .map_err(|e| DataError::IoError(format!("{}: {}", path.display(), e)))?;
    read_raw_table(file, options)
}

/// 테이블을 CSV로 씁니다.
///
/// 헤더 행 다음에 원래 컬럼 순서대로 각 셀의 `render()` 값을 씁니다.
/// 같은 테이블은 항상 같은 바이트열을 만듭니다.
pub fn write_table<W: Write>(table: &Table, writer: W, options: &CsvOptions) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(options.delimiter)
        .from_writer(writer);

    wtr.write_record(table.columns())?;
    for row in table.rows() {
        wtr.write_record(row.iter().map(|cell| cell.render()))?;
    }
    wtr.flush()?;

    debug!(columns = table.columns().len(), rows = table.len(), "Table exported");
    Ok(())
}

/// 테이블을 CSV 문자열로 변환합니다.
pub fn table_to_csv_string(table: &Table, options: &CsvOptions) -> Result<String> {
    let mut buf = Vec::new();
    write_table(table, &mut buf, options)?;
    String::from_utf8(buf).map_err(|e| DataError::InvalidData(e.to_string()))
}

/// 테이블을 파일로 내보냅니다.
pub fn write_table_to_path(table: &Table, path: &Path, options: &CsvOptions) -> Result<()> {
    let file = File::create(path)
        .map_err(|e| DataError::IoError(format!("{}: {}", path.display(), e)))?;
    write_table(table, file, options)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chainlens_core::Cell;
    use rust_decimal_macros::dec;

    #[test]
    fn test_read_pads_and_truncates() {
        let input = "A,B,C\n1,2\n1,2,3,4\n";
        let raw = read_raw_table(input.as_bytes(), &CsvOptions::default()).unwrap();
        assert_eq!(raw.headers, vec!["A", "B", "C"]);
        assert_eq!(raw.records[0], vec!["1", "2", ""]);
        assert_eq!(raw.records[1], vec!["1", "2", "3"]);
    }

    #[test]
    fn test_read_strips_bom_and_keeps_quoted_commas() {
        let input = "\u{feff}Date,Close\n\"Jan 02, 2024\",\"1,234.5\"\n";
        let raw = read_raw_table(input.as_bytes(), &CsvOptions::default()).unwrap();
        assert_eq!(raw.headers[0], "Date");
        assert_eq!(raw.records[0], vec!["Jan 02, 2024", "1,234.5"]);
    }

    #[test]
    fn test_empty_input_is_invalid() {
        let err = read_raw_table("".as_bytes(), &CsvOptions::default()).unwrap_err();
        assert!(matches!(err, DataError::InvalidData(_)));
    }

    #[test]
    fn test_write_table_semicolon() {
        let table = Table::from_rows(
            vec!["Strike".to_string(), "Note".to_string()],
            vec![
                vec![Cell::Number(dec!(100.5)), Cell::text("a;b")],
                vec![Cell::Missing, Cell::text("plain")],
            ],
        )
        .unwrap();

        let csv = table_to_csv_string(&table, &CsvOptions::with_delimiter(b';')).unwrap();
        assert_eq!(csv, "Strike;Note\n100.5;\"a;b\"\n;plain\n");
    }
}
