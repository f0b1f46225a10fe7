//! 원본 테이블과 형변환된 테이블.

use crate::error::{PipelineError, PipelineResult};
use crate::types::Cell;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Serialize;

/// 파일에서 읽은 그대로의 테이블 (헤더 + 문자열 레코드).
///
/// 모든 레코드는 헤더와 같은 너비를 가집니다 (읽기 단계에서 맞춰짐).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl RawTable {
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        Self { headers, records }
    }

    /// 레코드 수.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// 헤더 이름으로 컬럼 위치를 찾습니다.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }
}

/// 한 행의 셀 (테이블 컬럼 순서와 동일).
pub type Row = Vec<Cell>;

/// 형변환이 끝난 테이블.
///
/// 컬럼 순서는 원본 순서를 따르며 그대로 내보내기 순서가 됩니다.
/// 행 순서는 명시적으로 정렬하지 않는 한 원본 순서를 유지합니다.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    /// 빈 테이블을 생성합니다.
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// 컬럼과 행으로 테이블을 생성합니다. 모든 행의 너비가 컬럼 수와 같아야 합니다.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Row>) -> PipelineResult<Self> {
        let mut table = Self::new(columns);
        for row in rows {
            table.push_row(row)?;
        }
        Ok(table)
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn into_rows(self) -> Vec<Row> {
        self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// 컬럼 위치를 찾고, 없으면 `UnknownColumn` 에러를 반환합니다.
    pub fn require_column(&self, name: &str) -> PipelineResult<usize> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::UnknownColumn(name.to_string()))
    }

    /// 행을 추가합니다.
    pub fn push_row(&mut self, row: Row) -> PipelineResult<()> {
        if row.len() != self.columns.len() {
            return Err(PipelineError::RowWidth {
                expected: self.columns.len(),
                found: row.len(),
            });
        }
        self.rows.push(row);
        Ok(())
    }

    /// `index`번째 행의 뷰.
    pub fn row(&self, index: usize) -> Option<RowView<'_>> {
        self.rows.get(index).map(|cells| RowView {
            table: self,
            index,
            cells,
        })
    }

    /// 모든 행을 순서대로 순회합니다.
    pub fn iter(&self) -> impl Iterator<Item = RowView<'_>> + '_ {
        self.rows
            .iter()
            .enumerate()
            .map(move |(index, cells)| RowView {
                table: self,
                index,
                cells,
            })
    }

    /// 한 컬럼의 셀 참조 목록.
    pub fn column(&self, name: &str) -> PipelineResult<Vec<&Cell>> {
        let idx = self.require_column(name)?;
        Ok(self.rows.iter().map(|row| &row[idx]).collect())
    }

    /// 한 컬럼을 숫자로 읽습니다. 숫자가 아닌 셀이 있으면 에러입니다.
    pub fn decimal_column(&self, name: &str) -> PipelineResult<Vec<Decimal>> {
        let idx = self.require_column(name)?;
        self.rows
            .iter()
            .enumerate()
            .map(|(row, cells)| {
                cells[idx]
                    .as_decimal()
                    .ok_or_else(|| PipelineError::NotNumeric {
                        column: name.to_string(),
                        row,
                    })
            })
            .collect()
    }

    /// 조건을 만족하는 행만 남긴 새 테이블을 반환합니다 (순서 유지).
    pub fn filter<F>(&self, mut predicate: F) -> Table
    where
        F: FnMut(&RowView<'_>) -> bool,
    {
        let rows = self
            .iter()
            .filter(|view| predicate(view))
            .map(|view| view.cells.to_vec())
            .collect();
        Table {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// 컬럼 값으로 안정 정렬합니다 (오름차순).
    pub fn sort_by_column(&mut self, name: &str) -> PipelineResult<()> {
        let idx = self.require_column(name)?;
        self.rows.sort_by(|a, b| a[idx].sort_cmp(&b[idx]));
        Ok(())
    }

    /// 같은 이름의 컬럼이 있으면 덮어쓰고, 없으면 끝에 추가합니다.
    pub fn set_or_append_column(&mut self, name: &str, values: Vec<Cell>) -> PipelineResult<()> {
        if values.len() != self.rows.len() {
            return Err(PipelineError::RowWidth {
                expected: self.rows.len(),
                found: values.len(),
            });
        }
        match self.column_index(name) {
            Some(idx) => {
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row[idx] = value;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, value) in self.rows.iter_mut().zip(values) {
                    row.push(value);
                }
            }
        }
        Ok(())
    }

    /// 앞에서부터 `n`개 행.
    pub fn head(&self, n: usize) -> Table {
        Table {
            columns: self.columns.clone(),
            rows: self.rows.iter().take(n).cloned().collect(),
        }
    }

    /// 마지막 `n`개 행.
    pub fn tail(&self, n: usize) -> Table {
        let skip = self.rows.len().saturating_sub(n);
        Table {
            columns: self.columns.clone(),
            rows: self.rows[skip..].to_vec(),
        }
    }
}

/// 테이블의 한 행에 대한 읽기 전용 뷰.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    table: &'a Table,
    index: usize,
    cells: &'a [Cell],
}

impl<'a> RowView<'a> {
    /// 테이블 내 행 위치.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn cells(&self) -> &'a [Cell] {
        self.cells
    }

    pub fn get(&self, column: &str) -> Option<&'a Cell> {
        self.table.column_index(column).map(|idx| &self.cells[idx])
    }

    pub fn decimal(&self, column: &str) -> Option<Decimal> {
        self.get(column).and_then(Cell::as_decimal)
    }

    pub fn text(&self, column: &str) -> Option<&'a str> {
        self.get(column).and_then(Cell::as_text)
    }

    pub fn date(&self, column: &str) -> Option<NaiveDate> {
        self.get(column).and_then(Cell::as_date)
    }
}
