//! Portfolio workbooks (`.xlsx`, `.xls`, `.ods`).

use std::io::Cursor;
use std::path::Path;

use calamine::{open_workbook_auto_from_rs, Data, Range, Reader};
use opcvm_compliance::{load_portfolio_from_sheets, LoadedPortfolio, RawSheet, SheetLayout};
use opcvm_core::CellValue;
use tracing::{debug, warn};

use crate::error::{FileError, FileResult};

fn to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::DateTime(dt) => CellValue::Float(dt.as_f64()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}

/// Converts a used range to rows anchored at cell `A1`.
fn to_rows(range: &Range<Data>) -> Vec<Vec<CellValue>> {
    let Some((start_row, start_col)) = range.start() else {
        return Vec::new();
    };

    let mut rows: Vec<Vec<CellValue>> = vec![Vec::new(); start_row as usize];
    rows.extend(range.rows().map(|r| {
        let mut row = vec![CellValue::Empty; start_col as usize];
        row.extend(r.iter().map(to_cell));
        row
    }));
    rows
}

/// Reads every sheet of a workbook held in memory.
///
/// A sheet that cannot be read is logged and left out; only a workbook that
/// cannot be opened at all is an error.
pub fn read_sheets(bytes: Vec<u8>) -> FileResult<Vec<RawSheet>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;

    let mut sheets = Vec::new();
    for name in workbook.sheet_names() {
        match workbook.worksheet_range(&name) {
            Ok(range) => {
                let rows = to_rows(&range);
                debug!(sheet = %name, rows = rows.len(), "Read sheet");
                sheets.push(RawSheet { name, rows });
            }
            Err(e) => warn!(sheet = %name, error = %e, "Unreadable sheet"),
        }
    }
    Ok(sheets)
}

/// Loads a portfolio from workbook bytes.
///
/// Fails with [`FileError::NoValidData`] when no sheet yields a holding.
pub fn load_portfolio_from_bytes(
    bytes: Vec<u8>,
    layout: &SheetLayout,
) -> FileResult<LoadedPortfolio> {
    let sheets = read_sheets(bytes)?;
    load_portfolio_from_sheets(&sheets, layout).ok_or(FileError::NoValidData)
}

/// Loads a portfolio from a workbook file.
pub fn load_portfolio(path: impl AsRef<Path>, layout: &SheetLayout) -> FileResult<LoadedPortfolio> {
    let path = path.as_ref();
    let bytes = std::fs::read(path).map_err(|e| FileError::io(path, e))?;
    load_portfolio_from_bytes(bytes, layout)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_cell() {
        assert_eq!(to_cell(&Data::Empty), CellValue::Empty);
        assert_eq!(to_cell(&Data::Int(3)), CellValue::Int(3));
        assert_eq!(to_cell(&Data::Float(1.5)), CellValue::Float(1.5));
        assert_eq!(
            to_cell(&Data::String("1 000".into())),
            CellValue::Text("1 000".into())
        );
        assert_eq!(
            to_cell(&Data::Error(calamine::CellErrorType::Ref)),
            CellValue::Text("#REF!".into())
        );
    }

    #[test]
    fn test_to_rows_pads_offset() {
        let mut range: Range<Data> = Range::new((1, 2), (2, 3));
        range.set_value((1, 2), Data::String("X".into()));
        range.set_value((2, 3), Data::Float(4.0));

        let rows = to_rows(&range);
        assert_eq!(rows.len(), 3);
        assert!(rows[0].is_empty());
        assert_eq!(rows[1][2], CellValue::Text("X".into()));
        assert_eq!(rows[2][3], CellValue::Float(4.0));
        assert_eq!(rows[2][0], CellValue::Empty);
    }

    #[test]
    fn test_garbage_bytes_rejected() {
        let err = load_portfolio_from_bytes(b"not a workbook".to_vec(), &SheetLayout::default());
        assert!(matches!(err, Err(FileError::Workbook(_))));
    }

    #[test]
    fn test_missing_file() {
        let err = load_portfolio("/nonexistent/portfolio.xlsx", &SheetLayout::default());
        assert!(matches!(err, Err(FileError::Io { .. })));
    }
}
