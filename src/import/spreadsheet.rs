//! Reading team rows from the first worksheet of a workbook.

use std::path::Path;

use calamine::{Data, Reader, open_workbook_auto};

use super::ImportError;

/// Return each row of the first worksheet as trimmed cell texts.
///
/// Empty cells come back as empty strings; [`super::rows_to_teams`] drops them.
pub fn read_rows(path: &Path) -> Result<Vec<Vec<String>>, ImportError> {
    if !path.exists() {
        return Err(ImportError::WorkbookNotFound {
            path: path.to_path_buf(),
        });
    }

    let open_error = |source| ImportError::OpenWorkbook {
        path: path.to_path_buf(),
        source,
    };
    let mut workbook = open_workbook_auto(path).map_err(open_error)?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| ImportError::NoWorksheet {
            path: path.to_path_buf(),
        })?
        .map_err(open_error)?;

    Ok(range
        .rows()
        .map(|row| row.iter().map(cell_text).collect())
        .collect())
}

fn cell_text(cell: &Data) -> String {
    match cell {
        Data::Empty => String::new(),
        other => other.to_string().trim().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use rust_xlsxwriter::Workbook;
    use tempfile::TempDir;

    use super::*;
    use crate::import::{SnapshotTeam, rows_to_teams};

    #[test]
    fn reads_first_sheet_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("sample.xlsx");

        let mut workbook = Workbook::new();
        let sheet = workbook.add_worksheet();
        sheet.write_string(0, 0, " 21bce1 ").unwrap();
        sheet.write_string(0, 1, "21BCE2").unwrap();
        sheet.write_string(2, 1, "21bce3").unwrap();
        let other = workbook.add_worksheet();
        other.write_string(0, 0, "ignored").unwrap();
        workbook.save(&path).unwrap();

        let teams = rows_to_teams(read_rows(&path).unwrap());
        assert_eq!(
            teams,
            vec![
                SnapshotTeam {
                    members: vec!["21BCE1".into(), "21BCE2".into()],
                    score: 0,
                },
                SnapshotTeam {
                    members: vec!["21BCE3".into()],
                    score: 0,
                },
            ]
        );
    }

    #[test]
    fn missing_workbook_is_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing.xlsx");
        assert!(matches!(
            read_rows(&path),
            Err(ImportError::WorkbookNotFound { .. })
        ));
    }
}
