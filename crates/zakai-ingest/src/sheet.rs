/// Message returned instead of text when this build has no spreadsheet engine.
pub const MISSING_ENGINE_DIAGNOSTIC: &str = "Spreadsheet support is not available in this build. \
     Rebuild ZakAI with the `spreadsheet` feature (`cargo install zakai-cli --features spreadsheet`) \
     to read .xls and .xlsx files.";

/// Whether spreadsheets can be parsed by this build.
pub const fn engine_available() -> bool {
    cfg!(feature = "spreadsheet")
}

#[cfg(feature = "spreadsheet")]
pub use engine::render_workbook;

#[cfg(feature = "spreadsheet")]
mod engine {
    use calamine::{open_workbook_auto_from_rs, Data, Reader};
    use std::io::Cursor;
    use tracing::debug;
    use zakai_core::{ZakaiError, ZakaiResult};

    /// Renders every row and column of every sheet.
    ///
    /// Cells are separated by ` | ` and rows by newlines. When the workbook
    /// has more than one sheet each one is introduced by a
    /// `--- Sheet: <name> ---` line.
    pub fn render_workbook(bytes: &[u8]) -> ZakaiResult<String> {
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))
            .map_err(|e| ZakaiError::Extraction(format!("cannot parse spreadsheet: {e}")))?;

        let sheet_names: Vec<String> = workbook.sheet_names().to_vec();
        debug!(sheets = sheet_names.len(), "Rendering spreadsheet");

        let mut lines: Vec<String> = Vec::new();
        for name in &sheet_names {
            let range = workbook.worksheet_range(name).map_err(|e| {
                ZakaiError::Extraction(format!("cannot read sheet '{name}': {e}"))
            })?;

            if sheet_names.len() > 1 {
                lines.push(format!("--- Sheet: {name} ---"));
            }
            for row in range.rows() {
                let cells: Vec<String> = row.iter().map(cell_to_string).collect();
                lines.push(cells.join(" | "));
            }
        }
        Ok(lines.join("\n"))
    }

    fn cell_to_string(cell: &Data) -> String {
        match cell {
            Data::Empty => String::new(),
            Data::String(s) => s.clone(),
            Data::Int(i) => i.to_string(),
            Data::Float(f) => {
                // Whole floats print as integers (1500.0 → "1500").
                if f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
                    (*f as i64).to_string()
                } else {
                    f.to_string()
                }
            }
            Data::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
            Data::Error(e) => format!("#ERR:{e:?}"),
            Data::DateTime(dt) => dt.to_string(),
            Data::DateTimeIso(s) => s.clone(),
            Data::DurationIso(s) => s.clone(),
        }
    }
}
