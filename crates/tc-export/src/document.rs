use anyhow::{Context, Result};
use serde::Serialize;
use tc_core::symbols::ShiftCodes;
use tc_core::table::PackedTable;

/// JSON form of a packed table.
#[derive(Serialize)]
struct TableDocument<'a> {
    name: &'a str,
    width: usize,
    figures_code: u8,
    letters_code: u8,
    mapped: usize,
    entries: &'a [u8],
}

/// Serialize a table to pretty JSON, newline-terminated.
///
/// # Errors
/// Returns an error if serialization fails.
pub fn render_json(name: &str, table: &PackedTable, shift_codes: &ShiftCodes) -> Result<Vec<u8>> {
    let doc = TableDocument {
        name,
        width: table.len(),
        figures_code: shift_codes.figures,
        letters_code: shift_codes.letters,
        mapped: table.mapped_count(),
        entries: table.as_bytes(),
    };
    let mut bytes = serde_json::to_vec_pretty(&doc).context("Sérialisation JSON")?;
    bytes.push(b'\n');
    Ok(bytes)
}
