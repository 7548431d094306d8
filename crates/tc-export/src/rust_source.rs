use tc_core::config::EmitConfig;
use tc_core::symbols::ShiftCodes;
use tc_core::table::PackedTable;

use crate::{identifier, rows};

/// Render a Rust module exposing the table as a `pub const` array.
///
/// Plain `//` header so the file can be pulled in with `include!`.
#[must_use]
pub fn render_module(
    name: &str,
    table: &PackedTable,
    shift_codes: &ShiftCodes,
    config: &EmitConfig,
) -> String {
    let mut out = format!(
        "// Generated by telecode from variant `{name}`. Do not edit.\n\
         \n\
         pub const FIGURES_CODE: u8 = {:#04x};\n\
         pub const LETTERS_CODE: u8 = {:#04x};\n\
         \n\
         pub const {}_MAP: [u8; {}] = [\n",
        shift_codes.figures,
        shift_codes.letters,
        identifier(name).to_ascii_uppercase(),
        table.len()
    );
    out.extend(
        rows(table.as_bytes(), config.per_line, |b| format!("{b:#04x}"))
            .map(|row| format!("    {row},\n")),
    );
    out.push_str("];\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tc_core::variant::us_tty;

    #[test]
    fn module_layout() {
        let table = us_tty().unwrap().build().unwrap();
        let module = render_module("ustty", &table, &ShiftCodes::default(), &EmitConfig::default());
        assert!(module.contains("pub const FIGURES_CODE: u8 = 0x11;\n"));
        assert!(module.contains("pub const LETTERS_CODE: u8 = 0x12;\n"));
        assert!(module.contains("pub const USTTY_MAP: [u8; 128] = [\n"));
        assert!(module.contains("    0x60, 0x80, 0x80, 0x80, 0x80, 0x80, 0x80, 0x45,\n"));
        assert!(module.ends_with(",\n];\n"));
    }

    #[test]
    fn module_values_match_table() {
        let table = us_tty().unwrap().build().unwrap();
        let config = EmitConfig {
            per_line: 16,
            ..EmitConfig::default()
        };
        let module = render_module("ustty", &table, &ShiftCodes::default(), &config);
        let start = module.find("= [").unwrap() + 3;
        let end = module.rfind(']').unwrap();
        let values: Vec<u8> = module[start..end]
            .split(',')
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .map(|v| u8::from_str_radix(v.trim_start_matches("0x"), 16).unwrap())
            .collect();
        assert_eq!(values, table.as_bytes());
    }
}
