//! Source C + header.
//!
//! ```text
//! asciiToUstty.h   include guard, FIGURES_CODE / LETTERS_CODE, extern declaration
//! asciiToUstty.c   <storage> ustty_map[128] = { ... };
//! ```

use tc_core::config::EmitConfig;
use tc_core::symbols::ShiftCodes;
use tc_core::table::PackedTable;

use crate::{capitalize, identifier, rows};

#[must_use]
pub fn source_file_name(name: &str) -> String {
    format!("asciiTo{}.c", capitalize(&identifier(name)))
}

#[must_use]
pub fn header_file_name(name: &str) -> String {
    format!("asciiTo{}.h", capitalize(&identifier(name)))
}

/// `asciiToUstty.h` → `__ASCIITOUSTTY_H__`.
#[must_use]
pub fn include_guard(header_name: &str) -> String {
    let body: String = header_name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_uppercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("__{body}__")
}

/// Render the table definition. Values are printed like `0x0`, `0x80`.
#[must_use]
pub fn render_source(name: &str, table: &PackedTable, config: &EmitConfig) -> String {
    let body: Vec<String> =
        rows(table.as_bytes(), config.per_line, |b| format!("{b:#x}")).collect();
    format!(
        "{}{} {}_map[{}] = {{\n{}\n}};\n",
        includes(config),
        config.storage,
        identifier(name),
        table.len(),
        body.join(",\n")
    )
}

/// Render the companion header.
#[must_use]
pub fn render_header(name: &str, shift_codes: &ShiftCodes, config: &EmitConfig) -> String {
    let guard = include_guard(&header_file_name(name));
    format!(
        "#ifndef  {guard}\n\
         #define  {guard}\n\
         \n\
         {}\
         #define FIGURES_CODE {:#x}\n\
         #define LETTERS_CODE {:#x}\n\
         extern {} {}_map[];\n\
         \n\
         #endif /* {guard} */\n",
        includes(config),
        shift_codes.figures,
        shift_codes.letters,
        config.storage,
        identifier(name),
    )
}

/// `#include` lines plus a blank line, or nothing.
fn includes(config: &EmitConfig) -> String {
    if config.includes.is_empty() {
        return String::new();
    }
    let mut out: String = config
        .includes
        .iter()
        .map(|include| format!("#include <{include}>\n"))
        .collect();
    out.push('\n');
    out
}
