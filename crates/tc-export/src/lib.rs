//! Export des tables packées : C, Rust, JSON, binaire brut.
//!
//! Every emitter writes the table index-for-index; none of them rewrites a byte.

pub mod c_source;
pub mod document;
pub mod rust_source;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tc_core::config::{EmitConfig, EmitFormat};
use tc_core::table::PackedTable;
use tc_core::variant::CodeVariant;

/// One output file, rendered in memory.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedFile {
    pub file_name: String,
    pub contents: Vec<u8>,
}

impl RenderedFile {
    fn text(file_name: String, contents: String) -> Self {
        Self {
            file_name,
            contents: contents.into_bytes(),
        }
    }
}

/// Render every file the configured format produces for one table.
///
/// # Errors
/// Returns an error if JSON serialization fails.
pub fn render(
    variant: &CodeVariant,
    table: &PackedTable,
    config: &EmitConfig,
) -> Result<Vec<RenderedFile>> {
    let name = variant.name.as_str();
    let shift_codes = &variant.options.shift_codes;
    let files = match config.format {
        EmitFormat::C => vec![
            RenderedFile::text(
                c_source::header_file_name(name),
                c_source::render_header(name, shift_codes, config),
            ),
            RenderedFile::text(
                c_source::source_file_name(name),
                c_source::render_source(name, table, config),
            ),
        ],
        EmitFormat::Rust => vec![RenderedFile::text(
            format!("{}_map.rs", identifier(name)),
            rust_source::render_module(name, table, shift_codes, config),
        )],
        EmitFormat::Json => vec![RenderedFile {
            file_name: format!("{}_map.json", identifier(name)),
            contents: document::render_json(name, table, shift_codes)?,
        }],
        EmitFormat::Bin => vec![RenderedFile {
            file_name: format!("{}_map.bin", identifier(name)),
            contents: table.as_bytes().to_vec(),
        }],
    };
    Ok(files)
}

/// Render and write into `out_dir` (created if missing). Returns the written paths.
///
/// # Errors
/// Returns an error if rendering fails or a file cannot be written.
///
/// # Example
/// ```no_run
/// use std::path::Path;
/// use tc_core::config::EmitConfig;
/// use tc_core::variant::us_tty;
/// let variant = us_tty().unwrap();
/// let table = variant.build().unwrap();
/// let written = tc_export::emit(&variant, &table, &EmitConfig::default(), Path::new("out")).unwrap();
/// assert_eq!(written.len(), 2);
/// ```
pub fn emit(
    variant: &CodeVariant,
    table: &PackedTable,
    config: &EmitConfig,
    out_dir: &Path,
) -> Result<Vec<PathBuf>> {
    write_files(&render(variant, table, config)?, out_dir)
}

/// Write already rendered files into `out_dir` (created if missing).
///
/// # Errors
/// Returns an error if the directory or a file cannot be written.
pub fn write_files(files: &[RenderedFile], out_dir: &Path) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("Impossible de créer {}", out_dir.display()))?;

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let path = out_dir.join(&file.file_name);
        std::fs::write(&path, &file.contents)
            .with_context(|| format!("Impossible d'écrire {}", path.display()))?;
        log::info!("{} écrit ({} octets)", path.display(), file.contents.len());
        written.push(path);
    }
    Ok(written)
}

/// Name usable as a C / Rust identifier: anything outside `[A-Za-z0-9_]` becomes `_`.
#[must_use]
pub fn identifier(name: &str) -> String {
    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    if ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

/// First letter upper case, the rest lower case (`ustty` → `Ustty`).
#[must_use]
pub fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Split values into rows of `per_line`, each row joined with `", "`.
pub(crate) fn rows<'a>(
    bytes: &'a [u8],
    per_line: usize,
    fmt: impl Fn(u8) -> String + 'a,
) -> impl Iterator<Item = String> + 'a {
    bytes.chunks(per_line.max(1)).map(move |row| {
        row.iter()
            .map(|&b| fmt(b))
            .collect::<Vec<_>>()
            .join(", ")
    })
}
