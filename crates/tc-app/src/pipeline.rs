use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tc_core::config::{self, EmitConfig, VariantConfig};
use tc_core::table::{PackedTable, build_tables};
use tc_core::variant::{CodeVariant, us_tty};
use tc_export::RenderedFile;

use crate::cli::Overrides;

/// Load every variant file, or the built-in US TTY variant when none is given,
/// then apply the CLI overrides.
///
/// # Errors
/// Returns an error if a file cannot be loaded or an override is invalid.
pub fn resolve_variants(paths: &[PathBuf], overrides: &Overrides) -> Result<Vec<VariantConfig>> {
    let mut configs = if paths.is_empty() {
        log::info!("Aucune variante fournie, utilisation de la table US TTY intégrée.");
        vec![VariantConfig {
            variant: us_tty()?,
            emit: EmitConfig::default(),
        }]
    } else {
        paths
            .iter()
            .map(|p| config::load_variant(p))
            .collect::<Result<Vec<_>>>()?
    };
    for config in &mut configs {
        overrides.apply(config)?;
    }
    Ok(configs)
}

/// Build every table (in parallel), then emit each into `out_dir`.
///
/// Nothing is written unless every variant builds and no two variants
/// produce the same output file name.
///
/// # Errors
/// Returns the first build or write error, tagged with the variant name, or
/// an error naming the variants whose outputs clash.
pub fn generate(configs: &[VariantConfig], out_dir: &Path, dump: bool) -> Result<Vec<PathBuf>> {
    let variants: Vec<CodeVariant> = configs.iter().map(|c| c.variant.clone()).collect();
    let tables = build_tables(&variants)
        .into_iter()
        .zip(&variants)
        .map(|(table, variant)| {
            table.with_context(|| format!("Construction de la variante {}", variant.name))
        })
        .collect::<Result<Vec<_>>>()?;

    let rendered = configs
        .iter()
        .zip(&tables)
        .map(|(config, table)| {
            tc_export::render(&config.variant, table, &config.emit)
                .with_context(|| format!("Export de la variante {}", config.variant.name))
        })
        .collect::<Result<Vec<_>>>()?;
    check_file_names(configs, &rendered)?;

    let mut written = Vec::new();
    for ((config, table), files) in configs.iter().zip(&tables).zip(&rendered) {
        if dump {
            print!("{}", dump_table(&config.variant, table));
        }
        let paths = tc_export::write_files(files, out_dir)
            .with_context(|| format!("Export de la variante {}", config.variant.name))?;
        written.extend(paths);
    }
    Ok(written)
}

/// Deux variantes ne doivent jamais écrire le même fichier.
fn check_file_names(configs: &[VariantConfig], rendered: &[Vec<RenderedFile>]) -> Result<()> {
    let mut owners: HashMap<&str, &str> = HashMap::new();
    for (config, files) in configs.iter().zip(rendered) {
        let name = config.variant.name.as_str();
        for file in files {
            if let Some(first) = owners.insert(file.file_name.as_str(), name) {
                anyhow::bail!(
                    "Les variantes '{first}' et '{name}' écrivent toutes deux {}",
                    file.file_name
                );
            }
        }
    }
    Ok(())
}

/// Table lisible des codes mappés.
#[must_use]
pub fn dump_table(variant: &CodeVariant, table: &PackedTable) -> String {
    let mut out = format!(
        "{} — {}\ncode  char   entry  FIG  LET  signal\n",
        variant.name, variant.options
    );
    for (code, entry) in table.iter().enumerate() {
        let Some(signal) = entry.signal() else {
            continue;
        };
        let ch = char::from_u32(code as u32).map_or_else(String::new, |c| {
            c.escape_debug().to_string()
        });
        out.push_str(&format!(
            "{code:#04x}  {ch:<6} {entry}   {}    {}   \"{signal}\"\n",
            mark(entry.figures()),
            mark(entry.letters()),
        ));
    }
    out.push_str(&format!(
        "{} / {} codes mappés\n",
        table.mapped_count(),
        table.len()
    ));
    out
}

fn mark(flag: bool) -> char {
    if flag { 'x' } else { '.' }
}
