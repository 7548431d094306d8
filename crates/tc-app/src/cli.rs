use std::path::PathBuf;

use clap::Parser;
use tc_core::config::{EmitFormat, VariantConfig};
use tc_core::table::TableWidth;

/// telecode — ASCII → 5-bit teleprinter code lookup tables.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Fichiers de variante TOML. Aucun : variante US TTY intégrée.
    pub variants: Vec<PathBuf>,

    /// Répertoire de sortie des fichiers générés.
    #[arg(short, long, default_value = ".")]
    pub out_dir: PathBuf,

    /// Format de sortie : c, rust, json, bin. Remplace [emit].format.
    #[arg(short, long)]
    pub format: Option<EmitFormat>,

    /// Préfixe de nom de la table (une seule variante).
    #[arg(long)]
    pub prefix: Option<String>,

    /// Largeur de table : 128 ou 256.
    #[arg(long)]
    pub width: Option<usize>,

    /// Afficher la table décodée sur stdout.
    #[arg(long, default_value_t = false)]
    pub dump: bool,

    /// Regénérer à chaque modification d'un fichier de variante.
    #[arg(long, default_value_t = false)]
    pub watch: bool,

    /// Niveau de log : error, warn, info, debug, trace.
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

impl Cli {
    /// Validate flag combinations.
    ///
    /// # Errors
    /// Returns an error if `--prefix` is empty or given with several variants,
    /// `--watch` without a variant file, or `--width` is not 128 or 256.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Some(ref prefix) = self.prefix {
            validate_prefix(prefix)?;
            if self.variants.len() > 1 {
                anyhow::bail!("--prefix ne s'applique qu'à une seule variante.");
            }
        }
        if self.watch && self.variants.is_empty() {
            anyhow::bail!("--watch requiert au moins un fichier de variante.");
        }
        if let Some(w) = self.width {
            TableWidth::from_len(w)?;
        }
        Ok(())
    }

    /// Command-line overrides, detached from the parser.
    #[must_use]
    pub fn overrides(&self) -> Overrides {
        Overrides {
            format: self.format,
            prefix: self.prefix.clone(),
            width: self.width,
        }
    }
}

/// CLI values that take priority over a variant file.
#[derive(Clone, Debug, Default)]
pub struct Overrides {
    pub format: Option<EmitFormat>,
    pub prefix: Option<String>,
    pub width: Option<usize>,
}

impl Overrides {
    /// # Errors
    /// Returns an error if the prefix is empty or the width override is unsupported.
    pub fn apply(&self, config: &mut VariantConfig) -> anyhow::Result<()> {
        if let Some(format) = self.format {
            config.emit.format = format;
        }
        if let Some(ref prefix) = self.prefix {
            validate_prefix(prefix)?;
            config.variant.name.clone_from(prefix);
        }
        if let Some(w) = self.width {
            config.variant.options.width = TableWidth::from_len(w)?;
        }
        Ok(())
    }
}

/// Le préfixe devient un identifiant C / Rust : il ne peut pas être vide.
fn validate_prefix(prefix: &str) -> anyhow::Result<()> {
    if tc_export::identifier(prefix.trim()).is_empty() {
        anyhow::bail!("--prefix ne peut pas être vide.");
    }
    Ok(())
}
