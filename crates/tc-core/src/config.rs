use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::error::CodeError;
use crate::signal::Signal;
use crate::symbols::{ShiftState, Symbol, SymbolMap};
use crate::table::TableWidth;
use crate::variant::CodeVariant;

/// Output format of the emitter.
///
/// # Example
/// ```
/// use tc_core::config::EmitFormat;
/// assert_eq!("rust".parse::<EmitFormat>().unwrap(), EmitFormat::Rust);
/// assert!(matches!(EmitFormat::default(), EmitFormat::C));
/// ```
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EmitFormat {
    /// Source C + header avec include guard.
    #[default]
    C,
    /// Module Rust avec un `pub const`.
    Rust,
    /// Document JSON.
    Json,
    /// Octets bruts, un par code.
    Bin,
}

impl FromStr for EmitFormat {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "c" => Ok(Self::C),
            "rust" | "rs" => Ok(Self::Rust),
            "json" => Ok(Self::Json),
            "bin" | "raw" => Ok(Self::Bin),
            other => Err(CodeError::Config(format!(
                "format inconnu '{other}' (c, rust, json, bin)"
            ))),
        }
    }
}

impl fmt::Display for EmitFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::C => "c",
            Self::Rust => "rust",
            Self::Json => "json",
            Self::Bin => "bin",
        })
    }
}

/// Emitter settings. Chaque champ a une valeur par défaut saine.
///
/// # Example
/// ```
/// use tc_core::config::EmitConfig;
/// let config = EmitConfig::default();
/// assert_eq!(config.per_line, 8);
/// assert_eq!(config.storage, "const unsigned char");
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct EmitConfig {
    pub format: EmitFormat,
    /// C element type, qualifiers included (`prog_uchar` on AVR).
    pub storage: String,
    /// Headers pulled in by both the C source and header, without angle brackets.
    pub includes: Vec<String>,
    /// Values per line in source outputs [1, 32].
    pub per_line: usize,
}

impl Default for EmitConfig {
    fn default() -> Self {
        Self {
            format: EmitFormat::C,
            storage: "const unsigned char".to_string(),
            includes: Vec::new(),
            per_line: 8,
        }
    }
}

impl EmitConfig {
    /// Clamp numeric fields to their valid ranges.
    pub fn clamp_all(&mut self) {
        self.per_line = self.per_line.clamp(1, 32);
    }
}

/// A variant plus how to emit it: the content of one TOML file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VariantConfig {
    pub variant: CodeVariant,
    pub emit: EmitConfig,
}

/// Structure TOML intermédiaire, tous les champs optionnels.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct VariantFile {
    name: Option<String>,
    width: Option<usize>,
    shift_codes: Option<ShiftCodesSection>,
    letters: Option<BTreeMap<String, String>>,
    figures: Option<BTreeMap<String, String>>,
    both: Option<BTreeMap<String, String>>,
    shift: Option<ShiftSection>,
    emit: Option<EmitSection>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ShiftCodesSection {
    figures: Option<u8>,
    letters: Option<u8>,
}

/// Signals of the two shift controls, placed in the both-state map.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ShiftSection {
    figures: Option<String>,
    letters: Option<String>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct EmitSection {
    format: Option<EmitFormat>,
    storage: Option<String>,
    includes: Option<Vec<String>>,
    per_line: Option<usize>,
}

/// Charge un fichier TOML de variante.
///
/// The variant name defaults to the file stem.
///
/// # Errors
/// Returns an error if the file cannot be read, parsed, or holds invalid keys or signals.
///
/// # Example
/// ```no_run
/// use tc_core::config::load_variant;
/// use std::path::Path;
/// let config = load_variant(Path::new("config/ustty.toml")).unwrap();
/// assert_eq!(config.variant.name, "ustty");
/// ```
pub fn load_variant(path: &Path) -> Result<VariantConfig> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Impossible de lire {}", path.display()))?;
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("table");
    parse_variant(&content, stem).with_context(|| format!("Variante invalide : {}", path.display()))
}

/// Parse a variant from TOML text. `default_name` is used when the file has no `name`.
///
/// # Errors
/// Returns an error on TOML syntax errors, unknown fields, multi-character keys,
/// malformed signals, or an unsupported width.
///
/// # Example
/// ```
/// use tc_core::config::parse_variant;
/// let config = parse_variant("[letters]\na = \"##   \"\n", "demo").unwrap();
/// assert_eq!(config.variant.name, "demo");
/// assert_eq!(config.variant.letters.len(), 1);
/// ```
pub fn parse_variant(content: &str, default_name: &str) -> Result<VariantConfig> {
    let file: VariantFile = toml::from_str(content).context("Erreur de parsing TOML")?;

    let mut variant = CodeVariant::empty(file.name.unwrap_or_else(|| default_name.to_string()));
    if variant.name.is_empty() {
        return Err(CodeError::Config("nom de variante vide".into()).into());
    }

    if let Some(w) = file.width {
        variant.options.width = TableWidth::from_len(w)?;
    }
    if let Some(s) = file.shift_codes {
        if let Some(v) = s.figures {
            variant.options.shift_codes.figures = v;
        }
        if let Some(v) = s.letters {
            variant.options.shift_codes.letters = v;
        }
    }
    if let Some(m) = file.letters {
        variant.letters = char_map(&m).context("Section [letters]")?;
    }
    if let Some(m) = file.figures {
        variant.figures = char_map(&m).context("Section [figures]")?;
    }
    if let Some(m) = file.both {
        variant.both = char_map(&m).context("Section [both]")?;
    }
    if let Some(s) = file.shift {
        if let Some(v) = s.figures {
            let signal = v.parse::<Signal>().context("Signal [shift].figures")?;
            variant
                .both
                .insert(Symbol::Shift(ShiftState::Figures), signal);
        }
        if let Some(v) = s.letters {
            let signal = v.parse::<Signal>().context("Signal [shift].letters")?;
            variant
                .both
                .insert(Symbol::Shift(ShiftState::Letters), signal);
        }
    }

    let mut emit = EmitConfig::default();
    if let Some(e) = file.emit {
        if let Some(v) = e.format {
            emit.format = v;
        }
        if let Some(v) = e.storage {
            emit.storage = v;
        }
        if let Some(v) = e.includes {
            emit.includes = v;
        }
        if let Some(v) = e.per_line {
            emit.per_line = v;
        }
    }
    emit.clamp_all();

    Ok(VariantConfig { variant, emit })
}

fn char_map(section: &BTreeMap<String, String>) -> Result<SymbolMap, CodeError> {
    let mut map = SymbolMap::new();
    for (key, text) in section {
        let mut chars = key.chars();
        let (Some(c), None) = (chars.next(), chars.next()) else {
            return Err(CodeError::Config(format!(
                "clé {key:?} : un seul caractère attendu"
            )));
        };
        map.insert(Symbol::Char(c), Signal::parse_str(text)?);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::BuildOptions;
    use crate::variant::us_tty;

    const USTTY_TOML: &str = include_str!("../../../config/ustty.toml");

    #[test]
    fn bundled_ustty_matches_builtin() {
        let config = parse_variant(USTTY_TOML, "x").unwrap();
        let builtin = us_tty().unwrap();
        assert_eq!(config.variant, builtin);
        assert_eq!(
            config.variant.build().unwrap(),
            builtin.build().unwrap()
        );
        assert_eq!(config.emit.storage, "prog_uchar");
        assert_eq!(config.emit.includes, vec!["avr/pgmspace.h".to_string()]);
    }

    #[test]
    fn missing_sections_fall_back_to_defaults() {
        let config = parse_variant("", "blank").unwrap();
        assert_eq!(config.variant.name, "blank");
        assert!(config.variant.letters.is_empty());
        assert_eq!(config.variant.options, BuildOptions::default());
        assert_eq!(config.emit, EmitConfig::default());
    }

    #[test]
    fn width_and_shift_codes_override() {
        let config = parse_variant(
            "width = 256\n[shift_codes]\nfigures = 0x0E\n[shift]\nfigures = \"## ##\"\n",
            "x",
        )
        .unwrap();
        let options = config.variant.options;
        assert_eq!(options.width, TableWidth::Byte);
        assert_eq!(options.shift_codes.figures, 0x0E);
        assert_eq!(options.shift_codes.letters, 0x12);
        let table = config.variant.build().unwrap();
        assert_eq!(table.as_bytes()[0x0E], 0x7B);
    }

    #[test]
    fn rejects_multichar_key() {
        let err = parse_variant("[letters]\nab = \"##   \"\n", "x").unwrap_err();
        assert!(format!("{err:#}").contains("un seul caractère"));
    }

    #[test]
    fn rejects_bad_signal() {
        let err = parse_variant("[figures]\n\"-\" = \"##-  \"\n", "x").unwrap_err();
        let root = err.root_cause().downcast_ref::<CodeError>();
        assert_eq!(
            root,
            Some(&CodeError::InvalidImpulseSymbol {
                symbol: '-',
                position: 3
            })
        );
    }

    #[test]
    fn rejects_bad_width() {
        assert!(parse_variant("width = 100\n", "x").is_err());
    }

    #[test]
    fn rejects_unknown_field() {
        assert!(parse_variant("colour = \"red\"\n", "x").is_err());
    }

    #[test]
    fn per_line_is_clamped() {
        let config = parse_variant("[emit]\nper_line = 0\n", "x").unwrap();
        assert_eq!(config.emit.per_line, 1);
        let config = parse_variant("[emit]\nper_line = 500\nformat = \"json\"\n", "x").unwrap();
        assert_eq!(config.emit.per_line, 32);
        assert_eq!(config.emit.format, EmitFormat::Json);
    }

    #[test]
    fn load_variant_uses_file_stem() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("murray.toml");
        std::fs::write(&path, "[letters]\ne = \"#    \"\n").unwrap();
        let config = load_variant(&path).unwrap();
        assert_eq!(config.variant.name, "murray");
    }

    #[test]
    fn load_variant_missing_file() {
        assert!(load_variant(Path::new("/nonexistent/variant.toml")).is_err());
    }

    #[test]
    fn format_parsing() {
        assert_eq!("C".parse::<EmitFormat>().unwrap(), EmitFormat::C);
        assert_eq!("raw".parse::<EmitFormat>().unwrap(), EmitFormat::Bin);
        assert!("xml".parse::<EmitFormat>().is_err());
    }
}
