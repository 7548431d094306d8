//! Variantes de code : un nom, des options de table et les trois maps.
//!
//! Signals are written as five tokens in transmission order, `#` for a marking
//! impulse and ` ` for a spacing one. Start/stop bits are not included.

use crate::error::CodeError;
use crate::symbols::{ShiftState, Symbol, SymbolMap};
use crate::table::{BuildOptions, PackedTable, build_table_with};

/// Name prefix of the built-in variant.
pub const USTTY_NAME: &str = "ustty";

/// US TTY, letters shift.
pub const USTTY_LETTERS: &[(char, &str)] = &[
    ('a', "##   "),
    ('b', "#  ##"),
    ('c', " ### "),
    ('d', "#  # "),
    ('e', "#    "),
    ('f', "# ## "),
    ('g', " # ##"),
    ('h', "  # #"),
    ('i', " ##  "),
    ('j', "## # "),
    ('k', "#### "),
    ('l', " #  #"),
    ('m', "  ###"),
    ('n', "  ## "),
    ('o', "   ##"),
    ('p', " ## #"),
    ('q', "### #"),
    ('r', " # # "),
    ('s', "# #  "),
    ('t', "    #"),
    ('u', "###  "),
    ('v', " ####"),
    ('w', "##  #"),
    ('x', "# ###"),
    ('y', "# # #"),
    ('z', "#   #"),
];

/// US TTY, figures shift. BEL shares the `s` signal.
pub const USTTY_FIGURES: &[(char, &str)] = &[
    ('-', "##   "),
    ('?', "#  ##"),
    (':', " ### "),
    ('$', "#  # "),
    ('3', "#    "),
    ('!', "# ## "),
    ('&', " # ##"),
    ('#', "  # #"),
    ('8', " ##  "),
    ('\'', "## # "),
    ('(', "#### "),
    (')', " #  #"),
    ('*', "  ###"),
    (',', "  ## "),
    ('9', "   ##"),
    ('0', " ## #"),
    ('1', "### #"),
    ('4', " # # "),
    ('\x07', "# #  "),
    ('5', "    #"),
    ('7', "###  "),
    (';', " ####"),
    ('2', "##  #"),
    ('/', "# ###"),
    ('6', "# # #"),
    ('"', "#   #"),
];

/// US TTY, valid in either shift state.
pub const USTTY_BOTH: &[(Symbol, &str)] = &[
    (Symbol::Char('\0'), "     "),
    (Symbol::Char('\n'), " #   "),
    (Symbol::Char(' '), "  #  "),
    (Symbol::Char('\r'), "   # "),
    (Symbol::Char('['), "## ##"),
    (Symbol::Char(']'), "#####"),
    (Symbol::Shift(ShiftState::Figures), "## ##"),
    (Symbol::Shift(ShiftState::Letters), "#####"),
];

/// A named code variant: everything needed to build one packed table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CodeVariant {
    /// Name prefix handed to emitters (`ustty` → `ustty_map`).
    pub name: String,
    pub options: BuildOptions,
    pub letters: SymbolMap,
    pub figures: SymbolMap,
    pub both: SymbolMap,
}

impl CodeVariant {
    /// Variante vide : une table de sentinelles.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            options: BuildOptions::default(),
            letters: SymbolMap::new(),
            figures: SymbolMap::new(),
            both: SymbolMap::new(),
        }
    }

    /// # Errors
    /// See [`build_table_with`].
    pub fn build(&self) -> Result<PackedTable, CodeError> {
        let table = build_table_with(&self.options, &self.letters, &self.figures, &self.both)?;
        log::info!(
            "Table {} construite : {}/{} codes mappés",
            self.name,
            table.mapped_count(),
            table.len()
        );
        Ok(table)
    }
}

/// The built-in US TTY variant.
///
/// # Errors
/// Only if the constant tables above are malformed.
///
/// # Example
/// ```
/// use tc_core::variant::us_tty;
/// let table = us_tty().unwrap().build().unwrap();
/// assert_eq!(table.as_bytes()[b'\n' as usize], 0x62);
/// ```
pub fn us_tty() -> Result<CodeVariant, CodeError> {
    Ok(CodeVariant {
        name: USTTY_NAME.to_string(),
        options: BuildOptions::default(),
        letters: SymbolMap::from_chars(USTTY_LETTERS)?,
        figures: SymbolMap::from_chars(USTTY_FIGURES)?,
        both: SymbolMap::from_pairs(USTTY_BOTH)?,
    })
}
