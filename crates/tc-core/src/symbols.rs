use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::CodeError;
use crate::signal::Signal;

/// Receiver-side mode selecting which symbol set a code stands for.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum ShiftState {
    Letters,
    Figures,
}

/// Key of a symbol map: a literal character, or one of the two shift controls.
///
/// Shift controls have no character of their own; they are placed in the
/// table at the codes given by [`ShiftCodes`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Symbol {
    Char(char),
    Shift(ShiftState),
}

impl Symbol {
    /// Character code this symbol occupies in the table.
    #[must_use]
    pub fn code(self, shift_codes: &ShiftCodes) -> u32 {
        match self {
            Self::Char(c) => u32::from(c),
            Self::Shift(state) => u32::from(shift_codes.code_of(state)),
        }
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Char(c) => write!(f, "{}", c.escape_debug()),
            Self::Shift(ShiftState::Figures) => f.write_str("<FIGS>"),
            Self::Shift(ShiftState::Letters) => f.write_str("<LTRS>"),
        }
    }
}

/// Codes the shift controls are shoehorned into.
///
/// Par défaut : les codes device-control peu utilisés, DC1 pour figures, DC2 pour letters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ShiftCodes {
    pub figures: u8,
    pub letters: u8,
}

impl ShiftCodes {
    #[must_use]
    pub const fn code_of(&self, state: ShiftState) -> u8 {
        match state {
            ShiftState::Figures => self.figures,
            ShiftState::Letters => self.letters,
        }
    }
}

impl Default for ShiftCodes {
    fn default() -> Self {
        Self {
            figures: 0x11,
            letters: 0x12,
        }
    }
}

/// Which of the three per-state maps a symbol comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MapKind {
    /// Valid only in letters shift.
    Letters,
    /// Valid only in figures shift.
    Figures,
    /// Valid in either shift state.
    Both,
}

impl MapKind {
    /// `(figures, letters)` flags written for entries of this map.
    #[must_use]
    pub const fn flags(self) -> (bool, bool) {
        match self {
            Self::Letters => (false, true),
            Self::Figures => (true, false),
            Self::Both => (true, true),
        }
    }
}

impl fmt::Display for MapKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Letters => "letters",
            Self::Figures => "figures",
            Self::Both => "both",
        })
    }
}

/// Symbol → signal mapping for one shift state. Keys are unique.
///
/// # Example
/// ```
/// use tc_core::symbols::{Symbol, SymbolMap};
/// let map = SymbolMap::from_chars(&[('a', "##   "), ('e', "#    ")]).unwrap();
/// assert_eq!(map.len(), 2);
/// assert_eq!(map.get(Symbol::Char('e')).unwrap().fold(), 0x01);
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SymbolMap {
    entries: BTreeMap<Symbol, Signal>,
}

impl SymbolMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse `(symbol, signal string)` pairs.
    ///
    /// # Errors
    /// Fails on the first malformed signal string, or on a symbol listed twice.
    pub fn from_pairs(pairs: &[(Symbol, &str)]) -> Result<Self, CodeError> {
        let mut map = Self::new();
        for &(symbol, text) in pairs {
            let signal = Signal::parse_str(text)?;
            if map.insert(symbol, signal).is_some() {
                return Err(CodeError::Config(format!("symbole {symbol} défini deux fois")));
            }
        }
        Ok(map)
    }

    /// Same as [`SymbolMap::from_pairs`] for plain characters.
    ///
    /// # Errors
    /// See [`SymbolMap::from_pairs`].
    pub fn from_chars(pairs: &[(char, &str)]) -> Result<Self, CodeError> {
        let pairs: Vec<(Symbol, &str)> = pairs
            .iter()
            .map(|&(c, text)| (Symbol::Char(c), text))
            .collect();
        Self::from_pairs(&pairs)
    }

    /// Insert or replace, returning the previous signal.
    pub fn insert(&mut self, symbol: Symbol, signal: Signal) -> Option<Signal> {
        self.entries.insert(symbol, signal)
    }

    #[must_use]
    pub fn get(&self, symbol: Symbol) -> Option<&Signal> {
        self.entries.get(&symbol)
    }

    #[must_use]
    pub fn contains(&self, symbol: Symbol) -> bool {
        self.entries.contains_key(&symbol)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &Signal)> {
        self.entries.iter().map(|(symbol, signal)| (*symbol, signal))
    }
}

impl FromIterator<(Symbol, Signal)> for SymbolMap {
    fn from_iter<I: IntoIterator<Item = (Symbol, Signal)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
