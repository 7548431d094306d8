use std::collections::BTreeMap;
use std::fmt;

use rayon::prelude::*;

use crate::error::CodeError;
use crate::signal::{NO_MAPPING, PackedEntry, Signal, encode};
use crate::symbols::{MapKind, ShiftCodes, SymbolMap};
use crate::variant::CodeVariant;

/// Number of character codes covered by a packed table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TableWidth {
    /// 7-bit ASCII, codes 0..=127.
    #[default]
    Ascii,
    /// Full byte range, codes 0..=255.
    Byte,
}

impl TableWidth {
    #[must_use]
    pub const fn len(self) -> usize {
        match self {
            Self::Ascii => 128,
            Self::Byte => 256,
        }
    }

    /// # Errors
    /// Returns [`CodeError::Config`] for anything other than 128 or 256.
    pub fn from_len(len: usize) -> Result<Self, CodeError> {
        match len {
            128 => Ok(Self::Ascii),
            256 => Ok(Self::Byte),
            other => Err(CodeError::Config(format!(
                "largeur de table {other} non supportée (128 ou 256)"
            ))),
        }
    }
}

/// Everything besides the three maps that shapes a table.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BuildOptions {
    pub width: TableWidth,
    pub shift_codes: ShiftCodes,
}

impl fmt::Display for BuildOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} entrées, FIGS={:#04x}, LTRS={:#04x}",
            self.width.len(),
            self.shift_codes.figures,
            self.shift_codes.letters
        )
    }
}

/// Flat character-code → packed-signal lookup table.
///
/// Index = character code. Immutable once built.
///
/// # Example
/// ```
/// use tc_core::symbols::SymbolMap;
/// use tc_core::table::build_table;
/// let letters = SymbolMap::from_chars(&[('a', "##   ")]).unwrap();
/// let table = build_table(&letters, &SymbolMap::new(), &SymbolMap::new()).unwrap();
/// assert_eq!(table.as_bytes()[usize::from(b'a')], 0x23);
/// assert_eq!(table.as_bytes()[1], 0x80);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PackedTable {
    entries: Box<[u8]>,
}

impl PackedTable {
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`: a table covers at least 128 codes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn as_bytes(&self) -> &[u8] {
        &self.entries
    }

    /// Lookup O(1). Codes past the table width read as the sentinel.
    #[inline]
    #[must_use]
    pub fn entry(&self, code: u8) -> PackedEntry {
        self.entries
            .get(usize::from(code))
            .map_or(PackedEntry::UNMAPPED, |&raw| PackedEntry::new(raw))
    }

    pub fn iter(&self) -> impl Iterator<Item = PackedEntry> + '_ {
        self.entries.iter().map(|&raw| PackedEntry::new(raw))
    }

    /// Number of codes holding a signal.
    #[must_use]
    pub fn mapped_count(&self) -> usize {
        self.iter().filter(|e| e.is_mapped()).count()
    }
}

/// Build a 128-entry table with the default shift codes (DC1 / DC2).
///
/// # Errors
/// See [`build_table_with`].
pub fn build_table(
    letters: &SymbolMap,
    figures: &SymbolMap,
    both: &SymbolMap,
) -> Result<PackedTable, CodeError> {
    build_table_with(&BuildOptions::default(), letters, figures, both)
}

/// Build a packed table from the three per-state maps.
///
/// Les maps sont appliquées dans l'ordre letters → figures → both ; both écrase
/// toute valeur précédente. Tout code non couvert garde la sentinelle 0x80.
///
/// # Errors
/// - [`CodeError::CharacterOutOfRange`] if a symbol's code does not fit the width.
/// - [`CodeError::CodeCollision`] if two symbols of one map share a code.
/// - [`CodeError::DuplicateMappingAmbiguity`] if a code is in both letters and
///   figures without a both-state entry.
pub fn build_table_with(
    options: &BuildOptions,
    letters: &SymbolMap,
    figures: &SymbolMap,
    both: &SymbolMap,
) -> Result<PackedTable, CodeError> {
    let letters = resolve(letters, MapKind::Letters, options)?;
    let figures = resolve(figures, MapKind::Figures, options)?;
    let both = resolve(both, MapKind::Both, options)?;
    check_overlaps(&letters, &figures, &both)?;

    let mut entries = vec![NO_MAPPING; options.width.len()].into_boxed_slice();
    for (kind, codes) in [
        (MapKind::Letters, &letters),
        (MapKind::Figures, &figures),
        (MapKind::Both, &both),
    ] {
        let (fig, ltr) = kind.flags();
        for (&code, signal) in codes {
            entries[code] = encode(signal, fig, ltr);
        }
    }

    Ok(PackedTable { entries })
}

/// Build tables for several variants in parallel. Output order follows input order.
#[must_use]
pub fn build_tables(variants: &[CodeVariant]) -> Vec<Result<PackedTable, CodeError>> {
    variants.par_iter().map(CodeVariant::build).collect()
}

/// Resolve symbols to table indices.
fn resolve(
    map: &SymbolMap,
    kind: MapKind,
    options: &BuildOptions,
) -> Result<BTreeMap<usize, Signal>, CodeError> {
    let width = options.width.len();
    let mut codes = BTreeMap::new();
    for (symbol, signal) in map.iter() {
        let code = symbol.code(&options.shift_codes);
        let index = usize::try_from(code)
            .ok()
            .filter(|&i| i < width)
            .ok_or(CodeError::CharacterOutOfRange { code, width })?;
        if codes.insert(index, *signal).is_some() {
            return Err(CodeError::CodeCollision { code, map: kind });
        }
    }
    Ok(codes)
}

fn check_overlaps(
    letters: &BTreeMap<usize, Signal>,
    figures: &BTreeMap<usize, Signal>,
    both: &BTreeMap<usize, Signal>,
) -> Result<(), CodeError> {
    for &code in letters.keys() {
        if figures.contains_key(&code) && !both.contains_key(&code) {
            return Err(CodeError::DuplicateMappingAmbiguity { code: code as u32 });
        }
    }
    for (kind, codes) in [(MapKind::Letters, letters), (MapKind::Figures, figures)] {
        for code in codes.keys().filter(|code| both.contains_key(code)) {
            log::debug!("Code {code:#04x} de {kind} remplacé par l'entrée both");
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::symbols::{ShiftState, Symbol};
    use crate::variant::us_tty;

    fn ustty_table() -> PackedTable {
        us_tty().unwrap().build().unwrap()
    }

    #[test]
    fn unmapped_codes_hold_sentinel() {
        let table = ustty_table();
        assert_eq!(table.len(), 128);
        assert_eq!(table.as_bytes()[1], 0x80);
        assert_eq!(table.as_bytes()[usize::from(b'A')], 0x80);
        assert_eq!(table.as_bytes()[0x7F], 0x80);
    }

    #[test]
    fn newline_is_valid_in_both_states() {
        assert_eq!(ustty_table().as_bytes()[usize::from(b'\n')], 0x62);
    }

    #[test]
    fn shift_controls_land_on_dc1_dc2() {
        let table = ustty_table();
        assert_eq!(table.as_bytes()[0x11], 0x7B);
        assert_eq!(table.as_bytes()[0x12], 0x7F);
    }

    #[test]
    fn single_state_entries_carry_one_flag_and_the_folded_signal() {
        let variant = us_tty().unwrap();
        let table = variant.build().unwrap();
        for (map, figures) in [(&variant.letters, false), (&variant.figures, true)] {
            for (symbol, signal) in map.iter() {
                let Symbol::Char(c) = symbol else {
                    continue;
                };
                let entry = table.entry(c as u8);
                assert!(entry.is_mapped(), "{symbol} non mappé");
                assert_eq!(entry.figures(), figures, "{symbol}");
                assert_eq!(entry.letters(), !figures, "{symbol}");
                assert_eq!(entry.raw() & 0x1F, signal.fold(), "{symbol}");
                assert_eq!(entry.signal(), Some(*signal), "{symbol}");
            }
        }
    }

    #[test]
    fn both_state_entries_carry_both_flags_and_the_folded_signal() {
        let variant = us_tty().unwrap();
        let table = variant.build().unwrap();
        assert_eq!(variant.both.len(), 8);
        for (symbol, signal) in variant.both.iter() {
            let code = symbol.code(&variant.options.shift_codes) as u8;
            let entry = table.entry(code);
            assert!(entry.is_mapped(), "{symbol} non mappé");
            assert!(entry.figures() && entry.letters(), "{symbol}");
            assert_eq!(entry.raw() & 0x60, 0x60, "{symbol}");
            assert_eq!(entry.raw() & 0x1F, signal.fold(), "{symbol}");
            assert_eq!(entry.signal(), Some(*signal), "{symbol}");
        }
    }

    #[test]
    fn every_entry_is_well_formed() {
        assert!(ustty_table().iter().all(PackedEntry::is_well_formed));
    }

    #[test]
    fn build_is_idempotent() {
        assert_eq!(ustty_table().as_bytes(), ustty_table().as_bytes());
    }

    #[test]
    fn both_map_overrides_single_state_entry() {
        let letters = SymbolMap::from_chars(&[(' ', "#    ")]).unwrap();
        let both = SymbolMap::from_chars(&[(' ', "  #  ")]).unwrap();
        let table = build_table(&letters, &SymbolMap::new(), &both).unwrap();
        assert_eq!(table.as_bytes()[usize::from(b' ')], 0x64);
    }

    #[test]
    fn letters_figures_overlap_without_both_is_rejected() {
        let letters = SymbolMap::from_chars(&[('x', "# ###")]).unwrap();
        let figures = SymbolMap::from_chars(&[('x', "# ###")]).unwrap();
        let err = build_table(&letters, &figures, &SymbolMap::new()).unwrap_err();
        assert_eq!(
            err,
            CodeError::DuplicateMappingAmbiguity {
                code: u32::from(b'x')
            }
        );
    }

    #[test]
    fn letters_figures_overlap_resolved_by_both() {
        let letters = SymbolMap::from_chars(&[('x', "# ###")]).unwrap();
        let figures = SymbolMap::from_chars(&[('x', "# ###")]).unwrap();
        let both = SymbolMap::from_chars(&[('x', "# ###")]).unwrap();
        let table = build_table(&letters, &figures, &both).unwrap();
        assert_eq!(table.as_bytes()[usize::from(b'x')], 0x7D);
    }

    #[test]
    fn shift_code_colliding_with_char_is_rejected() {
        let mut both = SymbolMap::from_chars(&[('\u{11}', "     ")]).unwrap();
        both.insert(
            Symbol::Shift(ShiftState::Figures),
            Signal::parse_str("## ##").unwrap(),
        );
        let err = build_table(&SymbolMap::new(), &SymbolMap::new(), &both).unwrap_err();
        assert_eq!(
            err,
            CodeError::CodeCollision {
                code: 0x11,
                map: MapKind::Both
            }
        );
    }

    #[test]
    fn out_of_range_character_is_rejected() {
        let letters = SymbolMap::from_chars(&[('é', "##   ")]).unwrap();
        let err = build_table(&letters, &SymbolMap::new(), &SymbolMap::new()).unwrap_err();
        assert_eq!(
            err,
            CodeError::CharacterOutOfRange {
                code: 0xE9,
                width: 128
            }
        );
    }

    #[test]
    fn byte_width_accepts_latin1() {
        let options = BuildOptions {
            width: TableWidth::Byte,
            ..BuildOptions::default()
        };
        let letters = SymbolMap::from_chars(&[('é', "##   ")]).unwrap();
        let table =
            build_table_with(&options, &letters, &SymbolMap::new(), &SymbolMap::new()).unwrap();
        assert_eq!(table.len(), 256);
        assert_eq!(table.entry(0xE9).raw(), 0x23);
        assert_eq!(table.entry(0xFF).raw(), 0x80);
    }

    #[test]
    fn entry_past_width_reads_as_sentinel() {
        assert_eq!(ustty_table().entry(0xC8), PackedEntry::UNMAPPED);
    }

    #[test]
    fn options_display() {
        assert_eq!(
            BuildOptions::default().to_string(),
            "128 entrées, FIGS=0x11, LTRS=0x12"
        );
    }

    #[test]
    fn table_width_from_len() {
        assert_eq!(TableWidth::from_len(128).unwrap(), TableWidth::Ascii);
        assert_eq!(TableWidth::from_len(256).unwrap(), TableWidth::Byte);
        assert!(TableWidth::from_len(64).is_err());
    }

    #[test]
    fn parallel_build_preserves_order() {
        let ustty = us_tty().unwrap();
        let mut wide = ustty.clone();
        wide.options.width = TableWidth::Byte;
        let tables = build_tables(&[ustty, wide]);
        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].as_ref().unwrap().len(), 128);
        assert_eq!(tables[1].as_ref().unwrap().len(), 256);
        assert_eq!(
            tables[0].as_ref().unwrap().as_bytes(),
            &tables[1].as_ref().unwrap().as_bytes()[..128]
        );
    }
}
