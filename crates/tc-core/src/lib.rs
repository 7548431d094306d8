/// Teleprinter code tables for telecode.
///
/// This crate holds the signal codec, the per-shift-state symbol maps, and the
/// builder that folds them into one packed byte per character code.

pub mod config;
pub mod error;
pub mod signal;
pub mod symbols;
pub mod table;
pub mod variant;

pub use config::{EmitConfig, EmitFormat, VariantConfig};
pub use error::CodeError;
pub use signal::{PackedEntry, Signal};
pub use symbols::{ShiftCodes, ShiftState, Symbol, SymbolMap};
pub use table::{BuildOptions, PackedTable, TableWidth, build_table, build_table_with};
pub use variant::CodeVariant;
