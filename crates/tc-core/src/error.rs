use thiserror::Error;

use crate::symbols::MapKind;

/// Errors raised while parsing signals or building a packed table.
///
/// Every variant is fatal: a build that hits one returns no table at all.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CodeError {
    /// A signal string does not hold exactly five impulses.
    #[error("Signal invalide : {len} impulsions au lieu de 5")]
    InvalidImpulseLength {
        /// Number of impulses found.
        len: usize,
    },

    /// An impulse is neither mark (`#`) nor space (` `).
    #[error("Impulsion {position} invalide : {symbol:?} (attendu '#' ou ' ')")]
    InvalidImpulseSymbol {
        /// The offending token.
        symbol: char,
        /// Impulse number, 1-based, in transmission order.
        position: usize,
    },

    /// A code is listed in both single-state maps without a both-state entry.
    #[error(
        "Code {code:#04x} présent dans letters et figures sans entrée both : ambiguïté de shift"
    )]
    DuplicateMappingAmbiguity {
        /// Character code mapped twice.
        code: u32,
    },

    /// Two symbols of the same map resolve to one character code.
    #[error("Collision sur le code {code:#04x} dans la table {map}")]
    CodeCollision {
        /// Character code claimed twice.
        code: u32,
        /// Map holding both symbols.
        map: MapKind,
    },

    /// A character code does not fit in the table.
    #[error("Code {code:#x} hors de la table ({width} entrées)")]
    CharacterOutOfRange {
        /// Character code.
        code: u32,
        /// Table width.
        width: usize,
    },

    /// Invalid variant configuration value.
    #[error("Configuration invalide : {0}")]
    Config(String),
}
