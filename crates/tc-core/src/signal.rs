//! Codec signal 5 impulsions <-> octet packé.
//!
//! Layout d'une entrée de table :
//! ```text
//!   MSB                                       LSB
//! +-----+-----+-----+-----+-----+-----+-----+-----+
//! | NUL | FIG | LET | IM5 | IM4 | IM3 | IM2 | IM1 |
//! +-----+-----+-----+-----+-----+-----+-----+-----+
//! ```

use std::fmt;
use std::str::FromStr;

use crate::error::CodeError;

/// Impulses per character, start/stop bits excluded.
pub const IMPULSES: usize = 5;

/// Token for a marking impulse.
pub const MARK: char = '#';

/// Token for a spacing impulse.
pub const SPACE: char = ' ';

/// Sentinel stored for character codes with no signal.
pub const NO_MAPPING: u8 = 0x80;

/// Valid while the receiver is in figures shift.
pub const FIGURES_BIT: u8 = 0x40;

/// Valid while the receiver is in letters shift.
pub const LETTERS_BIT: u8 = 0x20;

/// Bits 0..=4 : impulsions 1 à 5.
pub const SIGNAL_MASK: u8 = 0x1F;

/// One element of a transmitted character.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Impulse {
    /// Signal present (coil on).
    Mark,
    /// Signal absent.
    Space,
}

impl Impulse {
    /// Parse a `#` / ` ` token.
    #[must_use]
    pub const fn from_token(token: char) -> Option<Self> {
        match token {
            MARK => Some(Self::Mark),
            SPACE => Some(Self::Space),
            _ => None,
        }
    }

    #[must_use]
    pub const fn token(self) -> char {
        match self {
            Self::Mark => MARK,
            Self::Space => SPACE,
        }
    }
}

/// Five impulses in transmission order (impulse 1 first).
///
/// # Example
/// ```
/// use tc_core::signal::Signal;
/// let a: Signal = "##   ".parse().unwrap();
/// assert_eq!(a.fold(), 0b00011);
/// assert_eq!(a.to_string(), "##   ");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Signal([Impulse; IMPULSES]);

impl Signal {
    /// Build a signal from a slice of impulses.
    ///
    /// # Errors
    /// Returns [`CodeError::InvalidImpulseLength`] unless exactly five impulses are given.
    pub fn from_impulses(impulses: &[Impulse]) -> Result<Self, CodeError> {
        let array: [Impulse; IMPULSES] =
            impulses.try_into().map_err(|_| CodeError::InvalidImpulseLength {
                len: impulses.len(),
            })?;
        Ok(Self(array))
    }

    /// Parse a five-token signal string such as `"# ## "`.
    ///
    /// # Errors
    /// [`CodeError::InvalidImpulseLength`] if the string is not five characters long,
    /// [`CodeError::InvalidImpulseSymbol`] if a token is neither `#` nor ` `.
    pub fn parse_str(text: &str) -> Result<Self, CodeError> {
        let len = text.chars().count();
        if len != IMPULSES {
            return Err(CodeError::InvalidImpulseLength { len });
        }
        let mut impulses = [Impulse::Space; IMPULSES];
        for (i, (slot, token)) in impulses.iter_mut().zip(text.chars()).enumerate() {
            *slot = Impulse::from_token(token).ok_or(CodeError::InvalidImpulseSymbol {
                symbol: token,
                position: i + 1,
            })?;
        }
        Ok(Self(impulses))
    }

    #[must_use]
    pub const fn impulses(&self) -> [Impulse; IMPULSES] {
        self.0
    }

    /// Fold the impulses into a 5-bit integer: impulse 1 in bit 0, impulse 5 in bit 4.
    ///
    /// Scans impulse 5 first, shifting the accumulator left for each impulse.
    #[must_use]
    pub const fn fold(&self) -> u8 {
        let mut acc = 0u8;
        let mut i = IMPULSES;
        while i > 0 {
            i -= 1;
            acc <<= 1;
            if matches!(self.0[i], Impulse::Mark) {
                acc |= 1;
            }
        }
        acc
    }

    /// Inverse de [`Signal::fold`]. Les bits 5..=7 sont ignorés.
    ///
    /// # Example
    /// ```
    /// use tc_core::signal::Signal;
    /// assert_eq!(Signal::unfold(0x02).to_string(), " #   ");
    /// ```
    #[must_use]
    pub const fn unfold(bits: u8) -> Self {
        let mut impulses = [Impulse::Space; IMPULSES];
        let mut i = 0;
        while i < IMPULSES {
            if bits & (1 << i) != 0 {
                impulses[i] = Impulse::Mark;
            }
            i += 1;
        }
        Self(impulses)
    }
}

impl FromStr for Signal {
    type Err = CodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse_str(s)
    }
}

impl fmt::Display for Signal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for impulse in self.0 {
            write!(f, "{}", impulse.token())?;
        }
        Ok(())
    }
}

/// Pack a signal and its shift-state flags into one table byte.
///
/// Never sets the [`NO_MAPPING`] bit: only the table builder writes the sentinel.
///
/// # Example
/// ```
/// use tc_core::signal::{encode, Signal};
/// let a: Signal = "##   ".parse().unwrap();
/// assert_eq!(encode(&a, false, true), 0x23);
/// ```
#[inline]
#[must_use]
pub const fn encode(signal: &Signal, figures: bool, letters: bool) -> u8 {
    let mut packed = signal.fold();
    if figures {
        packed |= FIGURES_BIT;
    }
    if letters {
        packed |= LETTERS_BIT;
    }
    packed
}

/// Parse then [`encode`] a signal string.
///
/// # Errors
/// Same as [`Signal::parse_str`].
pub fn encode_str(text: &str, figures: bool, letters: bool) -> Result<u8, CodeError> {
    Signal::parse_str(text).map(|signal| encode(&signal, figures, letters))
}

/// Read-only view over one packed table byte.
///
/// # Example
/// ```
/// use tc_core::signal::PackedEntry;
/// let lf = PackedEntry::new(0x62);
/// assert!(lf.is_mapped() && lf.figures() && lf.letters());
/// assert_eq!(lf.signal().unwrap().to_string(), " #   ");
/// assert!(!PackedEntry::new(0x80).is_mapped());
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct PackedEntry(u8);

impl PackedEntry {
    pub const UNMAPPED: Self = Self(NO_MAPPING);

    #[must_use]
    pub const fn new(raw: u8) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn raw(self) -> u8 {
        self.0
    }

    #[inline]
    #[must_use]
    pub const fn is_mapped(self) -> bool {
        self.0 & NO_MAPPING == 0
    }

    #[inline]
    #[must_use]
    pub const fn figures(self) -> bool {
        self.is_mapped() && self.0 & FIGURES_BIT != 0
    }

    #[inline]
    #[must_use]
    pub const fn letters(self) -> bool {
        self.is_mapped() && self.0 & LETTERS_BIT != 0
    }

    /// The 5-bit pattern, `None` for the sentinel.
    #[must_use]
    pub const fn signal(self) -> Option<Signal> {
        if self.is_mapped() {
            Some(Signal::unfold(self.0 & SIGNAL_MASK))
        } else {
            None
        }
    }

    /// `true` if the byte is the exact sentinel, or a code valid in at least one shift state.
    #[must_use]
    pub const fn is_well_formed(self) -> bool {
        if self.is_mapped() {
            self.0 & (FIGURES_BIT | LETTERS_BIT) != 0
        } else {
            self.0 == NO_MAPPING
        }
    }
}

impl From<PackedEntry> for u8 {
    fn from(entry: PackedEntry) -> Self {
        entry.0
    }
}

impl fmt::Display for PackedEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x}", self.0)
    }
}
