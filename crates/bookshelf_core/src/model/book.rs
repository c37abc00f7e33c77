//! Book domain model.
//!
//! # Responsibility
//! - Define the canonical book record persisted by the repository layer.
//! - Provide exact fixed-point price semantics for currency values.
//!
//! # Invariants
//! - `id` is `None` until the store assigns one; stable and immutable after.
//! - `price` never passes through floating point; text round-trips exactly.
//! - `title` must contain at least one non-whitespace character to persist.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Store-assigned row identifier.
///
/// Kept as a type alias to make semantic intent explicit in signatures.
pub type BookId = i64;

/// Exact currency amount held as fixed-point minor units (two fraction
/// digits). `19.99` is stored as `1999`; arithmetic and round-trips never
/// involve floating point.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default,
)]
pub struct Price(i64);

const PRICE_SCALE: i64 = 100;
const PRICE_FRACTION_DIGITS: usize = 2;

impl Price {
    /// Zero amount.
    pub const ZERO: Price = Price(0);

    /// Builds a price from whole minor units (e.g. cents).
    pub fn from_minor_units(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// Returns the raw minor-unit value.
    pub fn minor_units(self) -> i64 {
        self.0
    }

    /// Returns whether the amount is below zero.
    pub fn is_negative(self) -> bool {
        self.0 < 0
    }
}

impl Display for Price {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let magnitude = self.0.unsigned_abs();
        let whole = magnitude / PRICE_SCALE as u64;
        let fraction = magnitude % PRICE_SCALE as u64;
        write!(f, "{sign}{whole}.{fraction:02}")
    }
}

impl FromStr for Price {
    type Err = PriceParseError;

    /// Parses canonical decimal text such as `"19.99"`, `"7"` or `"-0.50"`.
    ///
    /// At most two fraction digits are accepted; shorter fractions are
    /// right-padded (`"1.5"` == `"1.50"`). Anything else is rejected rather
    /// than rounded.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(PriceParseError::Empty);
        }

        let (negative, unsigned) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed),
        };

        let (whole_text, fraction_text) = match unsigned.split_once('.') {
            Some((whole, fraction)) => (whole, fraction),
            None => (unsigned, ""),
        };

        if whole_text.is_empty() || !whole_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PriceParseError::Malformed(trimmed.to_string()));
        }
        if !fraction_text.bytes().all(|b| b.is_ascii_digit()) {
            return Err(PriceParseError::Malformed(trimmed.to_string()));
        }
        if fraction_text.len() > PRICE_FRACTION_DIGITS {
            return Err(PriceParseError::TooManyFractionDigits(trimmed.to_string()));
        }

        let whole: i64 = whole_text
            .parse()
            .map_err(|_| PriceParseError::OutOfRange(trimmed.to_string()))?;
        let mut fraction: i64 = if fraction_text.is_empty() {
            0
        } else {
            fraction_text
                .parse()
                .map_err(|_| PriceParseError::OutOfRange(trimmed.to_string()))?
        };
        for _ in fraction_text.len()..PRICE_FRACTION_DIGITS {
            fraction *= 10;
        }

        let minor_units = whole
            .checked_mul(PRICE_SCALE)
            .and_then(|scaled| scaled.checked_add(fraction))
            .ok_or_else(|| PriceParseError::OutOfRange(trimmed.to_string()))?;

        Ok(Self(if negative { -minor_units } else { minor_units }))
    }
}

/// Rejection reasons for textual price input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PriceParseError {
    Empty,
    Malformed(String),
    TooManyFractionDigits(String),
    OutOfRange(String),
}

impl Display for PriceParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Empty => write!(f, "price text is empty"),
            Self::Malformed(text) => write!(f, "price `{text}` is not a decimal number"),
            Self::TooManyFractionDigits(text) => {
                write!(f, "price `{text}` has more than two fraction digits")
            }
            Self::OutOfRange(text) => write!(f, "price `{text}` is out of representable range"),
        }
    }
}

impl Error for PriceParseError {}

/// Canonical book record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    /// Store-assigned identifier; `None` until `create` persists the row.
    pub id: Option<BookId>,
    /// Display title.
    pub title: String,
    /// Exact currency price.
    pub price: Price,
}

impl Book {
    /// Creates an unpersisted book; the store assigns the id on create.
    pub fn new(title: impl Into<String>, price: Price) -> Self {
        Self {
            id: None,
            title: title.into(),
            price,
        }
    }

    /// Creates a book carrying an already-assigned identifier.
    ///
    /// Used by read paths and by callers preparing an update.
    pub fn with_id(id: BookId, title: impl Into<String>, price: Price) -> Self {
        Self {
            id: Some(id),
            title: title.into(),
            price,
        }
    }

    /// Checks persistence preconditions shared by all write paths.
    ///
    /// # Errors
    /// - `BlankTitle` when the title has no non-whitespace characters.
    /// - `NegativePrice` when the price is below zero.
    pub fn validate(&self) -> Result<(), BookValidationError> {
        if self.title.trim().is_empty() {
            return Err(BookValidationError::BlankTitle);
        }
        if self.price.is_negative() {
            return Err(BookValidationError::NegativePrice(self.price));
        }
        Ok(())
    }
}

/// Domain validation failures surfaced before any SQL runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BookValidationError {
    BlankTitle,
    NegativePrice(Price),
}

impl Display for BookValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankTitle => write!(f, "book title must not be blank"),
            Self::NegativePrice(price) => write!(f, "book price must not be negative, got {price}"),
        }
    }
}

impl Error for BookValidationError {}
