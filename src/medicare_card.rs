//! Medicare card numbers: an 8 digit identifier, a weighted checksum digit, an issue
//! number and an optional Individual Reference Number (IRN) printed next to each
//! cardholder's name.

use std::fmt;
use std::ops::RangeInclusive;
use std::str::FromStr;

use chrono::NaiveDate;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::error::FormatError;
use crate::str_utils::{digit_values, fixed_field, is_digits_only};

const IDENTIFIER_LENGTH: usize = 8;
const NUMBER_LENGTH: usize = 10;
const LEADING_DIGIT_RANGE: RangeInclusive<u32> = 2..=6;
const CHECKSUM_WEIGHTS: &[u32; IDENTIFIER_LENGTH] = &[1, 3, 7, 9, 1, 3, 7, 9];

/// Values used when encoding a Medicare card number in HL7 v2 messages.
pub mod hl7_v2 {
    /// e.g. PID-3.4
    pub const ASSIGNING_AUTHORITY: &str = "AUSHIC";
    /// e.g. PID-3.5
    pub const IDENTIFIER_TYPE_CODE: &str = "MC";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MedicareCardError {
    #[error("A Medicare card number must be exactly 10 digits, found {0} characters")]
    InvalidLength(usize),

    #[error("A Medicare card number must only contain numeric digits [0-9]")]
    NonDigit,

    #[error("The first digit of a Medicare card number must be between 2 and 6, found {0}")]
    InvalidLeadingDigit(u32),

    #[error("The 9th digit should be the checksum {expected}, found {found}")]
    ChecksumMismatch { expected: u32, found: u32 },

    #[error("The IRN must be a single numeric digit, found '{0}'")]
    InvalidIrn(String),
}

/// A Medicare card number, optionally qualified by the cardholder's IRN.
///
/// Construction never fails: fields that the input is too short to hold are left unset
/// and the number is reported as invalid.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "MedicareCardRecord", into = "MedicareCardRecord")]
pub struct MedicareCardNumber {
    value: String,
    identifier: Option<String>,
    checksum: Option<String>,
    issue_number: Option<String>,
    irn: Option<String>,
    expiry: Option<NaiveDate>,
    validation: Result<(), MedicareCardError>,
}

impl MedicareCardNumber {
    /// A card number without an IRN.
    pub fn new(value: impl Into<String>) -> Self {
        Self::build(value.into(), None)
    }

    /// A card number with the IRN supplied separately. A blank IRN is treated as absent.
    pub fn with_irn(value: impl Into<String>, irn: impl Into<String>) -> Self {
        let irn = irn.into();
        let irn = if irn.trim().is_empty() {
            None
        } else {
            Some(irn)
        };
        Self::build(value.into(), irn)
    }

    /// Attaches the card expiry date. It does not take part in validation.
    pub fn with_expiry(mut self, expiry: NaiveDate) -> Self {
        self.expiry = Some(expiry);
        self
    }

    fn build(value: String, irn: Option<String>) -> Self {
        let chars: Vec<char> = value.chars().collect();
        let validation = validate(&value, irn.as_deref());
        Self {
            identifier: fixed_field(&chars, 0, IDENTIFIER_LENGTH),
            checksum: fixed_field(&chars, IDENTIFIER_LENGTH, 1),
            issue_number: fixed_field(&chars, IDENTIFIER_LENGTH + 1, 1),
            value,
            irn,
            expiry: None,
            validation,
        }
    }

    /// Parses either the 10 digit card number or the 11 digit form with a trailing IRN.
    pub fn parse(raw: &str) -> Result<Self, MedicareCardError> {
        let length = raw.chars().count();
        let card = match length {
            NUMBER_LENGTH => Self::new(raw),
            11 => match raw.char_indices().nth(NUMBER_LENGTH) {
                Some((irn_start, _)) => Self::build(
                    raw[..irn_start].to_string(),
                    Some(raw[irn_start..].to_string()),
                ),
                None => return Err(MedicareCardError::InvalidLength(length)),
            },
            _ => return Err(MedicareCardError::InvalidLength(length)),
        };
        card.validation.clone().map(|_| card)
    }

    /// Validates a 10 or 11 (with IRN) digit Medicare card number.
    pub fn is_valid_str(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    pub fn is_valid(&self) -> bool {
        self.validation.is_ok()
    }

    /// The first rule the number breaks, if any.
    pub fn validation_error(&self) -> Option<&MedicareCardError> {
        self.validation.as_ref().err()
    }

    /// The 10 character card number, without the IRN.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// The first 8 digits, the first of which should be in the range 2-6.
    pub fn identifier(&self) -> Option<&str> {
        self.identifier.as_deref()
    }

    pub fn checksum(&self) -> Option<&str> {
        self.checksum.as_deref()
    }

    /// How many times the card has been issued.
    pub fn issue_number(&self) -> Option<&str> {
        self.issue_number.as_deref()
    }

    pub fn irn(&self) -> Option<&str> {
        self.irn.as_deref()
    }

    pub fn expiry(&self) -> Option<NaiveDate> {
        self.expiry
    }
}

fn validate(value: &str, irn: Option<&str>) -> Result<(), MedicareCardError> {
    let length = value.chars().count();
    if length != NUMBER_LENGTH {
        return Err(MedicareCardError::InvalidLength(length));
    }
    let digits = digit_values(value).ok_or(MedicareCardError::NonDigit)?;

    if !LEADING_DIGIT_RANGE.contains(&digits[0]) {
        return Err(MedicareCardError::InvalidLeadingDigit(digits[0]));
    }

    let expected = weighted_checksum(&digits[..IDENTIFIER_LENGTH]);
    let found = digits[IDENTIFIER_LENGTH];
    if expected != found {
        return Err(MedicareCardError::ChecksumMismatch { expected, found });
    }

    if let Some(irn) = irn {
        if irn.len() != 1 || !is_digits_only(irn) {
            return Err(MedicareCardError::InvalidIrn(irn.to_string()));
        }
    }
    Ok(())
}

fn weighted_checksum(identifier: &[u32]) -> u32 {
    identifier
        .iter()
        .zip(CHECKSUM_WEIGHTS)
        .map(|(digit, weight)| digit * weight)
        .sum::<u32>()
        % 10
}

/// Computes the checksum digit for an 8 digit card identifier whose first digit is 2-6.
pub fn checksum(identifier: &str) -> Result<u32, FormatError> {
    let length = identifier.chars().count();
    if length != IDENTIFIER_LENGTH {
        return Err(FormatError::InvalidLength {
            expected: IDENTIFIER_LENGTH,
            found: length,
        });
    }
    let digits = digit_values(identifier).ok_or(FormatError::NonDigit)?;
    if !LEADING_DIGIT_RANGE.contains(&digits[0]) {
        return Err(FormatError::LeadingDigitOutOfRange {
            min: *LEADING_DIGIT_RANGE.start(),
            max: *LEADING_DIGIT_RANGE.end(),
            found: digits[0],
        });
    }
    Ok(weighted_checksum(&digits))
}

/// Generates a valid card number using the thread-local random generator.
pub fn generate_random(include_irn: bool) -> String {
    generate_with_rng(&mut rand::thread_rng(), include_irn)
}

/// Generates a valid card number: the checksum is computed from the sampled identifier,
/// followed by a random issue number and, if requested, an IRN between 1 and 9.
pub fn generate_with_rng<R: Rng + ?Sized>(rng: &mut R, include_irn: bool) -> String {
    let mut digits: Vec<u32> = Vec::with_capacity(NUMBER_LENGTH + 1);
    digits.push(rng.gen_range(LEADING_DIGIT_RANGE));
    for _ in 1..IDENTIFIER_LENGTH {
        digits.push(rng.gen_range(0..=9));
    }
    digits.push(weighted_checksum(&digits));
    digits.push(rng.gen_range(0..=9));
    if include_irn {
        digits.push(rng.gen_range(1..=9));
    }
    digits
        .into_iter()
        .filter_map(|digit| char::from_digit(digit, 10))
        .collect()
}

impl FromStr for MedicareCardNumber {
    type Err = MedicareCardError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for MedicareCardNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.value, self.irn.as_deref().unwrap_or_default())
    }
}

#[derive(Serialize, Deserialize)]
struct MedicareCardRecord {
    number: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    irn: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    expiry: Option<NaiveDate>,
}

impl From<MedicareCardRecord> for MedicareCardNumber {
    fn from(record: MedicareCardRecord) -> Self {
        let card = match record.irn {
            Some(irn) => MedicareCardNumber::with_irn(record.number, irn),
            None => MedicareCardNumber::new(record.number),
        };
        match record.expiry {
            Some(expiry) => card.with_expiry(expiry),
            None => card,
        }
    }
}

impl From<MedicareCardNumber> for MedicareCardRecord {
    fn from(card: MedicareCardNumber) -> Self {
        MedicareCardRecord {
            number: card.value,
            irn: card.irn,
            expiry: card.expiry,
        }
    }
}
