//! Medicare provider numbers: a 6 digit stem, a practice location character and a check
//! character, e.g. `2940675Y`.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::str_utils::{digit_values, fixed_field};

const STEM_LENGTH: usize = 6;
const NUMBER_LENGTH: usize = STEM_LENGTH + 2;
const STEM_WEIGHTS: &[u32; STEM_LENGTH] = &[3, 5, 8, 4, 2, 1];
const LOCATION_WEIGHT: u32 = 6;

/// Practice location symbols; the position of a symbol is its weight.
const PRACTICE_LOCATION_CHARS: &[u8; 32] = b"0123456789ABCDEFGHJKLMNPQRTUVWXY";

/// Check characters indexed by the checksum remainder.
const CHECK_CHARS: &[u8; 11] = b"YXWTLKJHFBA";

/// Values used when encoding a provider number in HL7 v2 messages.
pub mod hl7_v2 {
    /// e.g. ORC-16.9.1
    pub const ASSIGNING_AUTHORITY: &str = "AUSHICPR";
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProviderNumberError {
    #[error("A Medicare provider number must be exactly 8 characters, found {0}")]
    InvalidLength(usize),

    #[error("The first 6 characters of a Medicare provider number must be numeric digits")]
    NonDigitStem,

    #[error("'{0}' is not a valid practice location character")]
    InvalidLocationCharacter(char),

    #[error("The check character should be '{expected}', found '{found}'")]
    CheckCharacterMismatch { expected: char, found: char },
}

/// A Medicare provider number.
///
/// Construction never fails; an input of the wrong shape leaves the affected fields unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct MedicareProviderNumber {
    value: String,
    stem: Option<String>,
    location_character: Option<char>,
    check_character: Option<char>,
    validation: Result<(), ProviderNumberError>,
}

impl MedicareProviderNumber {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let chars: Vec<char> = value.chars().collect();
        let validation = validate(&chars);
        Self {
            stem: fixed_field(&chars, 0, STEM_LENGTH),
            location_character: chars.get(STEM_LENGTH).copied(),
            check_character: chars.get(STEM_LENGTH + 1).copied(),
            value,
            validation,
        }
    }

    pub fn parse(raw: &str) -> Result<Self, ProviderNumberError> {
        let provider_number = Self::new(raw);
        provider_number.validation.clone().map(|_| provider_number)
    }

    pub fn is_valid_str(raw: &str) -> bool {
        validate(&raw.chars().collect::<Vec<_>>()).is_ok()
    }

    pub fn is_valid(&self) -> bool {
        self.validation.is_ok()
    }

    pub fn validation_error(&self) -> Option<&ProviderNumberError> {
        self.validation.as_ref().err()
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn stem(&self) -> Option<&str> {
        self.stem.as_deref()
    }

    pub fn location_character(&self) -> Option<char> {
        self.location_character
    }

    /// Weight (0-31) of the practice location character, if it is a known symbol.
    pub fn location_weight(&self) -> Option<u32> {
        self.location_character.and_then(location_weight)
    }

    pub fn check_character(&self) -> Option<char> {
        self.check_character
    }
}

fn location_weight(location_character: char) -> Option<u32> {
    PRACTICE_LOCATION_CHARS
        .iter()
        .position(|c| char::from(*c) == location_character)
        .map(|position| position as u32)
}

fn validate(chars: &[char]) -> Result<(), ProviderNumberError> {
    if chars.len() != NUMBER_LENGTH {
        return Err(ProviderNumberError::InvalidLength(chars.len()));
    }
    let stem: String = chars[..STEM_LENGTH].iter().collect();
    let stem = digit_values(&stem).ok_or(ProviderNumberError::NonDigitStem)?;

    let location_character = chars[STEM_LENGTH];
    let weight = location_weight(location_character)
        .ok_or(ProviderNumberError::InvalidLocationCharacter(location_character))?;

    let expected = check_character(&stem, weight);
    let found = chars[STEM_LENGTH + 1];
    if expected != found {
        return Err(ProviderNumberError::CheckCharacterMismatch { expected, found });
    }
    Ok(())
}

fn check_character(stem: &[u32], location_weight: u32) -> char {
    let sum: u32 = stem
        .iter()
        .zip(STEM_WEIGHTS)
        .map(|(digit, weight)| digit * weight)
        .sum::<u32>()
        + location_weight * LOCATION_WEIGHT;
    char::from(CHECK_CHARS[(sum % 11) as usize])
}

pub fn generate_random() -> String {
    generate_with_rng(&mut rand::thread_rng())
}

/// Builds a valid provider number from a random stem and practice location.
pub fn generate_with_rng<R: Rng + ?Sized>(rng: &mut R) -> String {
    let stem: Vec<u32> = (0..STEM_LENGTH).map(|_| rng.gen_range(0..=9)).collect();
    let weight = rng.gen_range(0..PRACTICE_LOCATION_CHARS.len());

    let mut value: String = stem
        .iter()
        .filter_map(|digit| char::from_digit(*digit, 10))
        .collect();
    value.push(char::from(PRACTICE_LOCATION_CHARS[weight]));
    value.push(check_character(&stem, weight as u32));
    value
}

impl FromStr for MedicareProviderNumber {
    type Err = ProviderNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<String> for MedicareProviderNumber {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<MedicareProviderNumber> for String {
    fn from(provider_number: MedicareProviderNumber) -> Self {
        provider_number.value
    }
}

impl fmt::Display for MedicareProviderNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}
