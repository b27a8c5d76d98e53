//! Department of Veterans' Affairs (DVA) file numbers, written `STATE WARCODE NUMBER [SEGMENT]`,
//! e.g. `N ABC1234C`.
//!
//! The state code, war code and digits together always span 8 characters, so the length
//! of the digit run follows from the length of the war code. There is no check character.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};
use thiserror::Error;

const FILE_NUMBER_LENGTH: usize = 8;
const MAX_WAR_CODE_LENGTH: usize = 3;

/// The state or territory office that issued the number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter)]
pub enum DvaStateCode {
    /// New South Wales and the Australian Capital Territory
    #[strum(serialize = "N")]
    NewSouthWales,
    #[strum(serialize = "V")]
    Victoria,
    #[strum(serialize = "Q")]
    Queensland,
    /// South Australia and the Northern Territory
    #[strum(serialize = "S")]
    SouthAustralia,
    #[strum(serialize = "W")]
    WesternAustralia,
    #[strum(serialize = "T")]
    Tasmania,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DvaNumberError {
    #[error("A DVA number cannot be empty")]
    Empty,

    #[error("'{0}' is not a valid DVA state code")]
    InvalidStateCode(char),

    #[error("A DVA number must have a war code of 1 to 3 uppercase letters after the state code")]
    InvalidWarCode,

    #[error("The DVA file number must be 8 characters, with {expected} digits after the war code, found {found}")]
    InvalidNumberLength { expected: usize, found: usize },

    #[error("A DVA segment link must be a single uppercase letter, found '{0}'")]
    InvalidSegmentLink(String),
}

/// A parsed DVA number. Only successfully parsed numbers exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DvaNumber {
    state_code: DvaStateCode,
    war_code: String,
    number: String,
    segment_link: String,
}

impl DvaNumber {
    pub fn parse(raw: &str) -> Result<Self, DvaNumberError> {
        let raw = raw.trim();
        let mut chars = raw.chars();
        let state = chars.next().ok_or(DvaNumberError::Empty)?;
        let state_code = DvaStateCode::from_str(state.encode_utf8(&mut [0; 4]))
            .map_err(|_| DvaNumberError::InvalidStateCode(state))?;

        let rest = chars.as_str().trim_start();
        let war_code_length = rest
            .find(|c: char| !c.is_ascii_uppercase())
            .unwrap_or(rest.len());
        if war_code_length == 0 || war_code_length > MAX_WAR_CODE_LENGTH {
            return Err(DvaNumberError::InvalidWarCode);
        }
        let (war_code, rest) = rest.split_at(war_code_length);

        let number_length = rest
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(rest.len());
        let (number, segment_link) = rest.split_at(number_length);
        let expected = FILE_NUMBER_LENGTH - 1 - war_code_length;
        if number_length != expected {
            return Err(DvaNumberError::InvalidNumberLength {
                expected,
                found: number_length,
            });
        }

        let mut segment_chars = segment_link.chars();
        match (segment_chars.next(), segment_chars.next()) {
            (None, _) => {}
            (Some(c), None) if c.is_ascii_uppercase() => {}
            _ => {
                return Err(DvaNumberError::InvalidSegmentLink(
                    segment_link.to_string(),
                ))
            }
        }

        Ok(DvaNumber {
            state_code,
            war_code: war_code.to_string(),
            number: number.to_string(),
            segment_link: segment_link.to_string(),
        })
    }

    pub fn try_parse(raw: &str) -> Option<Self> {
        Self::parse(raw).ok()
    }

    pub fn is_valid_str(raw: &str) -> bool {
        Self::parse(raw).is_ok()
    }

    /// Canonical form without the separator, e.g. `NABC1234C`.
    pub fn value(&self) -> String {
        format!("{}{}", self.state_code, self.file_number_with_segment())
    }

    /// War code and digits, without the segment link.
    pub fn file_number(&self) -> String {
        format!("{}{}", self.war_code, self.number)
    }

    fn file_number_with_segment(&self) -> String {
        format!("{}{}{}", self.war_code, self.number, self.segment_link)
    }

    pub fn state(&self) -> DvaStateCode {
        self.state_code
    }

    pub fn state_code(&self) -> String {
        self.state_code.to_string()
    }

    pub fn war_code(&self) -> &str {
        &self.war_code
    }

    pub fn number(&self) -> &str {
        &self.number
    }

    /// The trailing segment letter, or an empty string when absent.
    pub fn segment_link(&self) -> &str {
        &self.segment_link
    }
}

impl FromStr for DvaNumber {
    type Err = DvaNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for DvaNumber {
    type Error = DvaNumberError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<DvaNumber> for String {
    fn from(dva_number: DvaNumber) -> Self {
        dva_number.value()
    }
}

impl fmt::Display for DvaNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.state_code, self.file_number_with_segment())
    }
}
