//! Australian national healthcare identifiers (IHI, HPI-I and HPI-O).
//!
//! All three share one 16 digit layout:
//!
//! | Field            | Width | Content                                   |
//! |------------------|-------|-------------------------------------------|
//! | Industry code    | 2     | `80`, healthcare (ISO/IEC 7812)           |
//! | Country code     | 3     | `036`, Australia (ISO 3166-1)             |
//! | Number issuer    | 1     | `0` IHI, `1` HPI-I, `2` HPI-O             |
//! | Unique reference | 9     | allocated by the HI Service               |
//! | Check digit      | 1     | Luhn check digit over the first 15 digits |

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, IntoStaticStr};
use thiserror::Error;

use crate::error::FormatError;
use crate::luhn;
use crate::str_utils::{fixed_field, is_digits_only};

/// Root OID shared by IHI, HPI-I and HPI-O values in CDA documents.
pub const ROOT_HEALTHCARE_IDENTIFIER_OID: &str = "1.2.36.1.2001.1003.0";

const VALID_INDUSTRY_CODE: &str = "80";
const VALID_COUNTRY_CODE: &str = "036";
const PAYLOAD_LENGTH: usize = 15;
const IDENTIFIER_LENGTH: usize = PAYLOAD_LENGTH + 1;
const VALID_MESSAGE: &str = "The Healthcare Identifier is valid.";

pub(crate) const IHI_ISSUER_CODE: char = '0';
pub(crate) const HPI_I_ISSUER_CODE: char = '1';
pub(crate) const HPI_O_ISSUER_CODE: char = '2';

/// Values used when encoding healthcare identifiers in HL7 v2 messages.
pub mod hl7_v2 {
    pub mod ihi {
        /// e.g. PID-3.4
        pub const ASSIGNING_AUTHORITY: &str = "AUSHIC";
        /// e.g. PID-3.5
        pub const IDENTIFIER_TYPE_CODE: &str = "NI";
    }

    pub mod hpi_i {
        /// e.g. OBR-16.9
        pub const ASSIGNING_AUTHORITY: &str = "AUSHIC";
        /// e.g. OBR-16.14
        pub const ASSIGNING_FACILITY: &str = "NPI";
    }

    pub mod hpi_o {
        /// e.g. ORC-21.7
        pub const IDENTIFIER_TYPE_CODE: &str = "NOI";
        /// e.g. ORC-21.8
        pub const ASSIGNING_FACILITY_ID: &str = "AUSHIC";
    }
}

/// `assigningAuthorityName` values for HL7 CDA documents.
pub mod hl7_cda {
    pub mod ihi {
        pub const ASSIGNING_AUTHORITY_NAME: &str = "IHI";
    }

    pub mod hpi_i {
        pub const ASSIGNING_AUTHORITY_NAME: &str = "HPI-I";
    }

    pub mod hpi_o {
        pub const ASSIGNING_AUTHORITY_NAME: &str = "HPI-O";
    }
}

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, IntoStaticStr, EnumIter,
)]
pub enum HealthcareIdentifierType {
    /// Individual Healthcare Identifier (IHI)
    Individual,
    /// Healthcare Provider Identifier - Individual (HPI-I)
    Provider,
    /// Healthcare Provider Identifier - Organisation (HPI-O)
    Organisation,
    /// Unknown number issuer code
    None,
}

impl HealthcareIdentifierType {
    pub fn from_number_issuer_code(code: &str) -> Self {
        let mut chars = code.chars();
        match (chars.next(), chars.next()) {
            (Some(IHI_ISSUER_CODE), None) => HealthcareIdentifierType::Individual,
            (Some(HPI_I_ISSUER_CODE), None) => HealthcareIdentifierType::Provider,
            (Some(HPI_O_ISSUER_CODE), None) => HealthcareIdentifierType::Organisation,
            _ => HealthcareIdentifierType::None,
        }
    }

    pub fn number_issuer_code(self) -> Option<char> {
        match self {
            HealthcareIdentifierType::Individual => Some(IHI_ISSUER_CODE),
            HealthcareIdentifierType::Provider => Some(HPI_I_ISSUER_CODE),
            HealthcareIdentifierType::Organisation => Some(HPI_O_ISSUER_CODE),
            HealthcareIdentifierType::None => None,
        }
    }

    pub fn abbreviation(self) -> &'static str {
        match self {
            HealthcareIdentifierType::Individual => "IHI",
            HealthcareIdentifierType::Provider => "HPI-I",
            HealthcareIdentifierType::Organisation => "HPI-O",
            HealthcareIdentifierType::None => "unknown",
        }
    }

    pub fn cda_assigning_authority_name(self) -> Option<&'static str> {
        match self {
            HealthcareIdentifierType::Individual => Some(hl7_cda::ihi::ASSIGNING_AUTHORITY_NAME),
            HealthcareIdentifierType::Provider => Some(hl7_cda::hpi_i::ASSIGNING_AUTHORITY_NAME),
            HealthcareIdentifierType::Organisation => {
                Some(hl7_cda::hpi_o::ASSIGNING_AUTHORITY_NAME)
            }
            HealthcareIdentifierType::None => None,
        }
    }
}

impl fmt::Display for HealthcareIdentifierType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.abbreviation())
    }
}

/// Reasons a healthcare identifier fails validation, in the order the rules are checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HealthcareIdentifierError {
    #[error("Characters 1-2 must be the industry code '80'")]
    IndustryCode,

    #[error("Characters 3-5 must be the country code '036'")]
    CountryCode,

    #[error("Character 6 must be a number issuer code of '0', '1' or '2' indicating an IHI, HPI-I or HPI-O")]
    NumberIssuerCode,

    #[error("Character 6 must be the number issuer code of an {expected} identifier, found an {found} identifier")]
    TypeMismatch {
        expected: HealthcareIdentifierType,
        found: HealthcareIdentifierType,
    },

    #[error("Character 16 must be a single numeric check digit")]
    MissingCheckDigit,

    #[error("The Healthcare Identifier must be exactly 16 digits long, found extra content '{0}'")]
    UnknownContent(String),

    #[error("The Healthcare Identifier must only contain numeric digits [0-9]")]
    NonDigit,

    #[error("The Healthcare Identifier's check digit fails validation by the Luhn algorithm")]
    CheckDigit,
}

/// An IHI, HPI-I or HPI-O split into its fixed-width fields.
///
/// Parsing never fails. Fields the input is too short to hold are left unset, anything
/// past the 16th character is kept as unknown content, and validity against the
/// identifier's own type is computed once here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct HealthcareIdentifier {
    value: String,
    industry_code: Option<String>,
    country_code: Option<String>,
    number_issuer_code: Option<String>,
    unique_reference: Option<String>,
    check_digit: Option<String>,
    unknown_content: String,
    identifier_type: HealthcareIdentifierType,
    validation: Result<(), HealthcareIdentifierError>,
}

impl HealthcareIdentifier {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let chars: Vec<char> = value.chars().collect();
        let number_issuer_code = fixed_field(&chars, 5, 1);
        let identifier_type = number_issuer_code
            .as_deref()
            .map_or(HealthcareIdentifierType::None, |code| {
                HealthcareIdentifierType::from_number_issuer_code(code)
            });

        let mut identifier = Self {
            industry_code: fixed_field(&chars, 0, 2),
            country_code: fixed_field(&chars, 2, 3),
            number_issuer_code,
            unique_reference: fixed_field(&chars, 6, 9),
            check_digit: fixed_field(&chars, PAYLOAD_LENGTH, 1),
            unknown_content: chars.iter().skip(IDENTIFIER_LENGTH).collect(),
            identifier_type,
            value,
            validation: Ok(()),
        };
        identifier.validation = identifier.validate(None);
        identifier
    }

    /// Checks every rule against `expected`, or against the identifier's own type when
    /// `None`, and returns the first one that fails.
    pub fn validate(
        &self,
        expected: Option<HealthcareIdentifierType>,
    ) -> Result<(), HealthcareIdentifierError> {
        if self.industry_code.as_deref() != Some(VALID_INDUSTRY_CODE) {
            return Err(HealthcareIdentifierError::IndustryCode);
        }
        if self.country_code.as_deref() != Some(VALID_COUNTRY_CODE) {
            return Err(HealthcareIdentifierError::CountryCode);
        }

        let requested = expected.unwrap_or(self.identifier_type);
        if self.identifier_type == HealthcareIdentifierType::None
            || requested == HealthcareIdentifierType::None
        {
            return Err(HealthcareIdentifierError::NumberIssuerCode);
        }
        if requested != self.identifier_type {
            return Err(HealthcareIdentifierError::TypeMismatch {
                expected: requested,
                found: self.identifier_type,
            });
        }

        if self.check_digit.is_none() {
            return Err(HealthcareIdentifierError::MissingCheckDigit);
        }
        if !self.unknown_content.is_empty() {
            return Err(HealthcareIdentifierError::UnknownContent(
                self.unknown_content.clone(),
            ));
        }
        if !is_digits_only(&self.value) {
            return Err(HealthcareIdentifierError::NonDigit);
        }
        if !self.is_valid_check_digit() {
            return Err(HealthcareIdentifierError::CheckDigit);
        }
        Ok(())
    }

    /// Syntax check only, the national HI Service is not consulted. A `None` type is always invalid.
    pub fn is_valid(&self) -> bool {
        self.validation.is_ok()
    }

    pub fn is_valid_for(&self, expected: HealthcareIdentifierType) -> bool {
        self.validate(Some(expected)).is_ok()
    }

    pub fn is_valid_str(raw: &str, expected: HealthcareIdentifierType) -> bool {
        HealthcareIdentifier::new(raw).is_valid_for(expected)
    }

    /// Whether the 16th digit is the Luhn check digit of the first 15.
    pub fn is_valid_check_digit(&self) -> bool {
        let (
            Some(industry_code),
            Some(country_code),
            Some(number_issuer_code),
            Some(unique_reference),
            Some(check_digit),
        ) = (
            &self.industry_code,
            &self.country_code,
            &self.number_issuer_code,
            &self.unique_reference,
            &self.check_digit,
        )
        else {
            return false;
        };
        let payload = format!("{industry_code}{country_code}{number_issuer_code}{unique_reference}");
        let check_digit = check_digit.chars().next().and_then(|c| c.to_digit(10));
        check_digit.is_some() && luhn::compute_check_digit(&payload) == check_digit
    }

    pub fn validation_error(&self) -> Option<&HealthcareIdentifierError> {
        self.validation.as_ref().err()
    }

    /// Human readable outcome of validating the identifier against its own type.
    ///
    /// Computed once at construction. Checks against another type through
    /// [HealthcareIdentifier::is_valid_for] or [HealthcareIdentifier::validate] do not
    /// change it.
    pub fn validation_error_message(&self) -> String {
        match &self.validation {
            Ok(()) => VALID_MESSAGE.to_string(),
            Err(err) => err.to_string(),
        }
    }

    pub fn identifier_type(&self) -> HealthcareIdentifierType {
        self.identifier_type
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// The value qualified by the root OID, as used for CDA `id/@root`.
    pub fn value_with_root_oid(&self) -> String {
        format!("{ROOT_HEALTHCARE_IDENTIFIER_OID}.{}", self.value)
    }

    pub fn industry_code(&self) -> Option<&str> {
        self.industry_code.as_deref()
    }

    pub fn country_code(&self) -> Option<&str> {
        self.country_code.as_deref()
    }

    pub fn number_issuer_code(&self) -> Option<&str> {
        self.number_issuer_code.as_deref()
    }

    pub fn unique_reference(&self) -> Option<&str> {
        self.unique_reference.as_deref()
    }

    pub fn check_digit(&self) -> Option<&str> {
        self.check_digit.as_deref()
    }

    /// Anything found past the 16th character. Empty for a well formed identifier.
    pub fn unknown_content(&self) -> &str {
        &self.unknown_content
    }
}

/// Computes the check digit for the first 15 digits of an identifier.
pub fn get_check_digit(payload: &str) -> Result<u32, FormatError> {
    let length = payload.chars().count();
    if length != PAYLOAD_LENGTH {
        return Err(FormatError::InvalidLength {
            expected: PAYLOAD_LENGTH,
            found: length,
        });
    }
    luhn::compute_check_digit(payload).ok_or(FormatError::NonDigit)
}

pub fn generate_random(identifier_type: HealthcareIdentifierType) -> Result<String, FormatError> {
    generate_with_rng(&mut rand::thread_rng(), identifier_type)
}

/// Generates a valid identifier of the given type from a random unique reference.
pub fn generate_with_rng<R: Rng + ?Sized>(
    rng: &mut R,
    identifier_type: HealthcareIdentifierType,
) -> Result<String, FormatError> {
    let number_issuer_code = identifier_type
        .number_issuer_code()
        .ok_or_else(|| FormatError::UnsupportedIdentifierType(identifier_type.into()))?;
    Ok(generate_for_issuer_code(rng, number_issuer_code))
}

pub(crate) fn generate_for_issuer_code<R: Rng + ?Sized>(
    rng: &mut R,
    number_issuer_code: char,
) -> String {
    let unique_reference: u32 = rng.gen_range(0..1_000_000_000);
    let payload = format!(
        "{VALID_INDUSTRY_CODE}{VALID_COUNTRY_CODE}{number_issuer_code}{unique_reference:09}"
    );
    let digits: Vec<u32> = payload.chars().filter_map(|c| c.to_digit(10)).collect();
    format!("{payload}{}", luhn::check_digit(&digits))
}

impl FromStr for HealthcareIdentifier {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(HealthcareIdentifier::new(s))
    }
}

impl From<String> for HealthcareIdentifier {
    fn from(value: String) -> Self {
        HealthcareIdentifier::new(value)
    }
}

impl From<HealthcareIdentifier> for String {
    fn from(identifier: HealthcareIdentifier) -> Self {
        identifier.value
    }
}

impl fmt::Display for HealthcareIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use strum::IntoEnumIterator;

    const VALID_IHI: &str = "8003608333428779";

    #[test]
    fn test_valid_identifiers() {
        let test_cases = vec![
            (VALID_IHI, HealthcareIdentifierType::Individual),
            ("8003608000094961", HealthcareIdentifierType::Individual),
            ("8003610001218573", HealthcareIdentifierType::Provider),
            ("8003615833340784", HealthcareIdentifierType::Provider),
            ("8003623233356541", HealthcareIdentifierType::Organisation),
        ];
        for (raw, identifier_type) in test_cases {
            let identifier = HealthcareIdentifier::new(raw);
            assert!(identifier.is_valid(), "{raw}");
            assert!(identifier.is_valid_check_digit(), "{raw}");
            assert_eq!(identifier.identifier_type(), identifier_type);
            assert!(HealthcareIdentifier::is_valid_str(raw, identifier_type));
            assert_eq!(identifier.validation_error_message(), VALID_MESSAGE);
        }
    }

    #[test]
    fn test_fields() {
        let identifier = HealthcareIdentifier::new(VALID_IHI);
        assert_eq!(identifier.industry_code(), Some("80"));
        assert_eq!(identifier.country_code(), Some("036"));
        assert_eq!(identifier.number_issuer_code(), Some("0"));
        assert_eq!(identifier.unique_reference(), Some("833342877"));
        assert_eq!(identifier.check_digit(), Some("9"));
        assert_eq!(identifier.unknown_content(), "");
        assert_eq!(identifier.value(), VALID_IHI);
    }

    #[test]
    fn test_identifier_types() {
        let test_cases = vec![
            ("8003608333428779", HealthcareIdentifierType::Individual),
            ("8003618333428779", HealthcareIdentifierType::Provider),
            ("8003628333428779", HealthcareIdentifierType::Organisation),
            ("8003638333428779", HealthcareIdentifierType::None),
            ("8003668333428779", HealthcareIdentifierType::None),
            ("80036", HealthcareIdentifierType::None),
        ];
        for (raw, identifier_type) in test_cases {
            assert_eq!(
                HealthcareIdentifier::new(raw).identifier_type(),
                identifier_type,
                "{raw}"
            );
        }
        assert!(!HealthcareIdentifier::new("8003668333428779").is_valid());
        for identifier_type in HealthcareIdentifierType::iter() {
            assert!(!HealthcareIdentifier::is_valid_str("8003668333428779", identifier_type));
        }
    }

    #[test]
    fn test_first_failing_rule_is_reported() {
        let test_cases = vec![
            ("", HealthcareIdentifierError::IndustryCode),
            ("8", HealthcareIdentifierError::IndustryCode),
            ("7003608333428779", HealthcareIdentifierError::IndustryCode),
            ("8003708333428779", HealthcareIdentifierError::CountryCode),
            ("8003", HealthcareIdentifierError::CountryCode),
            ("80036", HealthcareIdentifierError::NumberIssuerCode),
            ("8003638333428779", HealthcareIdentifierError::NumberIssuerCode),
            ("8003608333429", HealthcareIdentifierError::MissingCheckDigit),
            ("800360833342877", HealthcareIdentifierError::MissingCheckDigit),
            (
                "8003608333428779333",
                HealthcareIdentifierError::UnknownContent("333".to_string()),
            ),
            ("80036083334A8779", HealthcareIdentifierError::NonDigit),
            ("800360833342877ñ", HealthcareIdentifierError::NonDigit),
            ("8003608333428778", HealthcareIdentifierError::CheckDigit),
            ("8003610001218577", HealthcareIdentifierError::CheckDigit),
        ];
        for (raw, expected) in test_cases {
            let identifier = HealthcareIdentifier::new(raw);
            assert!(!identifier.is_valid(), "{raw}");
            assert_eq!(identifier.validation_error(), Some(&expected), "{raw}");
            assert_eq!(identifier.validation_error_message(), expected.to_string());
        }
    }

    #[test]
    fn test_expected_type_must_match() {
        let identifier = HealthcareIdentifier::new(VALID_IHI);
        assert!(identifier.is_valid_for(HealthcareIdentifierType::Individual));
        assert!(!identifier.is_valid_for(HealthcareIdentifierType::None));
        assert_eq!(
            identifier.validate(Some(HealthcareIdentifierType::Provider)),
            Err(HealthcareIdentifierError::TypeMismatch {
                expected: HealthcareIdentifierType::Provider,
                found: HealthcareIdentifierType::Individual,
            })
        );
        assert!(!HealthcareIdentifier::is_valid_str(
            VALID_IHI,
            HealthcareIdentifierType::Organisation
        ));
        assert_eq!(
            HealthcareIdentifierError::TypeMismatch {
                expected: HealthcareIdentifierType::Provider,
                found: HealthcareIdentifierType::Individual,
            }
            .to_string(),
            "Character 6 must be the number issuer code of an HPI-I identifier, found an IHI identifier"
        );
        // The cached result always uses the identifier's own type.
        assert!(identifier.is_valid());
        assert!(identifier.validation_error().is_none());
        assert_eq!(identifier.validation_error_message(), VALID_MESSAGE);
    }

    #[test]
    fn test_get_check_digit() {
        let payload = "800360833342877";
        let check_digit = get_check_digit(payload).unwrap();
        assert!(HealthcareIdentifier::new(format!("{payload}{check_digit}")).is_valid());

        assert_eq!(
            get_check_digit("80036083334287"),
            Err(FormatError::InvalidLength {
                expected: 15,
                found: 14
            })
        );
        assert_eq!(
            get_check_digit("8003608333428779"),
            Err(FormatError::InvalidLength {
                expected: 15,
                found: 16
            })
        );
        assert_eq!(get_check_digit("80036083334287X"), Err(FormatError::NonDigit));
    }

    #[test]
    fn test_generated_identifiers_are_valid() {
        let mut rng = StdRng::seed_from_u64(42);
        for identifier_type in [
            HealthcareIdentifierType::Individual,
            HealthcareIdentifierType::Provider,
            HealthcareIdentifierType::Organisation,
        ] {
            for _ in 0..10_000 {
                let raw = generate_with_rng(&mut rng, identifier_type).unwrap();
                assert!(
                    HealthcareIdentifier::is_valid_str(&raw, identifier_type),
                    "{raw}"
                );
            }
            let raw = generate_random(identifier_type).unwrap();
            assert_eq!(HealthcareIdentifier::new(raw).identifier_type(), identifier_type);
        }
    }

    #[test]
    fn test_cannot_generate_unknown_type() {
        assert_eq!(
            generate_random(HealthcareIdentifierType::None),
            Err(FormatError::UnsupportedIdentifierType("None"))
        );
    }

    #[test]
    fn test_value_with_root_oid() {
        let identifier = HealthcareIdentifier::new(VALID_IHI);
        assert_eq!(
            identifier.value_with_root_oid(),
            "1.2.36.1.2001.1003.0.8003608333428779"
        );
    }

    #[test]
    fn test_parse_canonical_value_is_idempotent() {
        for raw in [VALID_IHI, "8003708333428779", "8003608333428779333", "800"] {
            let identifier: HealthcareIdentifier = raw.parse().unwrap();
            let reparsed: HealthcareIdentifier = identifier.value().parse().unwrap();
            assert_eq!(identifier, reparsed);
        }
    }

    #[test]
    fn test_serde_uses_canonical_value() {
        let identifier = HealthcareIdentifier::new(VALID_IHI);
        let json = serde_json::to_string(&identifier).unwrap();
        assert_eq!(json, format!("\"{VALID_IHI}\""));
        let decoded: HealthcareIdentifier = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, identifier);
    }

    #[test]
    fn test_interoperability_constants() {
        assert_eq!(ROOT_HEALTHCARE_IDENTIFIER_OID, "1.2.36.1.2001.1003.0");
        assert_eq!(hl7_v2::ihi::ASSIGNING_AUTHORITY, "AUSHIC");
        assert_eq!(hl7_v2::ihi::IDENTIFIER_TYPE_CODE, "NI");
        assert_eq!(hl7_v2::hpi_i::ASSIGNING_AUTHORITY, "AUSHIC");
        assert_eq!(hl7_v2::hpi_i::ASSIGNING_FACILITY, "NPI");
        assert_eq!(hl7_v2::hpi_o::IDENTIFIER_TYPE_CODE, "NOI");
        assert_eq!(hl7_v2::hpi_o::ASSIGNING_FACILITY_ID, "AUSHIC");
        assert_eq!(
            HealthcareIdentifierType::Individual.cda_assigning_authority_name(),
            Some("IHI")
        );
        assert_eq!(
            HealthcareIdentifierType::Provider.cda_assigning_authority_name(),
            Some("HPI-I")
        );
        assert_eq!(
            HealthcareIdentifierType::Organisation.cda_assigning_authority_name(),
            Some("HPI-O")
        );
        assert_eq!(HealthcareIdentifierType::None.cda_assigning_authority_name(), None);
    }
}
