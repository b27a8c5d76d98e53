// This blocks accidental use of `println`. If one is actually needed, you can
// override with `#[allow(clippy::print_stdout)]`.
#![deny(clippy::print_stdout)]

mod error;
mod observability;
mod str_utils;

pub mod dva_number;
pub mod generator;
pub mod healthcare_identifier;
pub mod luhn;
pub mod medicare_card;
pub mod medicare_provider;
pub mod validator;

// This is the public API of the library
pub use dva_number::{DvaNumber, DvaNumberError, DvaStateCode};
pub use error::FormatError;
pub use generator::{
    HpiIGenerator, HpiOGenerator, IdentifierGenerator, IhiGenerator, MedicareCardGenerator,
    MedicareProviderGenerator,
};
pub use healthcare_identifier::{
    HealthcareIdentifier, HealthcareIdentifierError, HealthcareIdentifierType,
    ROOT_HEALTHCARE_IDENTIFIER_OID,
};
pub use luhn::LuhnChecksum;
pub use medicare_card::{MedicareCardError, MedicareCardNumber};
pub use medicare_provider::{MedicareProviderNumber, ProviderNumberError};
pub use observability::labels::Labels;
pub use str_utils::is_digits_only;
pub use validator::{CompiledValidator, IdentifierKind, Validator, ValidatorConfig};
