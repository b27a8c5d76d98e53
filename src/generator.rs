//! Random generation of valid identifiers, mostly for test data.

use rand::RngCore;

use crate::healthcare_identifier::{
    generate_for_issuer_code, HPI_I_ISSUER_CODE, HPI_O_ISSUER_CODE, IHI_ISSUER_CODE,
};
use crate::{medicare_card, medicare_provider};

pub trait IdentifierGenerator: Send + Sync {
    fn generate_with_rng(&self, rng: &mut dyn RngCore) -> String;

    fn generate(&self) -> String {
        self.generate_with_rng(&mut rand::thread_rng())
    }
}

/// Individual Healthcare Identifiers (number issuer code 0).
pub struct IhiGenerator;

impl IdentifierGenerator for IhiGenerator {
    fn generate_with_rng(&self, rng: &mut dyn RngCore) -> String {
        generate_for_issuer_code(rng, IHI_ISSUER_CODE)
    }
}

/// Healthcare Provider Identifiers for individuals (number issuer code 1).
pub struct HpiIGenerator;

impl IdentifierGenerator for HpiIGenerator {
    fn generate_with_rng(&self, rng: &mut dyn RngCore) -> String {
        generate_for_issuer_code(rng, HPI_I_ISSUER_CODE)
    }
}

/// Healthcare Provider Identifiers for organisations (number issuer code 2).
pub struct HpiOGenerator;

impl IdentifierGenerator for HpiOGenerator {
    fn generate_with_rng(&self, rng: &mut dyn RngCore) -> String {
        generate_for_issuer_code(rng, HPI_O_ISSUER_CODE)
    }
}

pub struct MedicareCardGenerator {
    /// Append an individual reference number, producing 11 digits instead of 10.
    pub include_irn: bool,
}

impl IdentifierGenerator for MedicareCardGenerator {
    fn generate_with_rng(&self, rng: &mut dyn RngCore) -> String {
        medicare_card::generate_with_rng(rng, self.include_irn)
    }
}

pub struct MedicareProviderGenerator;

impl IdentifierGenerator for MedicareProviderGenerator {
    fn generate_with_rng(&self, rng: &mut dyn RngCore) -> String {
        medicare_provider::generate_with_rng(rng)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::healthcare_identifier::{HealthcareIdentifier, HealthcareIdentifierType};
    use crate::medicare_card::MedicareCardNumber;
    use crate::medicare_provider::MedicareProviderNumber;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_healthcare_identifier_generators() {
        let test_cases: Vec<(Box<dyn IdentifierGenerator>, HealthcareIdentifierType)> = vec![
            (Box::new(IhiGenerator), HealthcareIdentifierType::Individual),
            (Box::new(HpiIGenerator), HealthcareIdentifierType::Provider),
            (Box::new(HpiOGenerator), HealthcareIdentifierType::Organisation),
        ];
        let mut rng = StdRng::seed_from_u64(7);
        for (generator, expected_type) in test_cases {
            for _ in 0..1_000 {
                let identifier = HealthcareIdentifier::new(generator.generate_with_rng(&mut rng));
                assert!(identifier.is_valid_for(expected_type), "{identifier}");
                assert_eq!(identifier.identifier_type(), expected_type);
            }
        }
    }

    #[test]
    fn test_medicare_card_generator_irn() {
        let mut rng = StdRng::seed_from_u64(7);
        for include_irn in [false, true] {
            let generator = MedicareCardGenerator { include_irn };
            for _ in 0..1_000 {
                let value = generator.generate_with_rng(&mut rng);
                let card = MedicareCardNumber::parse(&value).unwrap();
                assert_eq!(card.irn().is_some(), include_irn, "{value}");
            }
        }
    }

    #[test]
    fn test_same_seed_same_values() {
        let generator = MedicareProviderGenerator;
        let first: Vec<String> = {
            let mut rng = StdRng::seed_from_u64(1234);
            (0..10).map(|_| generator.generate_with_rng(&mut rng)).collect()
        };
        let second: Vec<String> = {
            let mut rng = StdRng::seed_from_u64(1234);
            (0..10).map(|_| generator.generate_with_rng(&mut rng)).collect()
        };
        assert_eq!(first, second);
        assert!(first.iter().all(|v| MedicareProviderNumber::is_valid_str(v)));
        assert!(MedicareProviderNumber::is_valid_str(&generator.generate()));
    }
}
