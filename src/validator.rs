use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_with::serde_as;
use serde_with::DefaultOnNull;
use strum::{EnumIter, IntoStaticStr};

use crate::dva_number::DvaNumber;
use crate::generator::{
    HpiIGenerator, HpiOGenerator, IdentifierGenerator, IhiGenerator, MedicareCardGenerator,
    MedicareProviderGenerator,
};
use crate::healthcare_identifier::{HealthcareIdentifier, HealthcareIdentifierType};
use crate::medicare_card::MedicareCardNumber;
use crate::medicare_provider::MedicareProviderNumber;
use crate::observability::labels::Labels;
use crate::observability::metrics::ValidatorMetrics;

pub trait Validator: Send + Sync {
    fn is_valid(&self, input: &str) -> bool;
}

/// The identifier scheme a raw value is checked against.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, IntoStaticStr, EnumIter)]
#[serde(tag = "type")]
#[strum(serialize_all = "snake_case")]
pub enum IdentifierKind {
    /// 10 digits, or 11 with a trailing IRN
    MedicareCardNumber,
    MedicareProviderNumber,
    /// Any of IHI, HPI-I or HPI-O
    HealthcareIdentifier,
    IndividualHealthcareIdentifier,
    ProviderIdentifierIndividual,
    ProviderIdentifierOrganisation,
    DvaNumber,
}

impl IdentifierKind {
    /// A generator of valid values for this kind, when one exists.
    pub fn generator(&self) -> Option<Box<dyn IdentifierGenerator>> {
        match self {
            IdentifierKind::MedicareCardNumber => Some(Box::new(MedicareCardGenerator {
                include_irn: false,
            })),
            IdentifierKind::MedicareProviderNumber => Some(Box::new(MedicareProviderGenerator)),
            IdentifierKind::IndividualHealthcareIdentifier => Some(Box::new(IhiGenerator)),
            IdentifierKind::ProviderIdentifierIndividual => Some(Box::new(HpiIGenerator)),
            IdentifierKind::ProviderIdentifierOrganisation => Some(Box::new(HpiOGenerator)),
            IdentifierKind::HealthcareIdentifier | IdentifierKind::DvaNumber => None,
        }
    }
}

impl Validator for IdentifierKind {
    fn is_valid(&self, input: &str) -> bool {
        match self {
            IdentifierKind::MedicareCardNumber => MedicareCardNumber::is_valid_str(input),
            IdentifierKind::MedicareProviderNumber => MedicareProviderNumber::is_valid_str(input),
            IdentifierKind::HealthcareIdentifier => HealthcareIdentifier::new(input).is_valid(),
            IdentifierKind::IndividualHealthcareIdentifier => {
                HealthcareIdentifier::is_valid_str(input, HealthcareIdentifierType::Individual)
            }
            IdentifierKind::ProviderIdentifierIndividual => {
                HealthcareIdentifier::is_valid_str(input, HealthcareIdentifierType::Provider)
            }
            IdentifierKind::ProviderIdentifierOrganisation => {
                HealthcareIdentifier::is_valid_str(input, HealthcareIdentifierType::Organisation)
            }
            IdentifierKind::DvaNumber => DvaNumber::is_valid_str(input),
        }
    }
}

#[serde_as]
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct ValidatorConfig {
    pub kind: IdentifierKind,

    /// Extra labels attached to the validation metrics.
    #[serde_as(deserialize_as = "DefaultOnNull")]
    #[serde(default)]
    pub labels: BTreeMap<String, String>,
}

impl ValidatorConfig {
    pub fn new(kind: IdentifierKind) -> Self {
        Self {
            kind,
            labels: BTreeMap::new(),
        }
    }

    pub fn kind(&self, kind: IdentifierKind) -> Self {
        self.mutate_clone(|x| x.kind = kind)
    }

    pub fn labels(&self, labels: BTreeMap<String, String>) -> Self {
        self.mutate_clone(|x| x.labels = labels)
    }

    pub fn build(&self) -> CompiledValidator {
        let kind_name: &'static str = self.kind.into();
        let labels = Labels::from(&self.labels).clone_with_labels(&[("identifier_kind", kind_name)]);
        CompiledValidator {
            kind: self.kind,
            metrics: ValidatorMetrics::new(&labels),
        }
    }

    fn mutate_clone(&self, modify: impl FnOnce(&mut Self)) -> Self {
        let mut clone = self.clone();
        modify(&mut clone);
        clone
    }
}

/// A validator that reports every outcome to the `identifier.validation` counter.
pub struct CompiledValidator {
    kind: IdentifierKind,
    metrics: ValidatorMetrics,
}

impl CompiledValidator {
    pub fn kind(&self) -> IdentifierKind {
        self.kind
    }
}

impl Validator for CompiledValidator {
    fn is_valid(&self, input: &str) -> bool {
        let is_valid = self.kind.is_valid(input);
        self.metrics.record(is_valid);
        is_valid
    }
}
