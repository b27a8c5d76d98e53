use crate::observability::labels::{Labels, NO_LABEL};
use metrics::{counter, Counter};

pub struct ValidatorMetrics {
    pub valid: Counter,
    pub invalid: Counter,
}

const VALIDATION: &str = "identifier.validation";
const OUTCOME: &str = "outcome";

impl ValidatorMetrics {
    pub fn new(labels: &Labels) -> Self {
        ValidatorMetrics {
            valid: counter!(VALIDATION, labels.clone_with_labels(&[(OUTCOME, "valid")])),
            invalid: counter!(VALIDATION, labels.clone_with_labels(&[(OUTCOME, "invalid")])),
        }
    }

    pub fn record(&self, is_valid: bool) {
        if is_valid {
            self.valid.increment(1);
        } else {
            self.invalid.increment(1);
        }
    }
}

impl Default for ValidatorMetrics {
    fn default() -> Self {
        ValidatorMetrics::new(&NO_LABEL)
    }
}
