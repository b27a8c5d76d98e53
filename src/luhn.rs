//! Luhn check digits as mandated by ISO/IEC 7812-1.

use crate::str_utils::digit_values;
use crate::validator::Validator;

/// Computes the check digit to append to `payload`.
///
/// Walking from the right, the digit closest to the future check digit is doubled,
/// then every second digit after it. Returns `None` for empty or non-digit input.
pub fn compute_check_digit(payload: &str) -> Option<u32> {
    if payload.is_empty() {
        return None;
    }
    digit_values(payload).map(|digits| check_digit(&digits))
}

/// Same as [compute_check_digit] over decimal digit values. Every value must be 0-9.
pub(crate) fn check_digit(digits: &[u32]) -> u32 {
    let mut sum: u32 = 0;
    let mut doubled = true;
    for &digit in digits.iter().rev() {
        if !doubled {
            sum += digit
        } else if digit > 4 {
            sum += digit * 2 - 9;
        } else {
            sum += digit * 2
        }
        doubled = !doubled;
    }
    (10 - (sum % 10)) % 10
}

/// Validates a digit string whose last character is its Luhn check digit.
pub fn is_valid_check_digit(full_digits: &str) -> bool {
    let mut chars = full_digits.chars();
    let Some(check_digit) = chars.next_back().and_then(|c| c.to_digit(10)) else {
        return false;
    };
    compute_check_digit(chars.as_str()) == Some(check_digit)
}

/// Strict Luhn validator: every character must be a digit.
pub struct LuhnChecksum;

impl Validator for LuhnChecksum {
    fn is_valid(&self, input: &str) -> bool {
        is_valid_check_digit(input)
    }
}
