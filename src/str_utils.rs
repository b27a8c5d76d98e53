/// Returns true when every character is an ASCII decimal digit. An empty string is digits-only.
pub fn is_digits_only(input: &str) -> bool {
    input.bytes().all(|b| b.is_ascii_digit())
}

/// Decimal values of `input`, or `None` as soon as a non-digit character is found.
pub fn digit_values(input: &str) -> Option<Vec<u32>> {
    input.chars().map(|c| c.to_digit(10)).collect()
}

/// Extracts the fixed-width field `[start, start + width)` counted in characters.
///
/// The field is only returned when the input is long enough to hold all of it, so a
/// short input leaves trailing fields unset instead of producing partial values.
pub fn fixed_field(chars: &[char], start: usize, width: usize) -> Option<String> {
    chars
        .get(start..start + width)
        .map(|field| field.iter().collect())
}
