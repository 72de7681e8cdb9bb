//! CPF (Brazilian national tax ID) checksum

/// Validate a CPF using both weighted-sum check digits.
///
/// Separators are ignored, so both `52998224725` and `529.982.247-25` are
/// accepted. Anything that does not reduce to exactly 11 digits is rejected,
/// as is any repdigit (`000.000.000-00` .. `999.999.999-99`), which would
/// otherwise pass the arithmetic.
pub fn is_valid_cpf(input: &str) -> bool {
    let digits: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 {
        return false;
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return false;
    }

    check_digit(&digits[..9]) == digits[9] && check_digit(&digits[..10]) == digits[10]
}

/// Weights run from `len + 1` down to 2.
fn check_digit(digits: &[u32]) -> u32 {
    let top = digits.len() as u32 + 1;
    let sum: u32 = digits
        .iter()
        .enumerate()
        .map(|(i, d)| d * (top - i as u32))
        .sum();

    match (sum * 10) % 11 {
        r if r >= 10 => 0,
        r => r,
    }
}
