/// Weighted modulo-11 check digit over a numeric string.
///
/// Digits are weighted right to left, weights cycling 2 through 9 and
/// wrapping back to 2. The digit is `11 - (sum mod 11)`, with the results
/// 10 and 11 both mapping to 0 per the bank convention. Callers must pass
/// an all-digit string; anything else is skipped.
pub fn check_digit(digits: &str) -> u8 {
    let mut weight: u32 = 2;
    let mut sum: u64 = 0;

    for d in digits.chars().rev().filter_map(|c| c.to_digit(10)) {
        sum += u64::from(d * weight);
        weight = if weight == 9 { 2 } else { weight + 1 };
    }

    match 11 - (sum % 11) {
        10 | 11 => 0,
        d => d as u8,
    }
}
