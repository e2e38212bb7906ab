/// Order-sensitive rolling hash over the serialized fingerprint.
///
/// Each code point folds in as `hash = hash * 31 + cp` in wrapping 32-bit
/// signed arithmetic; the magnitude renders in base 36. Deliberately cheap
/// and non-cryptographic: the contract is determinism for identical input
/// and a fixed input order, not collision resistance.
pub fn fingerprint_digest(input: &str) -> String {
    let mut hash: i32 = 0;
    for cp in input.chars() {
        hash = hash.wrapping_mul(31).wrapping_add(cp as i32);
    }
    to_base36(hash.unsigned_abs())
}

fn to_base36(mut n: u32) -> String {
    const DIGITS: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(DIGITS[(n % 36) as usize] as char);
        n /= 36;
    }
    digits.iter().rev().collect()
}
