//! crates/recruitment_core/src/validation.rs
//!
//! Phone number and NIK normalization, validation and input masking.

use regex::Regex;
use std::sync::LazyLock;

static PHONE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^0[0-9]{9,12}$").expect("phone pattern is valid"));
static NIK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]{16}$").expect("NIK pattern is valid"));

pub const NIK_LENGTH: usize = 16;

fn digits_only(input: &str) -> String {
    input.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Strips everything but digits and turns a leading `62` country code into `0`.
///
/// `"+62 812-3456-7890"` becomes `"081234567890"`. The result never starts with
/// `62` again, so normalizing twice is the same as normalizing once.
pub fn normalize_phone(input: &str) -> String {
    let cleaned = digits_only(input);
    match cleaned.strip_prefix("62") {
        Some(rest) => format!("0{rest}"),
        None => cleaned,
    }
}

/// Indonesian mobile format after normalization: `0` followed by 9 to 12 digits.
pub fn is_valid_phone(phone: &str) -> bool {
    PHONE_RE.is_match(phone)
}

/// A NIK is exactly 16 ASCII digits.
pub fn is_valid_nik(nik: &str) -> bool {
    NIK_RE.is_match(nik)
}

/// Keeps the digits of a NIK being typed, capped at 16.
pub fn mask_nik_input(input: &str) -> String {
    digits_only(input).chars().take(NIK_LENGTH).collect()
}

/// Keeps the digits of a phone number being typed and forces the leading `0`.
pub fn mask_phone_input(input: &str) -> String {
    let value = digits_only(input);
    if value.is_empty() || value.starts_with('0') {
        value
    } else {
        format!("0{value}")
    }
}
