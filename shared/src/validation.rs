//! Validation utilities for the pharmacy back-office
//!
//! Includes Brazil-specific validations (CPF, phone) used by the client
//! registry.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use crate::models::MAX_MOVEMENT_NOTE_LEN;

// ============================================================================
// Catalog Validations
// ============================================================================

/// Validate a display name (medication, category, client) is non-empty
pub fn validate_name(name: &str) -> Result<(), &'static str> {
    if name.trim().is_empty() {
        return Err("Name must not be empty");
    }
    Ok(())
}

/// Validate a price is non-negative
pub fn validate_price(price: Decimal) -> Result<(), &'static str> {
    if price < Decimal::ZERO {
        return Err("Price cannot be negative");
    }
    Ok(())
}

/// Validate a stored stock level is non-negative
pub fn validate_stock_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity < 0 {
        return Err("Stock quantity cannot be negative");
    }
    Ok(())
}

/// Validate a movement or sale-line quantity is strictly positive
pub fn validate_movement_quantity(quantity: i32) -> Result<(), &'static str> {
    if quantity <= 0 {
        return Err("Quantity must be greater than zero");
    }
    Ok(())
}

/// Validate an optional movement note fits the ledger column
pub fn validate_note(note: &str) -> Result<(), &'static str> {
    if note.chars().count() > MAX_MOVEMENT_NOTE_LEN {
        return Err("Note must be at most 500 characters");
    }
    Ok(())
}

// ============================================================================
// General Validations
// ============================================================================

/// Validate email format (basic check)
pub fn validate_email(email: &str) -> Result<(), &'static str> {
    if email.contains('@') && email.contains('.') && email.len() >= 5 {
        Ok(())
    } else {
        Err("Invalid email format")
    }
}

// ============================================================================
// Brazil-Specific Validations
// ============================================================================

/// Validate a Brazilian CPF (Cadastro de Pessoas Físicas)
///
/// 11-digit number with two mod-11 check digits. Accepts punctuated input
/// ("529.982.247-25"); sequences of a single repeated digit are rejected
/// even though their checksum is formally valid.
pub fn validate_cpf(cpf: &str) -> Result<(), &'static str> {
    let digits: Vec<u32> = cpf.chars().filter_map(|c| c.to_digit(10)).collect();

    if digits.len() != 11 {
        return Err("CPF must be 11 digits");
    }
    if digits.iter().all(|&d| d == digits[0]) {
        return Err("CPF cannot be a single repeated digit");
    }

    // Check digit over the first `len` digits, weights len+1 down to 2
    let check_digit = |len: usize| -> u32 {
        let sum: u32 = digits
            .iter()
            .take(len)
            .enumerate()
            .map(|(i, &d)| d * (len as u32 + 1 - i as u32))
            .sum();
        let rem = (sum * 10) % 11;
        if rem == 10 {
            0
        } else {
            rem
        }
    };

    if check_digit(9) != digits[9] || check_digit(10) != digits[10] {
        return Err("Invalid CPF checksum");
    }

    Ok(())
}

/// Canonical 11-digit form of a CPF, punctuation stripped
pub fn normalize_cpf(cpf: &str) -> String {
    cpf.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Validate a Brazilian phone number
/// Accepts: (11) 91234-5678, 1132654321, +55 11 91234-5678
pub fn validate_phone(phone: &str) -> Result<(), &'static str> {
    let digits: String = phone.chars().filter(|c| c.is_ascii_digit()).collect();

    // Landline (10) or mobile (11): area code + number
    if digits.len() == 10 || digits.len() == 11 {
        return Ok(());
    }
    // International format with the 55 country code
    if (digits.len() == 12 || digits.len() == 13) && digits.starts_with("55") {
        return Ok(());
    }

    Err("Invalid Brazilian phone number format")
}

/// Validate a birth date is not in the future
pub fn validate_birth_date(birth_date: NaiveDate, today: NaiveDate) -> Result<(), &'static str> {
    if birth_date > today {
        return Err("Birth date cannot be in the future");
    }
    Ok(())
}

// ============================================================================
// Client Eligibility
// ============================================================================

/// Whole years completed on `as_of`
///
/// Standard "has the birthday occurred yet" rule: the year difference is
/// decremented when `as_of`'s month/day precede the birthday's.
pub fn age_on(birth_date: NaiveDate, as_of: NaiveDate) -> i32 {
    let mut age = as_of.year() - birth_date.year();
    if (as_of.month(), as_of.day()) < (birth_date.month(), birth_date.day()) {
        age -= 1;
    }
    age
}

/// Whether a client of the given age may be named on a sale
pub fn is_of_legal_age(age: i32, minimum: i32) -> bool {
    age >= minimum
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    // ========================================================================
    // Catalog Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_name() {
        assert!(validate_name("Dipirona").is_ok());
        assert!(validate_name("").is_err());
        assert!(validate_name("   ").is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Decimal::ZERO).is_ok());
        assert!(validate_price(Decimal::from(10)).is_ok());
        assert!(validate_price(Decimal::from(-1)).is_err());
    }

    #[test]
    fn test_validate_stock_quantity() {
        assert!(validate_stock_quantity(0).is_ok());
        assert!(validate_stock_quantity(500).is_ok());
        assert!(validate_stock_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_movement_quantity() {
        assert!(validate_movement_quantity(1).is_ok());
        assert!(validate_movement_quantity(0).is_err());
        assert!(validate_movement_quantity(-5).is_err());
    }

    #[test]
    fn test_validate_note() {
        assert!(validate_note("").is_ok());
        assert!(validate_note(&"x".repeat(500)).is_ok());
        assert!(validate_note(&"x".repeat(501)).is_err());
    }

    // ========================================================================
    // General Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_email_valid() {
        assert!(validate_email("test@example.com").is_ok());
        assert!(validate_email("user.name@dominio.com.br").is_ok());
    }

    #[test]
    fn test_validate_email_invalid() {
        assert!(validate_email("invalid").is_err());
        assert!(validate_email("no@domain").is_err());
        assert!(validate_email("@.").is_err());
    }

    // ========================================================================
    // Brazil-Specific Validation Tests
    // ========================================================================

    #[test]
    fn test_validate_cpf_valid() {
        assert!(validate_cpf("52998224725").is_ok());
        // Punctuated form is accepted
        assert!(validate_cpf("529.982.247-25").is_ok());
    }

    #[test]
    fn test_validate_cpf_invalid() {
        // Wrong length
        assert!(validate_cpf("123456789").is_err());
        // Bad checksum
        assert!(validate_cpf("52998224726").is_err());
        assert!(validate_cpf("123.456.789-00").is_err());
        // Repeated digit sequences are rejected outright
        assert!(validate_cpf("111.111.111-11").is_err());
        assert!(validate_cpf("00000000000").is_err());
    }

    #[test]
    fn test_normalize_cpf() {
        assert_eq!(normalize_cpf("529.982.247-25"), "52998224725");
        assert_eq!(normalize_cpf("52998224725"), "52998224725");
    }

    #[test]
    fn test_validate_phone_valid() {
        // Mobile with area code
        assert!(validate_phone("11912345678").is_ok());
        // Landline with area code
        assert!(validate_phone("1132654321").is_ok());
        // Punctuated
        assert!(validate_phone("(11) 91234-5678").is_ok());
        // International format
        assert!(validate_phone("+55 11 91234-5678").is_ok());
    }

    #[test]
    fn test_validate_phone_invalid() {
        assert!(validate_phone("12345").is_err());
        assert!(validate_phone("123456789012345").is_err());
        assert!(validate_phone("abcdefghij").is_err());
    }

    #[test]
    fn test_validate_birth_date() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert!(validate_birth_date(NaiveDate::from_ymd_opt(1990, 1, 1).unwrap(), today).is_ok());
        assert!(validate_birth_date(today, today).is_ok());
        assert!(
            validate_birth_date(NaiveDate::from_ymd_opt(2024, 6, 16).unwrap(), today).is_err()
        );
    }

    // ========================================================================
    // Eligibility Tests
    // ========================================================================

    #[test]
    fn test_age_before_birthday() {
        let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
        let as_of = NaiveDate::from_ymd_opt(2024, 6, 14).unwrap();
        assert_eq!(age_on(birth, as_of), 23);
    }

    #[test]
    fn test_age_on_birthday() {
        let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
        let as_of = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert_eq!(age_on(birth, as_of), 24);
    }

    #[test]
    fn test_age_after_birthday() {
        let birth = NaiveDate::from_ymd_opt(2000, 6, 15).unwrap();
        let as_of = NaiveDate::from_ymd_opt(2024, 12, 1).unwrap();
        assert_eq!(age_on(birth, as_of), 24);
    }

    #[test]
    fn test_eighteenth_birthday_is_eligible() {
        let birth = NaiveDate::from_ymd_opt(2006, 3, 10).unwrap();
        // Exactly on the 18th birthday
        let on_birthday = NaiveDate::from_ymd_opt(2024, 3, 10).unwrap();
        assert_eq!(age_on(birth, on_birthday), 18);
        assert!(is_of_legal_age(age_on(birth, on_birthday), 18));

        // One day before
        let day_before = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        assert_eq!(age_on(birth, day_before), 17);
        assert!(!is_of_legal_age(age_on(birth, day_before), 18));
    }

    #[test]
    fn test_age_leap_day_birthday() {
        let birth = NaiveDate::from_ymd_opt(2004, 2, 29).unwrap();
        // On Feb 28 of a non-leap year the birthday has not occurred yet
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2025, 2, 28).unwrap()), 20);
        assert_eq!(age_on(birth, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()), 21);
    }
}
