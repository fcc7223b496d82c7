//! # Validation Module
//!
//! Normalization and validation of person and service fields.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (pure)                                           │
//! │  ├── Structural checks: name, phone, CPF, email domain                 │
//! │  └── Normalization: digits only → display format                       │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: salon-db services (inside a transaction)                     │
//! │  └── Uniqueness of email / phone / CPF against stored records          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── UNIQUE constraints                                                │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Functions here never short-circuit: each returns every violation it
//! found so the caller can report them together.
//!
//! ## Usage
//! ```rust
//! use salon_core::validation::{format_phone, normalize_digits, validate_person_fields};
//!
//! let violations = validate_person_fields("Maria Silva", "maria@gmail.com", "11987654321", None);
//! assert!(violations.is_empty());
//!
//! let digits = normalize_digits("(11) 98765-4321");
//! assert_eq!(format_phone(&digits), "(11) 98765-4321");
//! ```

use crate::error::Violation;
use crate::money::Money;
use crate::{ALLOWED_EMAIL_DOMAINS, PHONE_DIGITS, TAX_ID_DIGITS};

// =============================================================================
// Normalization
// =============================================================================

/// Strips every non-digit character.
///
/// ## Example
/// ```rust
/// use salon_core::validation::normalize_digits;
///
/// assert_eq!(normalize_digits("123.456.789-09"), "12345678909");
/// assert_eq!(normalize_digits("no digits"), "");
/// ```
pub fn normalize_digits(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Formats 11 digits as `(DD) DDDDD-DDDD`.
///
/// Expects already validated input; anything that is not 11 ASCII digits is
/// returned unchanged.
pub fn format_phone(digits: &str) -> String {
    if !is_digit_run(digits, PHONE_DIGITS) {
        return digits.to_string();
    }
    format!("({}) {}-{}", &digits[0..2], &digits[2..7], &digits[7..11])
}

/// Formats 11 digits as `DDD.DDD.DDD-DD`.
///
/// Expects already validated input; anything that is not 11 ASCII digits is
/// returned unchanged.
pub fn format_tax_id(digits: &str) -> String {
    if !is_digit_run(digits, TAX_ID_DIGITS) {
        return digits.to_string();
    }
    format!(
        "{}.{}.{}-{}",
        &digits[0..3],
        &digits[3..6],
        &digits[6..9],
        &digits[9..11]
    )
}

/// Normalizes raw phone input to display form, if it has 11 digits.
pub fn normalized_phone(raw: &str) -> Option<String> {
    let digits = normalize_digits(raw);
    (digits.len() == PHONE_DIGITS).then(|| format_phone(&digits))
}

/// Normalizes raw CPF input to display form, if it has 11 digits.
pub fn normalized_tax_id(raw: &str) -> Option<String> {
    let digits = normalize_digits(raw);
    (digits.len() == TAX_ID_DIGITS).then(|| format_tax_id(&digits))
}

fn is_digit_run(s: &str, len: usize) -> bool {
    s.len() == len && s.bytes().all(|b| b.is_ascii_digit())
}

// =============================================================================
// Person Fields
// =============================================================================

/// Validates the contact fields of a client or employee.
///
/// ## Rules (all evaluated, in this order)
/// 1. name has at least two whitespace-separated words
/// 2. phone has exactly 11 digits
/// 3. CPF has exactly 11 digits (only when `tax_id` is supplied)
/// 4. email has exactly one `@` and an allow-listed provider
///
/// Uniqueness is NOT checked here; it needs the stored records.
///
/// ## Example
/// ```rust
/// use salon_core::validation::validate_person_fields;
/// use salon_core::Violation;
///
/// let violations = validate_person_fields("Ana Souza", "ana@badhost.xyz", "11987654321", None);
/// assert_eq!(
///     violations,
///     vec![Violation::EmailDomainNotAllowed { domain: "badhost".to_string() }]
/// );
/// ```
pub fn validate_person_fields(
    name: &str,
    email: &str,
    phone: &str,
    tax_id: Option<&str>,
) -> Vec<Violation> {
    let mut violations = Vec::new();

    if name.split_whitespace().count() < 2 {
        violations.push(Violation::IncompleteName);
    }

    if normalize_digits(phone).len() != PHONE_DIGITS {
        violations.push(Violation::PhoneDigits);
    }

    if let Some(tax_id) = tax_id {
        if normalize_digits(tax_id).len() != TAX_ID_DIGITS {
            violations.push(Violation::TaxIdDigits);
        }
    }

    if let Some(violation) = check_email(email) {
        violations.push(violation);
    }

    violations
}

/// Returns the first label of the email's domain.
///
/// `None` when the address does not contain exactly one `@`.
///
/// ## Example
/// ```rust
/// use salon_core::validation::email_domain_label;
///
/// assert_eq!(email_domain_label("ana@hotmail.com.br"), Some("hotmail"));
/// assert_eq!(email_domain_label("ana.hotmail.com"), None);
/// ```
pub fn email_domain_label(email: &str) -> Option<&str> {
    let (_, domain) = email.trim().split_once('@')?;
    if domain.contains('@') {
        return None;
    }
    domain.split('.').next()
}

fn check_email(email: &str) -> Option<Violation> {
    let Some(label) = email_domain_label(email) else {
        return Some(Violation::InvalidEmailFormat);
    };

    let label = label.to_lowercase();
    if ALLOWED_EMAIL_DOMAINS.contains(&label.as_str()) {
        None
    } else {
        Some(Violation::EmailDomainNotAllowed { domain: label })
    }
}

// =============================================================================
// Service Fields
// =============================================================================

/// Validates a service offering.
///
/// ## Rules
/// - name must not be empty or whitespace
/// - price must be greater than zero
pub fn validate_service_fields(name: &str, price: Money) -> Vec<Violation> {
    let mut violations = Vec::new();

    if name.trim().is_empty() {
        violations.push(Violation::ServiceNameRequired);
    }

    if !price.is_positive() {
        violations.push(Violation::PriceNotPositive);
    }

    violations
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_digits() {
        assert_eq!(normalize_digits("(11) 98765-4321"), "11987654321");
        assert_eq!(normalize_digits(" 1 1-9 "), "119");
        assert_eq!(normalize_digits(""), "");
    }

    #[test]
    fn test_phone_variants_normalize_identically() {
        let expected = Some("(11) 98765-4321".to_string());
        assert_eq!(normalized_phone("11987654321"), expected);
        assert_eq!(normalized_phone("(11) 98765-4321"), expected);
        assert_eq!(normalized_phone("11 98765 4321"), expected);
        assert_eq!(normalized_phone("+11.98765.4321"), expected);
        assert_eq!(normalized_phone("1198765432"), None);
    }

    #[test]
    fn test_tax_id_format() {
        assert_eq!(format_tax_id("12345678909"), "123.456.789-09");
        assert_eq!(
            normalized_tax_id("123.456.789-09"),
            Some("123.456.789-09".to_string())
        );
        assert_eq!(normalized_tax_id("123"), None);
    }

    #[test]
    fn test_format_leaves_bad_input_alone() {
        assert_eq!(format_phone("123"), "123");
        assert_eq!(format_tax_id("abcdefghijk"), "abcdefghijk");
    }

    #[test]
    fn test_valid_person() {
        assert!(validate_person_fields(
            "Maria Silva",
            "maria@gmail.com",
            "11987654321",
            Some("123.456.789-09")
        )
        .is_empty());
    }

    #[test]
    fn test_name_needs_two_words() {
        let v = validate_person_fields("  Maria  ", "maria@gmail.com", "11987654321", None);
        assert_eq!(v, vec![Violation::IncompleteName]);

        let v = validate_person_fields("Maria   da Silva", "maria@gmail.com", "11987654321", None);
        assert!(v.is_empty());
    }

    #[test]
    fn test_all_violations_collected_in_order() {
        let v = validate_person_fields("Maria", "maria@yahoo.com", "1234", Some("99"));
        assert_eq!(
            v,
            vec![
                Violation::IncompleteName,
                Violation::PhoneDigits,
                Violation::TaxIdDigits,
                Violation::EmailDomainNotAllowed {
                    domain: "yahoo".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_tax_id_skipped_when_absent() {
        let v = validate_person_fields("Maria Silva", "maria@gmail.com", "11987654321", None);
        assert!(!v.contains(&Violation::TaxIdDigits));
    }

    #[test]
    fn test_email_without_at_only_reports_format() {
        let v = validate_person_fields("Maria Silva", "userexample.com", "11987654321", None);
        assert_eq!(v, vec![Violation::InvalidEmailFormat]);
    }

    #[test]
    fn test_email_with_two_ats_is_malformed() {
        let v = validate_person_fields("Maria Silva", "a@b@gmail.com", "11987654321", None);
        assert_eq!(v, vec![Violation::InvalidEmailFormat]);
    }

    #[test]
    fn test_email_domain_names_rejected_label() {
        let v = validate_person_fields("Maria Silva", "user@badhost.xyz", "11987654321", None);
        assert_eq!(
            v,
            vec![Violation::EmailDomainNotAllowed {
                domain: "badhost".to_string()
            }]
        );
    }

    #[test]
    fn test_email_domain_case_insensitive() {
        for email in ["a@GMAIL.com", "a@Hotmail.com.br", "a@outlook"] {
            assert!(check_email(email).is_none(), "{email} should be accepted");
        }
    }

    #[test]
    fn test_service_fields() {
        assert!(validate_service_fields("Manicure", Money::from_cents(3500)).is_empty());
        assert_eq!(
            validate_service_fields("   ", Money::zero()),
            vec![Violation::ServiceNameRequired, Violation::PriceNotPositive]
        );
        assert_eq!(
            validate_service_fields("Escova", Money::from_cents(-1)),
            vec![Violation::PriceNotPositive]
        );
    }
}
