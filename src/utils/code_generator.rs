//! Short code generation and validation.
//!
//! Random codes come from the OS CSPRNG via `getrandom`; user-supplied
//! custom codes are validated for format and reserved words before the
//! uniqueness check.

use crate::error::AppError;
use serde_json::json;

/// Alphabet for generated short codes.
const ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Length of generated short codes.
const CODE_LENGTH: usize = 6;

/// Largest byte value accepted by rejection sampling; a multiple of the
/// alphabet size, so `byte % 62` stays uniform.
const REJECTION_BOUND: u8 = (ALPHABET.len() * 4) as u8;

/// Route words that cannot be used as short codes.
const RESERVED_CODES: &[&str] = &["api", "health", "dashboard", "urls", "static"];

/// Generates a random 6-character alphanumeric short code.
///
/// Bytes are drawn from the system random number generator and mapped onto
/// the 62-symbol alphabet with rejection sampling to keep the distribution
/// uniform.
///
/// # Panics
///
/// Panics if the system random number generator fails (extremely rare).
pub fn generate_code() -> String {
    let mut code = String::with_capacity(CODE_LENGTH);

    while code.len() < CODE_LENGTH {
        let mut buffer = [0u8; 16];
        getrandom::fill(&mut buffer).expect("Failed to generate random bytes");

        for byte in buffer {
            if byte < REJECTION_BOUND {
                code.push(ALPHABET[byte as usize % ALPHABET.len()] as char);
                if code.len() == CODE_LENGTH {
                    break;
                }
            }
        }
    }

    code
}

/// Validates a user-provided custom short code.
///
/// # Rules
///
/// - Length: 3-20 characters
/// - Allowed characters: ASCII letters and digits
/// - Cannot be a reserved route word (case-insensitive)
///
/// Uniqueness against existing codes is checked separately by the link
/// service.
///
/// # Errors
///
/// Returns [`AppError::Validation`] if any rule is violated.
pub fn validate_custom_code(code: &str) -> Result<(), AppError> {
    if code.len() < 3 || code.len() > 20 {
        return Err(AppError::bad_request(
            "Custom code must be between 3 and 20 characters",
            json!({ "code": code, "length": code.len() }),
        ));
    }

    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AppError::bad_request(
            "Custom code may only contain letters and digits",
            json!({ "code": code }),
        ));
    }

    if RESERVED_CODES
        .iter()
        .any(|reserved| code.eq_ignore_ascii_case(reserved))
    {
        return Err(AppError::bad_request(
            "Custom code is reserved",
            json!({ "code": code }),
        ));
    }

    Ok(())
}
