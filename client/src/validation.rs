// Form field checks run before any request is sent

use std::sync::LazyLock;

use regex::Regex;

use crate::error::{SeaBlockError, SeaBlockResult};

/// Length of an Algorand wallet address
pub const WALLET_ADDRESS_LEN: usize = 58;

static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// `local@domain.tld` with no whitespace and a single `@`
pub fn is_valid_email(email: &str) -> bool {
    EMAIL.is_match(email)
}

/// Exactly 58 characters on a single line
pub fn is_valid_wallet_address(address: &str) -> bool {
    address.chars().count() == WALLET_ADDRESS_LEN
        && !address
            .chars()
            .any(|c| matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}'))
}

/// Fails with `message` when any of the values is blank
pub fn require_all(values: &[&str], message: &str) -> SeaBlockResult<()> {
    if values.iter().any(|v| v.trim().is_empty()) {
        Err(SeaBlockError::Validation(message.to_string()))
    } else {
        Ok(())
    }
}
