//! Email syntax check
//!
//! Deliberately shallow: one `@`, something on each side, and a dot in the
//! domain. Deliverability is the endpoint's problem.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref EMAIL_PATTERN: Regex = Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap();
}

pub fn is_valid_email(input: &str) -> bool {
    EMAIL_PATTERN.is_match(input.trim())
}
