//! Address validation helper
//!
//! Gate collaborators run user input through before building a lookup key.
//! Any string accepted here is usable verbatim (after trimming) as a fetch
//! controller key.

use std::net::IpAddr;

/// Returns true when `input` is a well-formed IPv4 or IPv6 address.
///
/// Parsing is strict: leading-zero octets, missing groups, and trailing
/// garbage are all rejected. Surrounding whitespace is not accepted; callers
/// trim before validating.
pub fn is_valid_ip(input: &str) -> bool {
    input.parse::<IpAddr>().is_ok()
}
