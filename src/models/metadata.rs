//! IP metadata payload model
//!
//! Serde model of the lookup endpoint's response body. The fetch controller
//! treats this as an opaque payload: it parses and passes it through without
//! acting on individual fields.

use serde::{Deserialize, Serialize};

/// Metadata returned for a resolved IP address.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IpMetadata {
    /// Whether the provider resolved the address
    pub success: bool,
    /// The address the response describes
    pub ip: String,
    /// Country name
    pub country: String,
    /// ISO 3166-1 alpha-2 country code
    pub country_code: String,
    /// Timezone of the resolved location
    pub timezone: TimezoneInfo,
    /// Country flag, when the provider includes one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag: Option<FlagInfo>,
    /// Provider message, typically present when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Timezone block of the metadata payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimezoneInfo {
    /// IANA timezone identifier, e.g. "America/Los_Angeles"
    pub id: String,
    /// UTC offset in seconds
    pub offset: i32,
}

/// Flag block of the metadata payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlagInfo {
    /// Flag emoji, when available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub emoji: Option<String>,
}
