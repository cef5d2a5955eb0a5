//! Payload models for the lookup layer
//!
//! Defines the DTO for the metadata payload returned by the lookup endpoint
//! and the address validation helper collaborators call before building a
//! lookup key.

pub mod address;
pub mod metadata;

// Re-export commonly used types
pub use address::is_valid_ip;
pub use metadata::{FlagInfo, IpMetadata, TimezoneInfo};
