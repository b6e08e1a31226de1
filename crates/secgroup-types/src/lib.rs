//! Domain types for security group rule propagation.
//!
//! This crate provides type-safe representations of the records a control
//! plane hands to the rule cache client:
//!
//! - [`MacAddress`]: 48-bit Ethernet MAC addresses (integer and text forms)
//! - [`IpAddress`]: IPv4 and IPv6 addresses
//! - [`IpPrefix`]: IP network prefixes (CIDR notation) with IPv6-mapped rendering
//! - [`SecurityGroup`] / [`SecurityGroupRule`]: firewall permit entries grouped
//!   under a group identifier
//! - [`Direction`]: rule traffic direction

mod group;
mod ip;
mod mac;

pub use group::{Direction, SecurityGroup, SecurityGroupRule, ETHERTYPE_IPV4, ETHERTYPE_IPV6};
pub use ip::{IpAddress, IpPrefix};
pub use mac::MacAddress;

/// Common error type for parsing failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error("invalid MAC address format: {0}")]
    InvalidMacAddress(String),

    #[error("invalid IP address format: {0}")]
    InvalidIpAddress(String),

    #[error("invalid IP prefix format: {0}")]
    InvalidIpPrefix(String),

    #[error("invalid rule direction: {0} (must be ingress or egress)")]
    InvalidDirection(String),
}
