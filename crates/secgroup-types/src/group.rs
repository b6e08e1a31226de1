//! Security group and security group rule records.
//!
//! These mirror the relational records owned by the control plane. The rule
//! cache client only reads them; it never creates, validates, or persists them.

use crate::{IpPrefix, ParseError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Ethertype for IPv4 traffic.
pub const ETHERTYPE_IPV4: u16 = 0x0800;

/// Ethertype for IPv6 traffic.
pub const ETHERTYPE_IPV6: u16 = 0x86dd;

/// Traffic direction a rule applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Traffic entering the interface.
    Ingress,
    /// Traffic leaving the interface.
    Egress,
}

impl Direction {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Direction::Ingress => "ingress",
            Direction::Egress => "egress",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Direction {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ingress" => Ok(Direction::Ingress),
            "egress" => Ok(Direction::Egress),
            other => Err(ParseError::InvalidDirection(other.to_string())),
        }
    }
}

/// A single firewall permit entry.
///
/// Absent optional fields widen the match: no protocol means all protocols,
/// no port range means all ports, no remote prefix means any remote network.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroupRule {
    /// Layer-2 protocol identifier (e.g. [`ETHERTYPE_IPV4`]).
    pub ethertype: u16,

    /// IP protocol number.
    #[serde(default)]
    pub protocol: Option<u8>,

    #[serde(default)]
    pub port_range_min: Option<u16>,

    #[serde(default)]
    pub port_range_max: Option<u16>,

    pub direction: Direction,

    /// Remote network the rule is restricted to.
    #[serde(default)]
    pub remote_ip_prefix: Option<IpPrefix>,
}

impl SecurityGroupRule {
    /// Creates a rule matching every protocol, port and remote network.
    pub fn new(ethertype: u16, direction: Direction) -> Self {
        Self {
            ethertype,
            protocol: None,
            port_range_min: None,
            port_range_max: None,
            direction,
            remote_ip_prefix: None,
        }
    }

    /// Restricts the rule to an IP protocol number.
    pub fn with_protocol(mut self, protocol: u8) -> Self {
        self.protocol = Some(protocol);
        self
    }

    /// Restricts the rule to an inclusive port range.
    pub fn with_port_range(mut self, min: u16, max: u16) -> Self {
        self.port_range_min = Some(min);
        self.port_range_max = Some(max);
        self
    }

    /// Restricts the rule to a remote network.
    pub fn with_remote_ip_prefix(mut self, prefix: IpPrefix) -> Self {
        self.remote_ip_prefix = Some(prefix);
        self
    }
}

/// A named collection of firewall rules applied to a network interface.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityGroup {
    /// Identifier assigned by the store of record.
    pub id: Uuid,

    /// Rules in the order the store of record returned them.
    #[serde(default)]
    pub rules: Vec<SecurityGroupRule>,
}

impl SecurityGroup {
    /// Creates an empty group with the given identifier.
    pub fn new(id: Uuid) -> Self {
        Self {
            id,
            rules: Vec::new(),
        }
    }

    /// Creates an empty group with a freshly generated identifier.
    pub fn with_random_id() -> Self {
        Self::new(Uuid::new_v4())
    }

    /// Appends a rule to the group.
    pub fn with_rule(mut self, rule: SecurityGroupRule) -> Self {
        self.rules.push(rule);
        self
    }
}
