//! Rule document serialization.
//!
//! Translates security group records into the document the enforcement agent
//! reads from the rule cache. Field names (including the embedded spaces) are
//! part of the agent's wire contract.
//!
//! # Egress rules
//!
//! Every serialized rule carries `"direction": "ingress"`. An egress rule is
//! expressed by attaching its remote network to `"destination network"`
//! instead of `"source network"`. Existing agents depend on this layout; an
//! explicit egress direction would need a new payload version.

use secgroup_types::{Direction, SecurityGroup, SecurityGroupRule};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Action attached to a serialized rule.
///
/// Only permit entries are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RuleAction {
    Allow,
}

/// One enforcement-ready rule entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedRule {
    pub ethertype: u16,

    /// `None` matches all protocols.
    pub protocol: Option<u8>,

    #[serde(rename = "port start")]
    pub port_start: Option<u16>,

    #[serde(rename = "port end")]
    pub port_end: Option<u16>,

    /// IPv6-form remote network for ingress rules, otherwise empty.
    #[serde(rename = "source network")]
    pub source_network: String,

    /// IPv6-form remote network for egress rules, otherwise empty.
    #[serde(rename = "destination network")]
    pub destination_network: String,

    pub action: RuleAction,

    pub direction: Direction,
}

/// The document stored under one rule key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializedPayload {
    pub id: Uuid,
    pub rules: Vec<SerializedRule>,
}

/// Serializes security groups into one rule document.
///
/// Rules of all groups are concatenated in input order. The document id is
/// the first group's id; with no groups, a fresh id is generated and the rule
/// list is empty.
pub fn serialize_groups(groups: &[SecurityGroup]) -> SerializedPayload {
    let id = groups.first().map_or_else(Uuid::new_v4, |group| group.id);

    let rules = groups
        .iter()
        .flat_map(|group| group.rules.iter())
        .map(serialize_rule)
        .collect();

    SerializedPayload { id, rules }
}

/// Serializes a single rule.
pub fn serialize_rule(rule: &SecurityGroupRule) -> SerializedRule {
    let remote = rule
        .remote_ip_prefix
        .map(|prefix| prefix.to_ipv6_mapped().to_string())
        .unwrap_or_default();

    let (source_network, destination_network) = match rule.direction {
        Direction::Ingress => (remote, String::new()),
        Direction::Egress => (String::new(), remote),
    };

    SerializedRule {
        ethertype: rule.ethertype,
        protocol: rule.protocol,
        port_start: rule.port_range_min,
        port_end: rule.port_range_max,
        source_network,
        destination_network,
        action: RuleAction::Allow,
        direction: Direction::Ingress,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use secgroup_types::{ETHERTYPE_IPV4, ETHERTYPE_IPV6};
    use serde_json::{json, Value};

    fn remote_rule(direction: Direction) -> SecurityGroupRule {
        SecurityGroupRule::new(ETHERTYPE_IPV4, direction)
            .with_protocol(1)
            .with_remote_ip_prefix("192.168.0.0/24".parse().unwrap())
    }

    #[test]
    fn test_serialize_group_no_rules() {
        let group = SecurityGroup::with_random_id();
        let payload = serialize_groups(std::slice::from_ref(&group));

        assert_eq!(payload.id, group.id);
        assert!(payload.rules.is_empty());

        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["rules"], json!([]));
        assert!(value["id"].is_string());
    }

    #[test]
    fn test_serialize_no_groups_still_has_id() {
        let payload = serialize_groups(&[]);
        let value = serde_json::to_value(&payload).unwrap();
        assert!(value["id"].is_string());
        assert_eq!(value["rules"], json!([]));
    }

    #[test]
    fn test_serialize_group_with_rules() {
        let group = SecurityGroup::with_random_id().with_rule(
            SecurityGroupRule::new(ETHERTYPE_IPV4, Direction::Ingress)
                .with_protocol(6)
                .with_port_range(80, 443),
        );

        let payload = serialize_groups(&[group]);
        let rule = &payload.rules[0];
        assert_eq!(rule.ethertype, 0x800);
        assert_eq!(rule.protocol, Some(6));
        assert_eq!(rule.port_start, Some(80));
        assert_eq!(rule.port_end, Some(443));
        assert_eq!(rule.action, RuleAction::Allow);
        assert_eq!(rule.direction, Direction::Ingress);
        assert_eq!(rule.source_network, "");
        assert_eq!(rule.destination_network, "");
    }

    #[test]
    fn test_serialize_group_with_rules_and_remote_network() {
        let group = SecurityGroup::with_random_id().with_rule(remote_rule(Direction::Ingress));

        let payload = serialize_groups(&[group]);
        let rule = &payload.rules[0];
        assert_eq!(rule.ethertype, 0x800);
        assert_eq!(rule.protocol, Some(1));
        assert_eq!(rule.port_start, None);
        assert_eq!(rule.port_end, None);
        assert_eq!(rule.direction, Direction::Ingress);
        assert_eq!(rule.source_network, "::ffff:192.168.0.0/120");
        assert_eq!(rule.destination_network, "");
    }

    #[test]
    fn test_serialize_group_egress_rules() {
        let group = SecurityGroup::with_random_id().with_rule(remote_rule(Direction::Egress));

        let payload = serialize_groups(&[group]);
        let rule = &payload.rules[0];
        assert_eq!(rule.ethertype, 0x800);
        assert_eq!(rule.protocol, Some(1));
        assert_eq!(rule.action, RuleAction::Allow);
        assert_eq!(rule.direction, Direction::Ingress);
        assert_eq!(rule.destination_network, "::ffff:192.168.0.0/120");
        assert_eq!(rule.source_network, "");
        assert_eq!(rule.port_start, None);
        assert_eq!(rule.port_end, None);
    }

    #[test]
    fn test_ipv6_remote_network_unchanged() {
        let rule = SecurityGroupRule::new(ETHERTYPE_IPV6, Direction::Ingress)
            .with_remote_ip_prefix("2001:db8::/64".parse().unwrap());

        assert_eq!(serialize_rule(&rule).source_network, "2001:db8::/64");
    }

    #[test]
    fn test_wire_field_names() {
        let group = SecurityGroup::with_random_id().with_rule(remote_rule(Direction::Ingress));
        let value = serde_json::to_value(serialize_groups(&[group])).unwrap();

        let rule = &value["rules"][0];
        assert_eq!(
            rule,
            &json!({
                "ethertype": 2048,
                "protocol": 1,
                "port start": Value::Null,
                "port end": Value::Null,
                "source network": "::ffff:192.168.0.0/120",
                "destination network": "",
                "action": "allow",
                "direction": "ingress",
            })
        );
    }

    #[test]
    fn test_multiple_groups_concatenate_rules() {
        let first = SecurityGroup::with_random_id()
            .with_rule(SecurityGroupRule::new(ETHERTYPE_IPV4, Direction::Ingress).with_protocol(6))
            .with_rule(SecurityGroupRule::new(ETHERTYPE_IPV4, Direction::Ingress).with_protocol(17));
        let second = SecurityGroup::with_random_id()
            .with_rule(SecurityGroupRule::new(ETHERTYPE_IPV6, Direction::Egress));

        let payload = serialize_groups(&[first.clone(), second]);
        assert_eq!(payload.id, first.id);
        let protocols: Vec<_> = payload.rules.iter().map(|r| r.protocol).collect();
        assert_eq!(protocols, vec![Some(6), Some(17), None]);
    }

    #[test]
    fn test_payload_decodes_from_json() {
        let group = SecurityGroup::with_random_id().with_rule(remote_rule(Direction::Egress));
        let payload = serialize_groups(&[group]);

        let text = serde_json::to_string(&payload).unwrap();
        let decoded: SerializedPayload = serde_json::from_str(&text).unwrap();
        assert_eq!(decoded, payload);
    }
}
