//! Store key derivation.
//!
//! One rule document is stored per (device, interface) pair. The key is the
//! device identifier and the canonical MAC text joined by a single `.`:
//!
//! ```text
//! 3f1c...e2a7.aa:bb:cc:dd:ee:ff
//! ```
//!
//! The key is a plain concatenation, not a hash. A device identifier that
//! itself contains `.` can alias another pair; identifiers are UUIDs in
//! practice, so this is accepted.
//!
//! Earlier writers rendered the MAC as uppercase hyphenated hex
//! (`AA-BB-CC-DD-EE-FF`). Agents that still look keys up in that form will
//! not find documents written here; both sides must move together.

use secgroup_types::MacAddress;

/// Separator between the device identifier and the MAC address.
pub const KEY_SEPARATOR: char = '.';

/// Returns the store key for a device interface.
///
/// `mac_address` is the 48-bit integer form of the hardware address; it is
/// rendered in lowercase colon-separated hex. `device_id` is embedded as-is.
pub fn rule_key(device_id: &str, mac_address: u64) -> String {
    format!(
        "{}{}{}",
        device_id,
        KEY_SEPARATOR,
        MacAddress::from_u64(mac_address)
    )
}
