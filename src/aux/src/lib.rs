//! # aux
//! `aux` is a collection of small helpers shared across the tool,
//! mostly hardware-address formatting for records and diagnostics.

// ---------------------------- Aux Functions ---------------------------------

/// Format a MAC address as lowercase dash-separated hex
/// ## Description
/// Produces the `aa-bb-cc-dd-ee-ff` form used for the station and
/// access-point fields of an output record.
/// ## Example
/// **Basic usage:**
/// ```
///     let mac = [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff];
///     assert_eq!("aa-bb-cc-dd-ee-ff", aux::mac_dashed(&mac));
/// ```
pub fn mac_dashed(mac: &[u8; 6]) -> String {
    mac.iter()
        .map(|b| format!("{b:02x}"))
        .collect::<Vec<_>>()
        .join("-")
}

/// Format a MAC address as lowercase hex with no separators
/// ## Description
/// Produces the compact `aabbccddeeff` form used as the gecos-like
/// field of an output record.
/// ## Example
/// **Basic usage:**
/// ```
///     let mac = [0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff];
///     assert_eq!("aabbccddeeff", aux::mac_compact(&mac));
/// ```
pub fn mac_compact(mac: &[u8; 6]) -> String {
    hex::encode(mac)
}

/// Format a MAC address as uppercase colon-separated hex
/// ## Description
/// The `AA:BB:CC:DD:EE:FF` form used when naming an access point in
/// diagnostics.
pub fn mac_colon(mac: &[u8; 6]) -> String {
    mac.iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(":")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dashed() {
        assert_eq!("00-11-22-aa-bb-cc", mac_dashed(&[0x00, 0x11, 0x22, 0xaa, 0xbb, 0xcc]));
    }

    #[test]
    fn compact() {
        assert_eq!("001122aabbcc", mac_compact(&[0x00, 0x11, 0x22, 0xaa, 0xbb, 0xcc]));
    }

    #[test]
    fn colon_upper() {
        assert_eq!("AA:BB:CC:DD:EE:FF", mac_colon(&[0xaa, 0xbb, 0xcc, 0xdd, 0xee, 0xff]));
    }
}
