//! Six-octet hardware (MAC) addresses as printed by the DHCP tools.

const ADDRESS_LEN: usize = 17;

/// Structural check: exactly 17 characters, six hex octets joined by one separator kind.
///
/// Both `-` and `:` are accepted, but not mixed in one address.
#[must_use]
pub fn is_hardware_address(value: &str) -> bool {
    let bytes = value.as_bytes();
    if bytes.len() != ADDRESS_LEN {
        return false;
    }
    let separator = bytes[2];
    if separator != b'-' && separator != b':' {
        return false;
    }
    bytes.iter().enumerate().all(|(idx, b)| {
        if idx % 3 == 2 {
            *b == separator
        } else {
            b.is_ascii_hexdigit()
        }
    })
}

/// Canonical form used when talking to the DHCP console: uppercase, dash separated.
#[must_use]
pub fn normalize_hardware_address(value: &str) -> Option<String> {
    let value = value.trim();
    if !is_hardware_address(value) {
        return None;
    }
    Some(value.replace(':', "-").to_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_dash_and_colon_groupings() {
        assert!(is_hardware_address("00-1C-23-20-AF-4A"));
        assert!(is_hardware_address("90-94-97-8b-f5-f8"));
        assert!(is_hardware_address("90:94:97:8b:f5:f8"));
    }

    #[test]
    fn rejects_wrong_length_or_grouping() {
        assert!(!is_hardware_address("00-1C-23-20-AF"));
        assert!(!is_hardware_address("00-1C-23-20-AF-4A-"));
        assert!(!is_hardware_address("001C-2320-AF4A-00"));
        assert!(!is_hardware_address("00-1C:23-20-AF-4A"));
        assert!(!is_hardware_address("GG-1C-23-20-AF-4A"));
    }

    #[test]
    fn normalizes_to_uppercase_dash_form() {
        assert_eq!(
            normalize_hardware_address(" 90:94:97:8b:f5:f8 ").as_deref(),
            Some("90-94-97-8B-F5-F8")
        );
        assert_eq!(normalize_hardware_address("not-a-mac"), None);
    }
}
