//! Directory-service user entries and binary security identifiers.

use std::fmt::Write as _;
use winops_protocol::DirectoryUser;

/// Revision byte, sub-authority count byte, 48-bit authority.
const SID_HEADER_LEN: usize = 8;
const SUB_AUTHORITY_LEN: usize = 4;

/// Raw attributes of one user object as returned by the directory search
/// (`sAMAccountName`, `displayName`, `objectSid`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub account: String,
    pub display_name: String,
    pub object_sid: Vec<u8>,
}

/// Decodes a binary security identifier into its `S-R-A-S1-S2...` form.
///
/// Layout:
///
/// ```text
/// offset 0      revision              u8
/// offset 1      sub-authority count   u8
/// offset 2..8   identifier authority  48-bit big-endian
/// offset 8..    sub-authorities       u32 little-endian each
/// ```
///
/// The count byte is a lower bound: the blob must hold at least that many
/// sub-authorities, and every complete word present is decoded. The
/// authority is printed in decimal below 2^32 and as `0x` hex above.
#[must_use]
pub fn decode_sid(blob: &[u8]) -> Option<String> {
    if blob.len() < SID_HEADER_LEN {
        return None;
    }
    let revision = blob[0];
    let declared = usize::from(blob[1]);
    let body = &blob[SID_HEADER_LEN..];
    if body.len() < declared * SUB_AUTHORITY_LEN {
        return None;
    }

    let authority = blob[2..SID_HEADER_LEN]
        .iter()
        .fold(0u64, |acc, b| (acc << 8) | u64::from(*b));

    let mut out = format!("S-{revision}-");
    if authority < (1 << 32) {
        let _ = write!(out, "{authority}");
    } else {
        let _ = write!(out, "0x{authority:012X}");
    }
    for word in body.chunks_exact(SUB_AUTHORITY_LEN) {
        let sub_authority = u32::from_le_bytes([word[0], word[1], word[2], word[3]]);
        let _ = write!(out, "-{sub_authority}");
    }
    Some(out)
}

/// Typed users sorted case-insensitively by account name.
///
/// A missing display name falls back to the account; an undecodable
/// identifier leaves `id` empty.
#[must_use]
pub fn users_from_entries(entries: impl IntoIterator<Item = DirectoryEntry>) -> Vec<DirectoryUser> {
    let mut users: Vec<DirectoryUser> = entries
        .into_iter()
        .map(|entry| {
            let id = decode_sid(&entry.object_sid).unwrap_or_else(|| {
                log::debug!("undecodable objectSid for account {}", entry.account);
                String::new()
            });
            let name = if entry.display_name.trim().is_empty() {
                entry.account.clone()
            } else {
                entry.display_name
            };
            DirectoryUser {
                id,
                name,
                account: entry.account,
            }
        })
        .collect();
    users.sort_by_cached_key(|user| user.account.to_lowercase());
    users
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn builtin_administrators() {
        let blob = [
            0x01, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x20, 0x00, 0x00, 0x00, 0x20, 0x02,
            0x00, 0x00,
        ];
        assert_eq!(decode_sid(&blob).as_deref(), Some("S-1-5-32-544"));
    }

    #[test]
    fn domain_account_with_five_sub_authorities() {
        let mut blob = vec![0x01, 0x05, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05];
        for sub in [21u32, 1_114_322_273, 403_004_966, 1_807_125_474, 1104] {
            blob.extend_from_slice(&sub.to_le_bytes());
        }
        assert_eq!(blob.len(), 28);
        assert_eq!(
            decode_sid(&blob).as_deref(),
            Some("S-1-5-21-1114322273-403004966-1807125474-1104")
        );
    }

    #[test]
    fn large_authority_is_hex() {
        let blob = [0x01, 0x00, 0x01, 0x00, 0x00, 0x00, 0x00, 0x00];
        assert_eq!(decode_sid(&blob).as_deref(), Some("S-1-0x010000000000"));
    }

    #[test]
    fn truncated_blobs_are_rejected() {
        assert_eq!(decode_sid(&[0x01, 0x01, 0x00]), None);
        let blob = [0x01, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x20, 0x00, 0x00, 0x00];
        assert_eq!(decode_sid(&blob), None);
    }

    #[test]
    fn users_are_sorted_by_account_and_named() {
        let entries = vec![
            DirectoryEntry {
                account: "zoe".to_string(),
                display_name: "Zoe Z".to_string(),
                object_sid: vec![],
            },
            DirectoryEntry {
                account: "Administrator".to_string(),
                display_name: String::new(),
                object_sid: vec![
                    0x01, 0x02, 0x00, 0x00, 0x00, 0x00, 0x00, 0x05, 0x20, 0x00, 0x00, 0x00, 0x20,
                    0x02, 0x00, 0x00,
                ],
            },
            DirectoryEntry {
                account: "bob".to_string(),
                display_name: "Bob B".to_string(),
                object_sid: vec![],
            },
        ];
        let users = users_from_entries(entries);
        let accounts: Vec<&str> = users.iter().map(|u| u.account.as_str()).collect();
        assert_eq!(accounts, vec!["Administrator", "bob", "zoe"]);
        assert_eq!(users[0].name, "Administrator");
        assert_eq!(users[0].id, "S-1-5-32-544");
        assert_eq!(users[2].id, "");
    }
}
