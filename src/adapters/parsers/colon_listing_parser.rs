use std::sync::LazyLock;

use regex::Regex;

use crate::core::errors::{GpgWrapError, Result};
use crate::core::models::public_key::PublicKey;
use crate::core::traits::parser::KeyListingParser;

/// Field positions in gpg's `--with-colons` records (see gnupg doc/DETAILS).
const FIELD_KEY_ID: usize = 4;
const FIELD_CREATED: usize = 5;
const FIELD_EXPIRES: usize = 6;
const FIELD_USER_ID: usize = 9;
const FIELD_FINGERPRINT: usize = 9;
const FIELD_CAPABILITIES: usize = 11;

static NAME_EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(.+)\s+<(.+)>").expect("static regex is valid")
});

/// Parses `gpg --list-keys --fixed-list-mode --fingerprint --with-colons`.
///
/// Handles:
/// - `pub` records: start a new key (key id, dates, capabilities)
/// - `fpr` records: attach to the current key when they contain its id
/// - `uid` records: the first `Name <email>` match sets name and email
/// - everything else (`sub`, `ssb`, `tru`, ...) is skipped
///
/// A repeated key id keeps its first position and takes the newer fields.
pub struct ColonListingParser;

impl ColonListingParser {
    fn fields<'a>(line: &'a str, min: usize, line_number: usize) -> Result<Vec<&'a str>> {
        let fields: Vec<&str> = line.split(':').collect();
        if fields.len() < min {
            return Err(GpgWrapError::Parse {
                line: line_number,
                detail: format!(
                    "'{}' record has {} fields, expected at least {min}",
                    fields[0],
                    fields.len()
                ),
            });
        }
        Ok(fields)
    }

    fn parse_pub(fields: &[&str]) -> PublicKey {
        let caps = fields[FIELD_CAPABILITIES];
        PublicKey::new(
            fields[FIELD_KEY_ID],
            fields[FIELD_CREATED],
            fields[FIELD_EXPIRES],
            has_capability(caps, 'e'),
            has_capability(caps, 's'),
        )
    }
}

/// Capability letters are lowercase for the primary key itself and
/// uppercase for the key as a whole; either counts.
fn has_capability(field: &str, code: char) -> bool {
    field.chars().any(|c| c.eq_ignore_ascii_case(&code))
}

impl KeyListingParser for ColonListingParser {
    fn parse(&self, raw: &str) -> Result<Vec<PublicKey>> {
        let mut keys: Vec<PublicKey> = Vec::new();
        let mut current: Option<usize> = None;

        for (idx, raw_line) in raw.lines().enumerate() {
            let line_number = idx + 1;
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }

            let record = line.split(':').next().unwrap_or_default();
            match record {
                "pub" => {
                    let fields = Self::fields(line, FIELD_CAPABILITIES + 1, line_number)?;
                    let key = Self::parse_pub(&fields);
                    let slot = match keys.iter().position(|k| k.key_id == key.key_id) {
                        Some(existing) => {
                            keys[existing] = key;
                            existing
                        }
                        None => {
                            keys.push(key);
                            keys.len() - 1
                        }
                    };
                    current = Some(slot);
                }
                "fpr" => {
                    let fields = Self::fields(line, FIELD_FINGERPRINT + 1, line_number)?;
                    let Some(slot) = current else { continue };
                    let key = &mut keys[slot];
                    let fingerprint = fields[FIELD_FINGERPRINT];
                    if key.fingerprint.is_none() && fingerprint.contains(key.key_id.as_str()) {
                        key.fingerprint = Some(fingerprint.to_string());
                    }
                }
                "uid" => {
                    let fields = Self::fields(line, FIELD_USER_ID + 1, line_number)?;
                    let Some(slot) = current else { continue };
                    let key = &mut keys[slot];
                    if key.email.is_some() {
                        continue;
                    }
                    if let Some(caps) = NAME_EMAIL.captures(fields[FIELD_USER_ID]) {
                        key.name = Some(caps[1].trim().to_string());
                        key.email = Some(caps[2].to_string());
                    }
                }
                _ => {}
            }
        }

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const JANE: &str = "\
pub:u:4096:1:ABCD1234:1600000000:::u:::scESC:
fpr:::::::::1111 2222 3333 ABCD1234:
uid:u::::1600000000::HASH::Jane Doe <jane@example.com>:
";

    #[test]
    fn parse_single_key() {
        let keys = ColonListingParser.parse(JANE).unwrap();

        assert_eq!(keys.len(), 1);
        let key = &keys[0];
        assert_eq!(key.key_id, "ABCD1234");
        assert_eq!(key.fingerprint.as_deref(), Some("1111 2222 3333 ABCD1234"));
        assert_eq!(key.name.as_deref(), Some("Jane Doe"));
        assert_eq!(key.email.as_deref(), Some("jane@example.com"));
        assert_eq!(key.creation_date, "1600000000");
        assert_eq!(key.expiration_date, "");
    }

    #[test]
    fn parse_empty_input() {
        assert!(ColonListingParser.parse("").unwrap().is_empty());
        assert!(ColonListingParser.parse("\n  \n").unwrap().is_empty());
    }

    #[test]
    fn sign_capability_is_independent_of_encrypt() {
        let sign_only = "pub:u:255:22:AAAA0001:1600000000:::u:::scSC:\n";
        let encrypt_only = "pub:u:255:22:AAAA0002:1600000000:::u:::eE:\n";
        let neither = "pub:u:255:22:AAAA0003:1600000000:::u:::cC:\n";

        let keys = ColonListingParser
            .parse(&format!("{sign_only}{encrypt_only}{neither}"))
            .unwrap();

        assert!(keys[0].sign && !keys[0].encrypt);
        assert!(keys[1].encrypt && !keys[1].sign);
        assert!(!keys[2].encrypt && !keys[2].sign);
    }

    #[test]
    fn uppercase_capabilities_count() {
        let keys = ColonListingParser
            .parse("pub:u:4096:1:AAAA0001:1600000000:::u:::cESC:\n")
            .unwrap();
        assert!(keys[0].encrypt);
        assert!(keys[0].sign);
    }

    #[test]
    fn sub_lines_do_not_create_records() {
        let listing = format!(
            "{JANE}sub:u:4096:1:EEEE9999:1600000000::::::e:\n\
             fpr:::::::::9999 8888 EEEE9999:\n"
        );
        let keys = ColonListingParser.parse(&listing).unwrap();

        assert_eq!(keys.len(), 1);
        // the subkey fingerprint does not contain the primary id
        assert_eq!(
            keys[0].fingerprint.as_deref(),
            Some("1111 2222 3333 ABCD1234")
        );
    }

    #[test]
    fn fingerprint_must_contain_key_id() {
        let listing = "\
pub:u:4096:1:ABCD1234:1600000000:::u:::scESC:
fpr:::::::::FFFF EEEE DDDD CCCC:
";
        let keys = ColonListingParser.parse(listing).unwrap();
        assert_eq!(keys[0].fingerprint, None);
    }

    #[test]
    fn stray_records_before_pub_are_ignored() {
        let listing = format!(
            "tru::1:1600000000:0:3:1:5\n\
             fpr:::::::::1111 2222 3333 ABCD1234:\n\
             uid:u::::1600000000::HASH::Someone <someone@example.com>:\n{JANE}"
        );
        let keys = ColonListingParser.parse(&listing).unwrap();

        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].email.as_deref(), Some("jane@example.com"));
    }

    #[test]
    fn key_without_uid_has_no_name() {
        let listing = "pub:u:4096:1:ABCD1234:1600000000:::u:::scESC:\n";
        let keys = ColonListingParser.parse(listing).unwrap();

        assert_eq!(keys.len(), 1);
        assert_eq!(keys[0].name, None);
        assert_eq!(keys[0].email, None);
    }

    #[test]
    fn non_matching_uid_leaves_fields_unset() {
        let listing = "\
pub:u:4096:1:ABCD1234:1600000000:::u:::scESC:
uid:u::::1600000000::HASH::just a comment:
";
        let keys = ColonListingParser.parse(listing).unwrap();
        assert_eq!(keys[0].name, None);
        assert_eq!(keys[0].email, None);
    }

    #[test]
    fn first_matching_uid_wins() {
        let listing = format!(
            "{JANE}uid:u::::1600000000::HASH::Jane Work <jane@work.example>:\n"
        );
        let keys = ColonListingParser.parse(&listing).unwrap();
        assert_eq!(keys[0].email.as_deref(), Some("jane@example.com"));
    }

    #[test]
    fn preserves_first_seen_order() {
        let listing = "\
pub:u:4096:1:BBBB0002:1600000000:::u:::scESC:
pub:u:4096:1:AAAA0001:1600000000:::u:::scESC:
pub:u:4096:1:CCCC0003:1600000000:::u:::scESC:
";
        let ids: Vec<String> = ColonListingParser
            .parse(listing)
            .unwrap()
            .into_iter()
            .map(|k| k.key_id)
            .collect();
        assert_eq!(ids, vec!["BBBB0002", "AAAA0001", "CCCC0003"]);
    }

    #[test]
    fn duplicate_key_id_keeps_first_position() {
        let listing = "\
pub:u:4096:1:AAAA0001:1600000000:::u:::scESC:
pub:u:4096:1:BBBB0002:1600000000:::u:::scESC:
pub:u:4096:1:AAAA0001:1700000000:::u:::scSC:
";
        let keys = ColonListingParser.parse(listing).unwrap();

        assert_eq!(keys.len(), 2);
        assert_eq!(keys[0].key_id, "AAAA0001");
        assert_eq!(keys[0].creation_date, "1700000000");
        assert!(!keys[0].encrypt);
    }

    #[test]
    fn truncated_pub_record_fails() {
        let listing = "pub:u:4096:1:ABCD1234\n";
        let err = ColonListingParser.parse(listing).unwrap_err();
        assert!(matches!(err, GpgWrapError::Parse { line: 1, .. }));
    }

    #[test]
    fn truncated_uid_record_reports_line() {
        let listing = "pub:u:4096:1:ABCD1234:1600000000:::u:::scESC:\nuid:u:::\n";
        let err = ColonListingParser.parse(listing).unwrap_err();
        assert!(matches!(err, GpgWrapError::Parse { line: 2, .. }));
    }

    #[test]
    fn crlf_and_indented_lines_are_trimmed() {
        let listing = "  pub:u:4096:1:ABCD1234:1600000000:::u:::scESC:\r\n\
                       \tuid:u::::1600000000::HASH::Jane Doe <jane@example.com>:\r\n";
        let keys = ColonListingParser.parse(listing).unwrap();
        assert_eq!(keys[0].name.as_deref(), Some("Jane Doe"));
    }
}
