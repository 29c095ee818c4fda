//! Conversion between policy rules and flat `CasbinRule` records

use crate::models::{CasbinRule, Rule};

/// Number of positional slots in a stored record
pub const MAX_RULE_FIELDS: usize = 6;

/// Section a policy type belongs to: its first character
///
/// `"p"` and `"p2"` map to `"p"`, `"g2"` maps to `"g"`. An empty
/// policy type has an empty section.
pub fn section_of(ptype: &str) -> &str {
    match ptype.chars().next() {
        Some(c) => &ptype[..c.len_utf8()],
        None => "",
    }
}

/// Encode a rule into a storage record
///
/// Fields map positionally onto `v0..v5`. Anything past the sixth field is
/// dropped; unused trailing slots stay empty.
pub fn encode<S: AsRef<str>>(ptype: &str, rule: &[S]) -> CasbinRule {
    if rule.len() > MAX_RULE_FIELDS {
        tracing::trace!(
            ptype,
            fields = rule.len(),
            "rule longer than {} fields, extra fields dropped",
            MAX_RULE_FIELDS
        );
    }

    let mut slots = rule.iter().map(|f| f.as_ref().to_string());
    let mut next = || slots.next().unwrap_or_default();

    CasbinRule {
        ptype: ptype.to_string(),
        v0: next(),
        v1: next(),
        v2: next(),
        v3: next(),
        v4: next(),
        v5: next(),
    }
}

/// Decode a storage record into `(section, ptype, rule)`
///
/// Fields are read from `v0` onwards and reading stops at the first empty
/// slot. An empty string is therefore never a rule value: a record with
/// `v0 = "alice"`, `v1 = ""`, `v2 = "read"` decodes to `["alice"]`.
pub fn decode(record: &CasbinRule) -> (String, String, Rule) {
    let rule = record
        .fields()
        .into_iter()
        .take_while(|f| !f.is_empty())
        .map(str::to_string)
        .collect();

    (
        section_of(&record.ptype).to_string(),
        record.ptype.clone(),
        rule,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("p", "p")]
    #[case("p2", "p")]
    #[case("g", "g")]
    #[case("g2", "g")]
    #[case("", "")]
    fn test_section_of(#[case] ptype: &str, #[case] expected: &str) {
        assert_eq!(section_of(ptype), expected);
    }

    #[test]
    fn test_encode_short_rule_leaves_trailing_slots_empty() {
        let record = encode("p", &["alice", "data1", "read"]);
        assert_eq!(record.ptype, "p");
        assert_eq!(record.v0, "alice");
        assert_eq!(record.v1, "data1");
        assert_eq!(record.v2, "read");
        assert_eq!(record.v3, "");
        assert_eq!(record.v4, "");
        assert_eq!(record.v5, "");
    }

    #[test]
    fn test_encode_drops_fields_past_sixth() {
        let rule = ["a", "b", "c", "d", "e", "f", "g", "h"];
        let record = encode("p", &rule);
        assert_eq!(record.v5, "f");

        let (_, _, decoded) = decode(&record);
        assert_eq!(decoded, vec!["a", "b", "c", "d", "e", "f"]);
    }

    #[test]
    fn test_decode_stops_at_first_empty_field() {
        let record = CasbinRule {
            ptype: "p".to_string(),
            v0: "alice".to_string(),
            v1: String::new(),
            v2: "read".to_string(),
            ..Default::default()
        };

        let (sec, ptype, rule) = decode(&record);
        assert_eq!(sec, "p");
        assert_eq!(ptype, "p");
        assert_eq!(rule, vec!["alice"]);
    }

    #[test]
    fn test_decode_empty_record() {
        let record = CasbinRule {
            ptype: "g".to_string(),
            ..Default::default()
        };
        let (sec, _, rule) = decode(&record);
        assert_eq!(sec, "g");
        assert!(rule.is_empty());
    }

    #[rstest]
    #[case("g", &["alice", "admin"])]
    #[case("g2", &["data1", "data_group", "domain1"])]
    #[case("p", &["alice", "domain1", "data1", "read", "allow", "x"])]
    fn test_round_trip(#[case] ptype: &str, #[case] fields: &[&str]) {
        let (sec, decoded_ptype, rule) = decode(&encode(ptype, fields));
        assert_eq!(sec, section_of(ptype));
        assert_eq!(decoded_ptype, ptype);
        assert_eq!(rule, fields);
    }
}
