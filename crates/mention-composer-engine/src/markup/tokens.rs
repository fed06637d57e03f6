use crate::models::MentionKind;

/// Role mention raw-value syntax: `<@id>`.
pub struct RoleToken;

impl RoleToken {
    pub const OPEN: &'static str = "<@";
    pub const CLOSE: char = '>';

    pub fn raw(id: &str) -> String {
        format!("{}{id}{}", Self::OPEN, Self::CLOSE)
    }
}

/// Channel mention raw-value syntax: `<#id>`.
pub struct ChannelToken;

impl ChannelToken {
    pub const OPEN: &'static str = "<#";
    pub const CLOSE: char = '>';

    pub fn raw(id: &str) -> String {
        format!("{}{id}{}", Self::OPEN, Self::CLOSE)
    }
}

/// Template variable raw-value syntax: `{key}`.
pub struct VariableToken;

impl VariableToken {
    pub const OPEN: char = '{';
    pub const CLOSE: char = '}';

    pub fn raw(key: &str) -> String {
        format!("{}{key}{}", Self::OPEN, Self::CLOSE)
    }
}

/// Builds the canonical raw value for a mention kind and its addressable
/// part (role/channel id, or variable key).
pub fn raw_value(kind: MentionKind, addressable: &str) -> String {
    match kind {
        MentionKind::Role => RoleToken::raw(addressable),
        MentionKind::Channel => ChannelToken::raw(addressable),
        MentionKind::Variable => VariableToken::raw(addressable),
    }
}

/// Splits a raw value into its kind and addressable part.
///
/// The three shapes form a closed mapping; anything else is `None` and is
/// treated as literal text by callers.
pub fn parse_raw(raw: &str) -> Option<(MentionKind, &str)> {
    if let Some(inner) = raw
        .strip_prefix(RoleToken::OPEN)
        .and_then(|r| r.strip_suffix(RoleToken::CLOSE))
    {
        if !inner.is_empty() {
            return Some((MentionKind::Role, inner));
        }
    }
    if let Some(inner) = raw
        .strip_prefix(ChannelToken::OPEN)
        .and_then(|r| r.strip_suffix(ChannelToken::CLOSE))
    {
        if !inner.is_empty() {
            return Some((MentionKind::Channel, inner));
        }
    }
    if let Some(inner) = raw
        .strip_prefix(VariableToken::OPEN)
        .and_then(|r| r.strip_suffix(VariableToken::CLOSE))
    {
        if !inner.is_empty() {
            return Some((MentionKind::Variable, inner));
        }
    }
    None
}

/// The kind a raw value encodes, if any.
pub fn kind_of(raw: &str) -> Option<MentionKind> {
    parse_raw(raw).map(|(kind, _)| kind)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(MentionKind::Role, "42", "<@42>")]
    #[case(MentionKind::Channel, "987", "<#987>")]
    #[case(MentionKind::Variable, "level", "{level}")]
    fn raw_value_round_trips(
        #[case] kind: MentionKind,
        #[case] addressable: &str,
        #[case] expected: &str,
    ) {
        let raw = raw_value(kind, addressable);
        assert_eq!(raw, expected);
        assert_eq!(parse_raw(&raw), Some((kind, addressable)));
    }

    #[rstest]
    #[case("<@>")]
    #[case("{}")]
    #[case("<#>")]
    #[case("plain text")]
    #[case("<@42")]
    #[case("{unclosed")]
    #[case("")]
    fn malformed_raw_values_are_rejected(#[case] raw: &str) {
        assert_eq!(parse_raw(raw), None);
    }

    #[test]
    fn variable_keys_are_not_validated_beyond_shape() {
        // unknown or oddly named keys still parse; data is never lost
        assert_eq!(
            parse_raw("{not a known var}"),
            Some((MentionKind::Variable, "not a known var"))
        );
    }
}
