use std::fmt;
use thiserror::Error as ThisError;

/// Token separator inside a lookup key.
pub const LOOKUP_DELIMITER: &str = "__";

///
/// Command
///
/// The comparison vocabulary a lookup key may carry.
/// Defaults to `Exact` when the key names no command.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Command {
    #[default]
    Exact,
    Ne,
    Gte,
    Gt,
    Lte,
    Lt,
    In,
    Nin,
    IsNull,
}

impl Command {
    /// Decode one key token into a command, if it is one.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "exact" => Some(Self::Exact),
            "ne" => Some(Self::Ne),
            "gte" => Some(Self::Gte),
            "gt" => Some(Self::Gt),
            "lte" => Some(Self::Lte),
            "lt" => Some(Self::Lt),
            "in" => Some(Self::In),
            "nin" => Some(Self::Nin),
            "isnull" => Some(Self::IsNull),
            _ => None,
        }
    }

    /// The key token this command is written as.
    #[must_use]
    pub const fn token(self) -> &'static str {
        match self {
            Self::Exact => "exact",
            Self::Ne => "ne",
            Self::Gte => "gte",
            Self::Gt => "gt",
            Self::Lte => "lte",
            Self::Lt => "lt",
            Self::In => "in",
            Self::Nin => "nin",
            Self::IsNull => "isnull",
        }
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.token())
    }
}

///
/// Conjunction
///
/// How one lookup participates in the row decision.
///
/// And    → mandatory; a miss rejects the row.
/// Or     → the row needs at least one passing Or lookup.
/// OrAll  → every OrAll lookup in the set must pass.
///

#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Conjunction {
    #[default]
    And,
    Or,
    OrAll,
}

impl Conjunction {
    /// Decode one key token into a conjunction, if it is one.
    #[must_use]
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "or" => Some(Self::Or),
            "ora" => Some(Self::OrAll),
            _ => None,
        }
    }
}

///
/// LookupError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum LookupError {
    #[error("lookup key '{key}' leaves no field name")]
    EmptyLookup { key: String },

    #[error("lookup key '{key}' carries unrecognized or extra token '{token}'")]
    UnknownCommand { key: String, token: String },
}

///
/// Lookup
///
/// One parsed lookup key: `<field>[__<command>][__or|__ora]`, tokens in any
/// order with the field last after command/conjunction removal.
///
/// Parsed once per filter invocation; rows never see raw key strings.
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Lookup {
    pub field: String,
    pub command: Command,
    pub conjunction: Conjunction,
}

impl Lookup {
    /// Decompose a compound lookup key.
    ///
    /// The key must yield exactly one field name, at most one command
    /// token, and at most one conjunction token. Anything left over is an
    /// error rather than silently dropped.
    pub fn parse(key: &str) -> Result<Self, LookupError> {
        let mut tokens: Vec<&str> = key.split(LOOKUP_DELIMITER).collect();

        if tokens.iter().any(|t| t.is_empty()) {
            return Err(LookupError::EmptyLookup {
                key: key.to_string(),
            });
        }

        // The conjunction is a standalone token, not a raw suffix: a field
        // that merely ends in "ora" stays a plain And lookup.
        let mut conjunction = Conjunction::And;
        if let Some(pos) = tokens
            .iter()
            .position(|t| Conjunction::from_token(t).is_some())
        {
            conjunction = Conjunction::from_token(tokens[pos]).unwrap_or_default();
            tokens.remove(pos);
        }

        let mut command = Command::Exact;
        if let Some(pos) = tokens.iter().position(|t| Command::from_token(t).is_some()) {
            command = Command::from_token(tokens[pos]).unwrap_or_default();
            tokens.remove(pos);
        }

        let Some(field) = tokens.pop() else {
            return Err(LookupError::EmptyLookup {
                key: key.to_string(),
            });
        };

        if let Some(extra) = tokens.first() {
            return Err(LookupError::UnknownCommand {
                key: key.to_string(),
                token: (*extra).to_string(),
            });
        }

        Ok(Self {
            field: field.to_string(),
            command,
            conjunction,
        })
    }
}

///
/// TESTS
///

#[cfg(test)]
mod tests {
    use super::{Command, Conjunction, Lookup, LookupError};

    fn parse(key: &str) -> Lookup {
        Lookup::parse(key).expect("key should parse")
    }

    #[test]
    fn bare_field_defaults_to_exact_and() {
        let lookup = parse("age");
        assert_eq!(lookup.field, "age");
        assert_eq!(lookup.command, Command::Exact);
        assert_eq!(lookup.conjunction, Conjunction::And);
    }

    #[test]
    fn command_token_is_recognized() {
        let lookup = parse("age__gt");
        assert_eq!(lookup.field, "age");
        assert_eq!(lookup.command, Command::Gt);
    }

    #[test]
    fn conjunction_tokens_are_recognized() {
        assert_eq!(parse("age__or").conjunction, Conjunction::Or);
        assert_eq!(parse("age__ora").conjunction, Conjunction::OrAll);
        assert_eq!(parse("age__gte__or").command, Command::Gte);
        assert_eq!(parse("age__gte__or").conjunction, Conjunction::Or);
    }

    #[test]
    fn token_order_does_not_matter_except_field_last() {
        let lookup = parse("or__gt__age");
        assert_eq!(lookup.field, "age");
        assert_eq!(lookup.command, Command::Gt);
        assert_eq!(lookup.conjunction, Conjunction::Or);
    }

    #[test]
    fn single_underscores_stay_inside_field_names() {
        let lookup = parse("first_name");
        assert_eq!(lookup.field, "first_name");

        // not the `_or` suffix trap: "factor" is a field, not a conjunction
        assert_eq!(parse("factor").conjunction, Conjunction::And);
    }

    #[test]
    fn field_ending_in_ora_is_not_a_conjunction() {
        let lookup = parse("agora");
        assert_eq!(lookup.field, "agora");
        assert_eq!(lookup.conjunction, Conjunction::And);
    }

    #[test]
    fn empty_keys_are_rejected() {
        assert!(matches!(
            Lookup::parse(""),
            Err(LookupError::EmptyLookup { .. })
        ));
        assert!(matches!(
            Lookup::parse("age__"),
            Err(LookupError::EmptyLookup { .. })
        ));
        // conjunction alone leaves nothing to name a field
        assert!(matches!(
            Lookup::parse("or"),
            Err(LookupError::EmptyLookup { .. })
        ));
    }

    #[test]
    fn leftover_tokens_are_rejected() {
        assert!(matches!(
            Lookup::parse("a__b__gt"),
            Err(LookupError::UnknownCommand { token, .. }) if token == "a"
        ));
        // two command tokens: the second one is surplus
        assert!(matches!(
            Lookup::parse("gt__lte__age"),
            Err(LookupError::UnknownCommand { .. })
        ));
    }

    #[test]
    fn command_vocabulary_round_trips() {
        for command in [
            Command::Exact,
            Command::Ne,
            Command::Gte,
            Command::Gt,
            Command::Lte,
            Command::Lt,
            Command::In,
            Command::Nin,
            Command::IsNull,
        ] {
            assert_eq!(Command::from_token(command.token()), Some(command));
        }
    }
}
