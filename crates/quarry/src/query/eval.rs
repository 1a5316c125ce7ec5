use crate::{query::lookup::Command, value::Value};
use std::cmp::Ordering;
use thiserror::Error as ThisError;

///
/// EvalError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum EvalError {
    #[error("cannot apply '{command}' between {lhs} and {rhs}")]
    TypeMismatch {
        command: Command,
        lhs: &'static str,
        rhs: &'static str,
    },
}

impl EvalError {
    fn type_mismatch(command: Command, lhs: &Value, rhs: &Value) -> Self {
        Self::TypeMismatch {
            command,
            lhs: lhs.kind_label(),
            rhs: rhs.kind_label(),
        }
    }
}

/// Apply one command to one (actual, expected) pair.
///
/// `actual` is the record's field value, or `None` when the field is absent.
/// Absence satisfies `isnull(true)` and nothing else: ordinary commands over
/// an absent field miss without raising, so heterogeneous stores stay
/// queryable.
pub(crate) fn eval(
    command: Command,
    actual: Option<&Value>,
    expected: &Value,
) -> Result<bool, EvalError> {
    if command == Command::IsNull {
        let Some(want_null) = expected.as_bool() else {
            return Err(EvalError::type_mismatch(
                command,
                actual.unwrap_or(&Value::Null),
                expected,
            ));
        };
        let is_null = actual.is_none_or(Value::is_null);

        return Ok(is_null == want_null);
    }

    let Some(actual) = actual else {
        return Ok(false);
    };

    match command {
        Command::Exact => Ok(actual.eq_loose(expected)),
        Command::Ne => Ok(!actual.eq_loose(expected)),
        Command::Gt | Command::Gte | Command::Lt | Command::Lte => {
            let Some(ordering) = Value::strict_order_cmp(actual, expected) else {
                return Err(EvalError::type_mismatch(command, actual, expected));
            };

            Ok(match command {
                Command::Gt => ordering == Ordering::Greater,
                Command::Gte => ordering != Ordering::Less,
                Command::Lt => ordering == Ordering::Less,
                _ => ordering != Ordering::Greater,
            })
        }
        Command::In | Command::Nin => {
            let Some(found) = actual.in_list(expected) else {
                return Err(EvalError::type_mismatch(command, actual, expected));
            };

            Ok((command == Command::In) == found)
        }
        Command::IsNull => unreachable!("isnull branch must exit before the fallthrough match"),
    }
}

///
/// TESTS
///
