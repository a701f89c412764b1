//! First-class error objects (SPEC_FULL.md §4.7, §7).
//!
//! Built-in methods signal language-level faults by *returning* one of
//! these, never by unwinding through a Rust `Result`. A [`VmError`]
//! (see [`crate::error`]) is a different, host-level concept and is never
//! represented this way.

use std::fmt;

use crate::source_line::SourceLine;

/// The closed catalogue of error kinds the core recognizes (SPEC_FULL.md §7).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    TypeError,
    ArgumentError,
    ZeroDivisionError,
    NoMethodError,
    NameError,
    NotImplementedError,
    InternalError,
}

impl ErrorKind {
    /// The class name this error kind is registered under.
    pub fn class_name(self) -> &'static str {
        match self {
            ErrorKind::TypeError => "TypeError",
            ErrorKind::ArgumentError => "ArgumentError",
            ErrorKind::ZeroDivisionError => "ZeroDivisionError",
            ErrorKind::NoMethodError => "NoMethodError",
            ErrorKind::NameError => "NameError",
            ErrorKind::NotImplementedError => "NotImplementedError",
            ErrorKind::InternalError => "InternalError",
        }
    }
}

/// A first-class error value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorObject {
    pub kind: ErrorKind,
    pub message: String,
    pub source_line: SourceLine,
}

impl fmt::Display for ErrorObject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} (line {})",
            self.kind.class_name(),
            self.message,
            self.source_line
        )
    }
}

/// Constructs an error object. This is the single place every built-in and
/// every dispatcher fault funnels through, so message formatting stays
/// consistent (SPEC_FULL.md §7: "expected type tag, received class name, a
/// formatted context").
pub fn init_error_object(kind: ErrorKind, source_line: SourceLine, message: impl Into<String>) -> ErrorObject {
    let message = message.into();
    log::warn!("{}: {} (line {})", kind.class_name(), message, source_line);
    ErrorObject {
        kind,
        message,
        source_line,
    }
}

/// `ArgumentError("Expect K argument(s). got=N")` — the arity-mismatch
/// message every built-in reports verbatim (SPEC_FULL.md §4.5).
pub fn arity_error(source_line: SourceLine, expected: usize, got: usize) -> ErrorObject {
    init_error_object(
        ErrorKind::ArgumentError,
        source_line,
        format!("Expect {expected} argument(s). got={got}"),
    )
}

/// `TypeError` reporting an expected-type tag against the received class name.
pub fn type_error(source_line: SourceLine, expected: &str, received_class: &str) -> ErrorObject {
    init_error_object(
        ErrorKind::TypeError,
        source_line,
        format!("expect argument to be {expected}. got: {received_class}"),
    )
}

pub fn zero_division_error(source_line: SourceLine, operation: &str) -> ErrorObject {
    init_error_object(
        ErrorKind::ZeroDivisionError,
        source_line,
        format!("divided by 0: {operation}"),
    )
}

pub fn no_method_error(source_line: SourceLine, receiver_class: &str, method: &str) -> ErrorObject {
    init_error_object(
        ErrorKind::NoMethodError,
        source_line,
        format!("undefined method '{method}' for {receiver_class}"),
    )
}

pub fn name_error(source_line: SourceLine, name: &str) -> ErrorObject {
    init_error_object(
        ErrorKind::NameError,
        source_line,
        format!("uninitialized constant {name}"),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_error_reports_expected_and_got() {
        let err = arity_error(3, 2, 1);
        assert_eq!(err.kind, ErrorKind::ArgumentError);
        assert_eq!(err.message, "Expect 2 argument(s). got=1");
        assert_eq!(err.source_line, 3);
    }

    #[test]
    fn type_error_reports_expected_type_and_received_class() {
        let err = type_error(1, "Numeric", "String");
        assert_eq!(err.kind, ErrorKind::TypeError);
        assert_eq!(err.message, "expect argument to be Numeric. got: String");
    }

    #[test]
    fn zero_division_error_names_the_operation() {
        let err = zero_division_error(1, "/");
        assert_eq!(err.kind, ErrorKind::ZeroDivisionError);
        assert_eq!(err.message, "divided by 0: /");
    }

    #[test]
    fn no_method_error_names_receiver_class_and_method() {
        let err = no_method_error(1, "Integer", "frobnicate");
        assert_eq!(err.kind, ErrorKind::NoMethodError);
        assert_eq!(err.message, "undefined method 'frobnicate' for Integer");
    }

    #[test]
    fn name_error_names_the_missing_constant() {
        let err = name_error(1, "Wat");
        assert_eq!(err.kind, ErrorKind::NameError);
        assert_eq!(err.message, "uninitialized constant Wat");
    }

    #[test]
    fn display_formats_kind_message_and_line() {
        let err = init_error_object(ErrorKind::InternalError, 42, "boom");
        assert_eq!(err.to_string(), "InternalError: boom (line 42)");
    }

    #[test]
    fn class_name_matches_the_kind() {
        assert_eq!(ErrorKind::ZeroDivisionError.class_name(), "ZeroDivisionError");
        assert_eq!(ErrorKind::NoMethodError.class_name(), "NoMethodError");
    }
}
