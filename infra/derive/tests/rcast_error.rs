use rcast_derive::rcast_error;
use std::borrow::Cow;

#[rcast_error]
pub enum DemoError {
    /// Wraps an upstream IO failure.
    #[error("IO error{}: {source}", format_context(.context))]
    Io {
        #[source]
        source: std::io::Error,
        context: Option<Cow<'static, str>>,
    },

    /// Plain message-only variant.
    #[error("Demo validation error{}: {message}", format_context(.context))]
    Validation { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn io_failure() -> Result<(), std::io::Error> {
    Err(std::io::Error::other("disk on fire"))
}

#[test]
fn source_variant_converts_via_question_mark() {
    fn run() -> Result<(), DemoError> {
        io_failure()?;
        Ok(())
    }

    let err = run().unwrap_err();
    assert!(matches!(err, DemoError::Io { .. }));
    assert_eq!(err.to_string(), "IO error: disk on fire");
}

#[test]
fn context_is_attached_to_source_results() {
    let err: DemoError = io_failure().context("Reading token file").unwrap_err();
    assert_eq!(err.to_string(), "IO error (Reading token file): disk on fire");
}

#[test]
fn context_is_attached_to_existing_errors() {
    let result: Result<(), DemoError> = Err(DemoError::Validation {
        message: "empty field".into(),
        context: None,
    });
    let err = result.context("Checking payload").unwrap_err();
    assert_eq!(err.to_string(), "Demo validation error (Checking payload): empty field");
}

#[test]
fn internal_variant_converts_from_strings() {
    let err: DemoError = "something odd".into();
    assert_eq!(err.to_string(), "Internal error: something odd");

    let err: DemoError = format!("odd thing #{}", 2).into();
    assert_eq!(err.to_string(), "Internal error: odd thing #2");
}

#[test]
fn ui() {
    let t = trybuild::TestCases::new();
    t.pass("tests/ui/rcast_error_pass.rs");
}
