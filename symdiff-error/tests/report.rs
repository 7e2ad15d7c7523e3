use ariadne::Fmt;
use symdiff_attrs::ErrorKind;
use symdiff_error::{Error, ErrorKind, EXPR};

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(
    message = format!("`{}` went missing", self.name),
    labels = ["this symbol"],
    help = format!("bind {} first", (&self.name).fg(EXPR)),
)]
struct Missing {
    name: String,
}

#[derive(Debug, Clone, ErrorKind, PartialEq)]
#[error(message = "nothing to see here")]
struct Unlabelled;

/// Renders the report of the given error without color codes.
fn plain_report(err: &Error) -> String {
    let report = err.report_to_string("expr").unwrap();
    strip_ansi_escapes::strip_str(report)
}

#[test]
fn message_uses_fields() {
    let err = Error::spanning("sin(y)", Missing { name: "y".to_string() });
    assert_eq!(err.to_string(), "`y` went missing");
}

#[test]
fn report_contains_message_label_and_help() {
    let err = Error::new("sin(y)", vec![4..5], Missing { name: "y".to_string() });
    let report = plain_report(&err);
    assert!(report.contains("`y` went missing"), "{report}");
    assert!(report.contains("this symbol"), "{report}");
    assert!(report.contains("bind y first"), "{report}");
    assert!(report.contains("sin(y)"), "{report}");
}

#[test]
fn downcast_to_concrete_kind() {
    let err = Error::spanning("x", Missing { name: "x".to_string() });
    assert!(err.is::<Missing>());
    assert!(!err.is::<Unlabelled>());
    assert_eq!(err.kind_as::<Missing>(), Some(&Missing { name: "x".to_string() }));
}

#[test]
fn unit_struct_without_labels() {
    let err = Error::spanning("1", Unlabelled);
    assert_eq!(err.to_string(), "nothing to see here");
    let report = plain_report(&err);
    assert!(report.contains("nothing to see here"), "{report}");
}
