use crate::cli::{exit_message, AlreadyReported};

#[test]
fn reported_failure_prints_nothing_more() {
    let err = anyhow::Error::from(AlreadyReported);
    assert!(exit_message(&err).is_none());
}

#[test]
fn other_failures_print_once_with_context() {
    let err = anyhow::anyhow!("no validator given").context("countries");
    assert_eq!(
        exit_message(&err).as_deref(),
        Some("tpn error: countries: no validator given")
    );
}
