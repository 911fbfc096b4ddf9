//! Unit tests for CLI argument parsing.

use super::*;
use rstest::rstest;

#[test]
fn no_arguments_continue_past_failures() {
    let cli = Cli::try_parse_from(["download-binaries"]).expect("parse");
    assert!(!cli.abort_on_error);
    assert_eq!(cli.failure_policy(), FailurePolicy::Continue);
}

#[test]
fn abort_flag_selects_abort_policy() {
    let cli = Cli::try_parse_from(["download-binaries", "--abort-on-error"]).expect("parse");
    assert_eq!(cli.failure_policy(), FailurePolicy::Abort);
}

#[rstest]
#[case::unknown_flag(&["download-binaries", "--verbose"])]
#[case::positional(&["download-binaries", "extra"])]
#[case::flag_with_value(&["download-binaries", "--abort-on-error=yes"])]
fn other_arguments_are_rejected(#[case] args: &[&str]) {
    assert!(Cli::try_parse_from(args).is_err());
}

#[test]
fn default_matches_no_arguments() {
    let parsed = Cli::try_parse_from(["download-binaries"]).expect("parse");
    assert_eq!(parsed.abort_on_error, Cli::default().abort_on_error);
}
