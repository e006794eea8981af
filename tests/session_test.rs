//! Tests for the session front end: scripts driving the split model

use std::io::Write;
use std::sync::Arc;

use chrono::NaiveDate;
use rstest::rstest;
use tempfile::NamedTempFile;

use bananasplits::cli::{CliError, Session};
use bananasplits::config::Settings;
use bananasplits::domain::{Allocation, Percentage, SplitId, SplitStatus};
use bananasplits::infrastructure::di::ServiceContainer;
use bananasplits::infrastructure::traits::{FixedClock, SequentialIds};
use bananasplits::util::testing;

fn session() -> Session {
    testing::init_test_setup();
    let container = ServiceContainer::with_deps(
        Settings::default(),
        Arc::new(FixedClock(NaiveDate::from_ymd_opt(2026, 10, 19).unwrap())),
        Arc::new(SequentialIds::new()),
    );
    Session::new(&container)
}

const AD_REVENUE: &str = r#"
# Scenario: creator 60, one member 40
new
name Ad Revenue
creator 60
add
email m1 ann@example.com
pct m1 40
total
submit
"#;

#[test]
fn given_balanced_script_when_run_then_split_created() {
    let mut session = session();

    let report = session.run(AD_REVENUE.as_bytes(), true).unwrap();

    assert_eq!(report.executed, 8);
    assert_eq!(report.failed, 0);
    let splits = session.splits().splits();
    assert_eq!(splits.len(), 1);
    assert_eq!(splits[0].id, SplitId::from("s1"));
    assert_eq!(splits[0].name, "Ad Revenue");
    assert_eq!(splits[0].status, SplitStatus::Active);
    assert_eq!(splits[0].total_percentage(), 100);
    assert!(!session.form().is_open());
}

#[test]
fn given_unbalanced_submit_when_run_lenient_then_failure_counted_and_nothing_created() {
    let mut session = session();
    let script = "new\nname Ad Revenue\ncreator 60\nadd\npct m1 30\nsubmit\n";

    let report = session.run(script.as_bytes(), false).unwrap();

    assert_eq!(report.failed, 1);
    assert_eq!(report.executed, 5);
    assert!(session.splits().splits().is_empty());
    assert_eq!(session.form().total_percentage(), 90);
}

#[test]
fn given_unbalanced_submit_when_run_strict_then_error_names_line() {
    let mut session = session();
    let script = "new\nname Ad Revenue\ncreator 60\nadd\npct m1 30\nsubmit\nlist\n";

    let err = session.run(script.as_bytes(), true).unwrap_err();

    match err {
        CliError::Script { line, message } => {
            assert_eq!(line, 6);
            assert!(message.contains("100%"), "message: {message}");
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn given_edit_then_cancel_when_run_then_committed_split_unchanged() {
    let mut session = session();
    let script = r#"
new
name Podcast
creator 50
add
pct m1 50
submit
edit s1
edit-pct m1 30
save
cancel
show s1
"#;

    let report = session.run(script.as_bytes(), false).unwrap();

    assert_eq!(report.failed, 1, "save with 80% must fail");
    let split = &session.splits().splits()[0];
    assert_eq!(split.creator_percentage, Percentage::new(50));
    assert_eq!(split.members[0].percentage, Percentage::new(50));
    assert!(!session.splits().is_editing());
}

#[test]
fn given_edit_then_save_when_run_then_split_updated() {
    let mut session = session();
    let script = r#"
new
name Podcast
creator 50
add
pct m1 50
submit
edit s1
edit-creator 70
edit-pct m1 30
save
payout s1 18471.00
"#;

    session.run(script.as_bytes(), true).unwrap();

    let split = &session.splits().splits()[0];
    assert_eq!(split.creator_percentage, Percentage::new(70));
    assert_eq!(split.members[0].percentage, Percentage::new(30));
}

#[test]
fn given_toggle_twice_when_run_then_status_restored() {
    let mut session = session();
    let script = "new\nname Solo\ncreator 100\nsubmit\ntoggle s1\nstats\n";
    session.run(script.as_bytes(), true).unwrap();
    assert_eq!(session.splits().splits()[0].status, SplitStatus::Inactive);

    session.run("toggle s1\nlist\n".as_bytes(), true).unwrap();
    assert_eq!(session.splits().splits()[0].status, SplitStatus::Active);
}

#[rstest]
#[case(false)]
#[case(true)]
fn given_unknown_split_when_toggled_then_notice_and_session_continues(#[case] strict: bool) {
    let mut session = session();
    let script = "toggle s9\nnew\nname Solo\ncreator 100\nsubmit\n";

    let report = session.run(script.as_bytes(), strict).unwrap();

    assert_eq!(report.skipped, 1);
    assert_eq!(report.failed, 0);
    assert_eq!(report.executed, 4);
    assert_eq!(session.splits().splits().len(), 1);
}

#[test]
fn given_unknown_member_and_split_refs_when_run_strict_then_all_skipped_without_changes() {
    let mut session = session();
    let script = r#"
new
name Solo
creator 100
remove m7
pct m7 40
submit
show s4
edit s4
payout s4 10.00
"#;

    let report = session.run(script.as_bytes(), true).unwrap();

    assert_eq!(report.skipped, 5);
    assert_eq!(report.failed, 0);
    assert_eq!(session.splits().splits().len(), 1);
    assert!(!session.splits().is_editing());
}

#[test]
fn given_form_not_opened_when_submitting_then_rejected_and_nothing_created() {
    let mut session = session();
    let script = "name Ghost\ncreator 100\nsubmit\n";

    let report = session.run(script.as_bytes(), false).unwrap();

    assert_eq!(report.failed, 3);
    assert_eq!(report.executed, 0);
    assert!(session.splits().splits().is_empty());
    assert!(!session.form().is_open());
}

#[test]
fn given_form_not_opened_when_run_strict_then_first_line_fails() {
    let mut session = session();
    let err = session.run("name Ghost\n".as_bytes(), true).unwrap_err();
    assert_eq!(err.to_string(), "line 1: the new split form is not open");
}

#[test]
fn given_close_when_run_then_draft_discarded() {
    let mut session = session();
    let script = "new\nname Draft\nadd\nadd\nclose\n";

    session.run(script.as_bytes(), true).unwrap();

    assert!(!session.form().is_open());
    assert!(session.form().draft().members.is_empty());
    assert!(session.form().draft().name.is_empty());
}

#[test]
fn given_script_file_when_read_then_same_as_stdin() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(AD_REVENUE.as_bytes()).unwrap();
    let reader = std::io::BufReader::new(std::fs::File::open(file.path()).unwrap());

    let mut session = session();
    session.run(reader, true).unwrap();

    assert_eq!(session.splits().summary().active, 1);
}

#[test]
fn given_garbage_line_when_run_strict_then_script_error() {
    let mut session = session();
    let err = session.run("new\nfrobnicate\n".as_bytes(), true).unwrap_err();
    assert_eq!(err.to_string(), "line 2: unknown command: frobnicate");
}
