//! Unit tests for the workflow runner.

use rstest::rstest;

use super::*;
use crate::test_support::{INPUT_OBJECTS, StubModule, TRACE};

fn ready(nickname: &str, status: Status) -> Box<dyn Module> {
    let mut module = StubModule::boxed(nickname, status);
    module
        .parameters_mut()
        .set_value(INPUT_OBJECTS, "Nuclei")
        .expect("text");
    module
}

fn workflow(statuses: &[(&str, Status)]) -> Workflow {
    let mut workflow = Workflow::new();
    for (nickname, status) in statuses {
        workflow.add(ready(nickname, status.clone()));
    }
    workflow
}

fn trace(workspace: &Workspace) -> Option<&str> {
    workspace.metadata().get(TRACE).map(String::as_str)
}

// ---------------------------------------------------------------------------
// Status handling
// ---------------------------------------------------------------------------

#[rstest]
#[case::all_pass(
    vec![("A", Status::Pass), ("B", Status::Pass), ("C", Status::Pass)],
    RunOutcome::Completed,
    "A,B,C"
)]
#[case::fail_halts(
    vec![("A", Status::Pass), ("B", Status::Fail), ("C", Status::Pass)],
    RunOutcome::Failed { module: "B".into() },
    "A,B"
)]
#[case::terminate_ends(
    vec![("A", Status::Terminate), ("B", Status::Pass)],
    RunOutcome::Terminated { module: "A".into() },
    "A"
)]
#[case::redirect_skips_ahead(
    vec![("A", Status::Redirect("C".into())), ("B", Status::Pass), ("C", Status::Pass)],
    RunOutcome::Completed,
    "A,C"
)]
fn run_honours_status(
    #[case] statuses: Vec<(&str, Status)>,
    #[case] outcome: RunOutcome,
    #[case] expected_trace: &str,
) {
    let mut wf = workflow(&statuses);
    let mut workspace = Workspace::new(1);
    assert_eq!(wf.run(&mut workspace), Ok(outcome));
    assert_eq!(trace(&workspace), Some(expected_trace));
}

#[test]
fn unknown_redirect_target_is_an_error() {
    let mut wf = workflow(&[("A", Status::Redirect("Nowhere".into()))]);
    let mut workspace = Workspace::new(1);
    let err = wf.run(&mut workspace).expect_err("bad target");
    assert_eq!(
        err,
        WorkflowError::RedirectTarget {
            target: "Nowhere".into()
        }
    );
}

#[test]
fn disabled_modules_are_skipped() {
    let mut wf = workflow(&[("A", Status::Pass), ("B", Status::Fail), ("C", Status::Pass)]);
    wf.module_mut("B")
        .expect("present")
        .base_mut()
        .set_enabled(false);
    let mut workspace = Workspace::new(1);
    assert_eq!(wf.run(&mut workspace), Ok(RunOutcome::Completed));
    assert_eq!(trace(&workspace), Some("A,C"));
}

// ---------------------------------------------------------------------------
// Verification and cancellation
// ---------------------------------------------------------------------------

#[test]
fn verification_failure_prevents_any_module_running() {
    let mut wf = workflow(&[("A", Status::Pass)]);
    wf.add(StubModule::boxed("Unset", Status::Pass));
    let mut workspace = Workspace::new(1);
    let err = wf.run(&mut workspace).expect_err("unverified");
    assert_eq!(
        err,
        WorkflowError::Verification {
            module: "Unset".into()
        }
    );
    assert_eq!(trace(&workspace), None);
}

#[test]
fn disabled_modules_are_not_verified() {
    let mut wf = workflow(&[("A", Status::Pass)]);
    wf.add(StubModule::boxed("Unset", Status::Pass));
    wf.module_mut("Unset")
        .expect("present")
        .base_mut()
        .set_enabled(false);
    assert_eq!(wf.verify(), Ok(()));
}

#[test]
fn cancelled_workflow_stops_before_the_next_module() {
    let mut wf = workflow(&[("A", Status::Pass), ("B", Status::Pass)]);
    wf.cancellation().cancel();
    let mut workspace = Workspace::new(1);
    assert_eq!(wf.run(&mut workspace), Ok(RunOutcome::Cancelled));
    assert_eq!(trace(&workspace), None);
    assert!(wf.modules().iter().all(|m| m.is_cancelled()));
}

// ---------------------------------------------------------------------------
// Declared measurements
// ---------------------------------------------------------------------------

#[test]
fn available_measurements_ignore_absent_and_empty_declarations() {
    let mut measuring = StubModule::named("Measure", Status::Pass);
    measuring.measurement = Some("Area");
    measuring
        .parameters_mut()
        .set_value(INPUT_OBJECTS, "Nuclei")
        .expect("text");
    let mut other = StubModule::named("Other", Status::Pass);
    other.measurement = Some("Area");
    other
        .parameters_mut()
        .set_value(INPUT_OBJECTS, "Cells")
        .expect("text");

    let mut wf = Workflow::new();
    wf.add(ready("Silent", Status::Pass));
    wf.add(Box::new(measuring));
    wf.add(Box::new(other));

    assert_eq!(wf.available_object_measurements("Nuclei"), vec!["Area"]);
    assert_eq!(wf.available_object_measurements("Cells"), vec!["Area"]);
    assert!(wf.available_object_measurements("Spots").is_empty());
}
