//! The stage processes allocate and may write to stderr between fork and
//! exec, so this binary forks from exactly one test. Running the scenarios
//! as parallel tests would let a sibling thread hold a lock the child needs.

use std::collections::HashSet;

use pipesh::{Pipeline, StageExitStatus};

fn every_stage_is_forked_and_reaped_in_order() {
    for count in 1..=4 {
        let line = vec!["true"; count].join(" | ") + "\n";
        let pipeline = Pipeline::parse(&line);
        assert_eq!(pipeline.len(), count);
        assert_eq!(pipeline.boundaries(), count - 1);

        let outcome = pipeline.execute().unwrap();

        assert_eq!(outcome.statuses().len(), count);
        for (index, status) in outcome.statuses().iter().enumerate() {
            assert_eq!(status.stage, index);
            assert!(status.exit.success());
        }

        let pids: HashSet<_> = outcome.statuses().iter().map(|status| status.pid).collect();
        assert_eq!(pids.len(), count);
    }
}

fn last_stage_decides_the_outcome() {
    let outcome = Pipeline::parse("true | false\n").execute().unwrap();

    assert!(outcome.statuses()[0].exit.success());
    assert_eq!(outcome.statuses()[1].exit, StageExitStatus::Exited(1));
    assert_eq!(outcome.last_code(), 1);
    assert!(!outcome.success());
}

fn failed_exec_only_ends_its_own_stage() {
    let outcome = Pipeline::parse("pipesh-no-such-program | true\n")
        .execute()
        .unwrap();

    assert_eq!(outcome.statuses().len(), 2);
    assert_eq!(outcome.statuses()[0].exit, StageExitStatus::Exited(127));
    assert!(outcome.success());
}

fn redirection_failure_only_ends_its_own_stage() {
    let outcome = Pipeline::parse("true | cat < /definitely/not/here.txt\n")
        .execute()
        .unwrap();

    assert!(outcome.statuses()[0].exit.success());
    assert_eq!(outcome.statuses()[1].exit, StageExitStatus::Exited(1));
}

fn missing_redirection_target_ends_the_stage() {
    let outcome = Pipeline::parse("cat <\n").execute().unwrap();

    assert_eq!(outcome.statuses().len(), 1);
    assert_eq!(outcome.last_code(), 1);
}

#[test]
fn orchestrator_scenarios() {
    every_stage_is_forked_and_reaped_in_order();
    last_stage_decides_the_outcome();
    failed_exec_only_ends_its_own_stage();
    redirection_failure_only_ends_its_own_stage();
    missing_redirection_target_ends_the_stage();
}
