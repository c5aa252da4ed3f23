use std::time::Duration;

use mkxray::{JobStage, JobStatus};

use crate::support::helpers::{init_tracing, plain_runner, statuses, RecordingTask};

#[tokio::test]
async fn failing_job_stops_the_rest_of_the_list() {
    init_tracing();
    let mut runner = plain_runner(vec![
        RecordingTask::ok("A"),
        RecordingTask::failing("B", "disk full"),
        RecordingTask::ok("C"),
    ]);

    let err = runner.run_all().await.unwrap_err();

    assert_eq!(err.to_string(), "disk full");
    assert_eq!(err.job(), "B");
    assert_eq!(err.stage(), JobStage::Execute);
    assert_eq!(
        statuses(&runner),
        [JobStatus::Ok, JobStatus::Error, JobStatus::Waiting]
    );
    assert_eq!(runner.context().calls, ["A", "B"]);

    let snapshot = runner.telemetry().snapshot();
    assert_eq!(snapshot.jobs_ok, 1);
    assert_eq!(snapshot.jobs_failed, 1);
}

#[tokio::test]
async fn successful_jobs_run_in_declaration_order() {
    init_tracing();
    let names: Vec<String> = (0..6).map(|i| format!("job-{i}")).collect();
    let mut runner = plain_runner(names.iter().map(|name| RecordingTask::ok(name)).collect());

    runner.run_all().await.unwrap();

    assert_eq!(runner.context().calls, names);
    assert!(statuses(&runner).iter().all(|status| *status == JobStatus::Ok));
    assert!(runner.cursor().is_finished());
}

#[tokio::test]
async fn failure_at_any_position_leaves_later_jobs_waiting() {
    init_tracing();
    let total = 5;
    for failing in 0..total {
        let tasks = (0..total)
            .map(|i| {
                let name = format!("job-{i}");
                if i == failing {
                    RecordingTask::failing(&name, "boom")
                } else {
                    RecordingTask::ok(&name)
                }
            })
            .collect();
        let mut runner = plain_runner(tasks);

        let err = runner.run_all().await.unwrap_err();
        assert_eq!(err.job(), format!("job-{failing}"));

        let statuses = statuses(&runner);
        for (i, status) in statuses.iter().enumerate() {
            let expected = match i.cmp(&failing) {
                std::cmp::Ordering::Less => JobStatus::Ok,
                std::cmp::Ordering::Equal => JobStatus::Error,
                std::cmp::Ordering::Greater => JobStatus::Waiting,
            };
            assert_eq!(*status, expected, "job {i} with failure at {failing}");
        }
        assert_eq!(runner.context().calls.len(), failing + 1);
    }
}

#[tokio::test]
async fn rerunning_after_failure_is_refused() {
    init_tracing();
    let mut runner = plain_runner(vec![
        RecordingTask::failing("A", "boom"),
        RecordingTask::ok("B"),
    ]);
    runner.run_all().await.unwrap_err();

    let err = runner.run_next().await.unwrap_err();
    assert_eq!(err.stage(), JobStage::Order);
    assert_eq!(runner.context().calls, ["A"]);
}

#[tokio::test]
async fn empty_list_draws_only_the_header() {
    init_tracing();
    let mut runner = plain_runner(Vec::new());
    runner.run_all().await.unwrap();

    assert_eq!(
        runner.console().surface().screen(),
        ["Setup mkxray, please wait..."]
    );
}

#[tokio::test(start_paused = true)]
async fn cancelling_interrupts_a_slow_job() {
    init_tracing();
    let mut runner = plain_runner(vec![
        RecordingTask::ok("A"),
        RecordingTask::ok("B")
            .writing("waiting for service")
            .sleeping(Duration::from_secs(600)),
        RecordingTask::ok("C"),
    ]);
    let token = runner.cancellation_token();
    tokio::spawn(async move {
        tokio::time::sleep(Duration::from_secs(5)).await;
        token.cancel();
    });

    let err = runner.run_all().await.unwrap_err();

    assert!(err.is_interrupted());
    assert_eq!(err.job(), "B");
    assert_eq!(
        statuses(&runner),
        [JobStatus::Ok, JobStatus::Error, JobStatus::Waiting]
    );
    assert_eq!(runner.context().calls, ["A", "B"]);
}
