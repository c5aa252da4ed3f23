use mkxray::SurfaceOp;

use crate::support::helpers::{
    assert_erase_matches_previous_frame, frames, init_tracing, plain_runner, RecordingTask, HEADER,
};

#[tokio::test]
async fn single_job_is_two_lines() {
    init_tracing();
    let mut runner = plain_runner(vec![RecordingTask::ok("Check system")]);
    runner.run_all().await.unwrap();

    let frames = frames(runner.console().surface().ops());
    assert!(frames.iter().all(|frame| frame.len() == 2));
    assert_eq!(frames.last().unwrap(), &[HEADER, " + Check system"]);
}

#[tokio::test]
async fn erase_matches_previous_write_for_any_output_size() {
    init_tracing();
    for segments in 0..6 {
        let text = (0..segments)
            .map(|i| format!("line {i}"))
            .collect::<Vec<_>>()
            .join("\n");
        let mut task = RecordingTask::ok("A");
        if !text.is_empty() {
            task = task.writing(&text);
        }
        let mut runner = plain_runner(vec![
            task,
            RecordingTask::ok("B").writing("one").writing("\ntwo"),
        ]);
        runner.run_all().await.unwrap();

        let ops = runner.console().surface().ops();
        assert_eq!(ops.first(), Some(&SurfaceOp::Clear(0)));
        assert_erase_matches_previous_frame(ops).unwrap();
        assert_eq!(runner.console().surface().screen(), runner.console().lines());
    }
}

#[tokio::test]
async fn every_output_segment_gets_its_own_line() {
    init_tracing();
    let mut runner = plain_runner(vec![
        RecordingTask::ok("Download").writing("fetching\n2048 bytes\ndone"),
        RecordingTask::ok("Install"),
    ]);
    runner.run_all().await.unwrap();

    assert_eq!(
        runner.console().lines(),
        [
            HEADER,
            " + Download",
            "      fetching",
            "      2048 bytes",
            "      done",
            " + Install",
        ]
    );
}

#[tokio::test]
async fn failed_job_keeps_its_output_on_screen() {
    init_tracing();
    let mut runner = plain_runner(vec![
        RecordingTask::failing("Restart xray", "service did not start").writing("journal tail"),
        RecordingTask::ok("Never"),
    ]);
    runner.run_all().await.unwrap_err();

    assert_eq!(
        runner.console().surface().screen(),
        [HEADER, " x Restart xray", "      journal tail", " - Never"]
    );
}

#[tokio::test]
async fn footer_is_appended_after_success() {
    init_tracing();
    let mut runner = plain_runner(vec![RecordingTask::ok("A")]);
    runner.run_all().await.unwrap();
    runner
        .finish(vec![String::new(), "vless://example".to_owned()])
        .unwrap();

    assert_eq!(
        runner.console().surface().screen(),
        [HEADER, " + A", "", "vless://example"]
    );
    assert_erase_matches_previous_frame(runner.console().surface().ops()).unwrap();
}
