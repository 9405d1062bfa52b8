// tests/command_executor.rs
//
// Runs real child processes through `sh`, so these are unix-only.
#![cfg(unix)]

mod common;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;

use flowdag::config::FlowFile;
use flowdag::exec::{CommandExecutor, CommandOutput, output_env_var};
use flowdag::{Flow, FlowError, FlowOptions, Task, TaskFailure};
use flowdag_test_utils::builders::{FlowFileBuilder, TaskConfigBuilder};

type TestResult = Result<(), Box<dyn Error>>;

#[test]
fn output_env_var_is_upper_snake_case() {
    assert_eq!(output_env_var("build"), "FLOWDAG_OUT_BUILD");
    assert_eq!(output_env_var("fetch-deps.v2"), "FLOWDAG_OUT_FETCH_DEPS_V2");
}

#[tokio::test]
async fn dependency_stdout_is_exported_to_dependents() -> TestResult {
    init_tracing();

    let cfg: FlowFile = FlowFileBuilder::new()
        .name("shell")
        .with_task("greeting", TaskConfigBuilder::new("echo hello").build())
        .with_task(
            "shout",
            TaskConfigBuilder::new("echo \"$FLOWDAG_OUT_GREETING world\"")
                .after("greeting")
                .build(),
        )
        .build();

    let ctx = with_timeout(cfg.to_flow()?.run()).await?;

    let greeting = ctx.get("greeting").expect("greeting output");
    assert_eq!(greeting.stdout, "hello\n");
    assert_eq!(greeting.exit_code, 0);
    assert_eq!(ctx.get("shout").map(|o| o.to_string()), Some("hello world".to_string()));

    Ok(())
}

#[tokio::test]
async fn non_zero_exit_fails_the_task_and_skips_dependents() -> TestResult {
    init_tracing();

    let mut flow: Flow<CommandOutput> = Flow::new("exit-codes");
    flow.add("broken", Vec::<String>::new(), CommandExecutor::new("broken", "exit 3", vec![]))?
        .add(
            "never",
            ["broken"],
            CommandExecutor::new("never", "echo unreachable", vec!["broken".to_string()]),
        )?;

    let err = with_timeout(flow.run()).await.expect_err("flow should fail");

    let agg = match &err {
        FlowError::Aggregate(agg) => agg,
        e => panic!("Expected aggregate failure, got: {e:?}"),
    };
    match agg.failure_for("broken") {
        Some(TaskFailure::Execution(e)) => assert!(e.to_string().contains("status 3"), "{e}"),
        other => panic!("Expected execution failure, got: {other:?}"),
    }
    assert!(agg.failure_for("never").is_some_and(TaskFailure::is_skipped));

    Ok(())
}

#[tokio::test]
async fn long_running_command_times_out() -> TestResult {
    init_tracing();

    let mut flow: Flow<CommandOutput> =
        Flow::with_options("sleepy", FlowOptions::default().with_timeout_ms(200));
    flow.add_task(Task::new("nap", CommandExecutor::new("nap", "sleep 5", vec![])))?;

    let err = with_timeout(flow.run()).await.expect_err("flow should time out");

    let agg = err.as_aggregate().expect("aggregate failure");
    assert!(agg.failure_for("nap").is_some_and(TaskFailure::is_timeout));

    Ok(())
}
