#![allow(dead_code, unused_imports)]

pub use flowdag_test_utils::fake_executor::{
    Behaviour, ExecutionLog, FakeExecutor, fake_task, ok_task,
};
pub use flowdag_test_utils::{init_tracing, with_timeout};

use std::time::Duration;

use flowdag::{Flow, FlowOptions, Task};

/// Flow with the given tasks registered in order and a short timeout.
pub fn flow_of(name: &str, tasks: Vec<Task<String>>) -> Flow<String> {
    let options = FlowOptions::default().with_timeout(Duration::from_secs(2));
    let mut flow = Flow::with_options(name, options);
    for task in tasks {
        flow.add_task(task).expect("task registration failed");
    }
    flow
}

/// A -> {B, C} -> D, with B and C sleeping `overlap` before finishing.
pub fn diamond(log: &ExecutionLog, overlap: Duration) -> Flow<String> {
    flow_of(
        "diamond",
        vec![
            ok_task("A", &[], log),
            fake_task("B", &["A"], Behaviour::SleepThen(overlap, "B-out".into()), log),
            fake_task("C", &["A"], Behaviour::SleepThen(overlap, "C-out".into()), log),
            ok_task("D", &["B", "C"], log),
        ],
    )
}
