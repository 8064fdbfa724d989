//! Real child processes tracked by the process registry.

#![cfg(unix)]

use bundle_relocator::bundler::{ProcessRegistry, ProcessRunner, ToolInvocation, ToolInvoker};
use std::time::Duration;

#[tokio::test]
async fn in_flight_tool_is_terminated_from_a_signal_arm() {
    let registry = ProcessRegistry::new();
    let runner = ProcessRunner::new(registry.clone());
    let invocation = ToolInvocation::new("sleep").arg("30");

    let run = runner.run(&invocation);
    tokio::pin!(run);

    let signalled = tokio::select! {
        _ = &mut run => panic!("sleep finished before the timer"),
        _ = tokio::time::sleep(Duration::from_millis(300)) => {
            assert_eq!(registry.len(), 1);
            assert!(registry.active()[0].1.starts_with("sleep 30"));
            registry.terminate_all()
        }
    };
    assert_eq!(signalled, 1);

    let output = tokio::time::timeout(Duration::from_secs(10), &mut run)
        .await
        .unwrap()
        .unwrap();
    assert!(!output.success());
    assert_eq!(output.code, None);
    assert!(registry.is_empty());
}

#[tokio::test]
async fn finished_tool_is_deregistered() {
    let registry = ProcessRegistry::new();
    let runner = ProcessRunner::new(registry.clone());

    let output = runner
        .run_checked(&ToolInvocation::new("true"))
        .await
        .unwrap();

    assert!(output.success());
    assert!(registry.is_empty());
    assert_eq!(registry.terminate_all(), 0);
}
