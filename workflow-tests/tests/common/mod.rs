//! Common test utilities for workflow tests.

use workflow_tests::WorkflowContext;

/// Create a fresh context with its own backend and snapshot location.
///
/// This is the main entry point for workflow tests.
pub fn setup() -> WorkflowContext {
    WorkflowContext::new().expect("Failed to create workflow context")
}
