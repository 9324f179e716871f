//! Check definitions and their results.

use serde::Serialize;

use crate::command::CommandSpec;

/// What a flagged concern does to the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Any failure halts the sequence.
    Strict,
    /// Output concerns are reported and the sequence continues.
    /// Execution failures still halt.
    Advisory,
}

/// Verdict of an output inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inspection {
    Clean,
    Concern(String),
}

/// Inspects captured stdout of a successful command.
pub type Inspector = fn(&str) -> Inspection;

/// A named pre/post-condition step.
#[derive(Clone)]
pub struct Check {
    pub name: String,
    /// `None` makes the check vacuous: it always passes.
    pub command: Option<CommandSpec>,
    pub mode: Mode,
    pub inspector: Option<Inspector>,
    /// Printed when the check fails.
    pub failure_message: String,
}

impl Check {
    pub fn strict(
        name: impl Into<String>,
        command: CommandSpec,
        failure_message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            command: Some(command),
            mode: Mode::Strict,
            inspector: None,
            failure_message: failure_message.into(),
        }
    }

    pub fn advisory(
        name: impl Into<String>,
        command: CommandSpec,
        inspector: Inspector,
        failure_message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            command: Some(command),
            mode: Mode::Advisory,
            inspector: Some(inspector),
            failure_message: failure_message.into(),
        }
    }

    /// Placeholder step with nothing to run.
    pub fn placeholder(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            command: None,
            mode: Mode::Strict,
            inspector: None,
            failure_message: String::new(),
        }
    }

    pub fn with_inspector(mut self, inspector: Inspector) -> Self {
        self.inspector = Some(inspector);
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    Passed,
    Warned,
    Failed,
}

/// Result of executing one check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    pub name: String,
    pub outcome: Outcome,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_output: Option<String>,
    /// Failure or warning text, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Aggregate of one hook invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HookOutcome {
    pub hook: String,
    pub success: bool,
    pub results: Vec<CheckResult>,
}

impl HookOutcome {
    pub fn new(hook: impl Into<String>, results: Vec<CheckResult>) -> Self {
        let success = results.iter().all(|r| r.outcome != Outcome::Failed);
        Self {
            hook: hook.into(),
            success,
            results,
        }
    }

    pub fn success(&self) -> bool {
        self.success
    }

    /// 0 when nothing failed, 1 otherwise.
    pub fn exit_code(&self) -> u8 {
        if self.success {
            0
        } else {
            1
        }
    }

    pub fn failed(&self) -> Option<&CheckResult> {
        self.results.iter().find(|r| r.outcome == Outcome::Failed)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(|r| r.outcome == Outcome::Warned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn result(name: &str, outcome: Outcome) -> CheckResult {
        CheckResult {
            name: name.to_string(),
            outcome,
            captured_output: None,
            message: None,
        }
    }

    #[test]
    fn test_outcome_with_warnings_is_success() {
        let outcome = HookOutcome::new(
            "pre-review",
            vec![result("repo", Outcome::Passed), result("status", Outcome::Warned)],
        );

        assert!(outcome.success());
        assert_eq!(outcome.exit_code(), 0);
        assert!(outcome.failed().is_none());
        assert_eq!(outcome.warnings().count(), 1);
    }

    #[test]
    fn test_outcome_with_failure_exits_one() {
        let outcome = HookOutcome::new("pre-deploy", vec![result("kubectl", Outcome::Failed)]);

        assert!(!outcome.success());
        assert_eq!(outcome.exit_code(), 1);
        assert_eq!(outcome.failed().map(|r| r.name.as_str()), Some("kubectl"));
    }

    #[test]
    fn test_empty_outcome_is_success() {
        assert_eq!(HookOutcome::new("noop", Vec::new()).exit_code(), 0);
    }

    #[test]
    fn test_outcome_serializes_snake_case() {
        let mut warned = result("status", Outcome::Warned);
        warned.message = Some("Uncommitted changes detected".to_string());
        let outcome = HookOutcome::new("pre-review", vec![warned]);

        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["hook"], "pre-review");
        assert_eq!(json["success"], true);
        assert_eq!(json["results"][0]["outcome"], "warned");
        assert_eq!(json["results"][0]["message"], "Uncommitted changes detected");
        assert!(json["results"][0].get("captured_output").is_none());
    }

    #[test]
    fn test_placeholder_has_no_command() {
        let check = Check::placeholder("Running smoke tests");
        assert!(check.command.is_none());
        assert_eq!(check.mode, Mode::Strict);
    }
}
