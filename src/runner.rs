//! Sequential, fail-fast check execution.

use tracing::{debug, warn};

use crate::check::{Check, CheckResult, HookOutcome, Inspection, Mode, Outcome};
use crate::command::{CommandRunner, OutputMode};

/// Receives progress while a hook runs.
pub trait Reporter {
    fn started(&mut self, _hook: &str) {}
    fn check_started(&mut self, _check: &Check) {}
    fn check_finished(&mut self, _result: &CheckResult) {}
    fn finished(&mut self, _outcome: &HookOutcome) {}
}

/// Human-readable status lines. Problems go to stderr.
#[derive(Debug, Default)]
pub struct ConsoleReporter;

impl Reporter for ConsoleReporter {
    fn started(&mut self, hook: &str) {
        println!("Running {} checks...", hook);
    }

    fn check_started(&mut self, check: &Check) {
        println!("{}...", check.name);
    }

    fn check_finished(&mut self, result: &CheckResult) {
        let message = result.message.as_deref().unwrap_or(&result.name);
        match result.outcome {
            Outcome::Passed => {}
            Outcome::Warned => eprintln!("Warning: {}", message),
            Outcome::Failed => eprintln!("Error: {}", message),
        }
    }

    fn finished(&mut self, outcome: &HookOutcome) {
        if !outcome.success() {
            return;
        }
        match outcome.warnings().count() {
            0 => println!("{} checks passed", outcome.hook),
            n => println!("{} checks passed with {} warning(s)", outcome.hook, n),
        }
    }
}

/// Discards all progress.
#[derive(Debug, Default)]
pub struct SilentReporter;

impl Reporter for SilentReporter {}

/// Runs checks one after another and stops at the first failure.
pub struct CheckRunner<'a> {
    commands: &'a dyn CommandRunner,
}

impl<'a> CheckRunner<'a> {
    pub fn new(commands: &'a dyn CommandRunner) -> Self {
        Self { commands }
    }

    pub fn run(&self, hook: &str, checks: &[Check], reporter: &mut dyn Reporter) -> HookOutcome {
        reporter.started(hook);

        let mut results = Vec::with_capacity(checks.len());
        for check in checks {
            reporter.check_started(check);
            let result = self.execute(check);
            reporter.check_finished(&result);

            let failed = result.outcome == Outcome::Failed;
            results.push(result);
            if failed {
                debug!(hook, remaining = checks.len() - results.len(), "Halting after failure");
                break;
            }
        }

        let outcome = HookOutcome::new(hook, results);
        reporter.finished(&outcome);
        outcome
    }

    fn execute(&self, check: &Check) -> CheckResult {
        let Some(spec) = &check.command else {
            debug!(check = %check.name, "Nothing to run");
            return passed(check, None);
        };

        let output = match self.commands.run(spec) {
            Ok(output) => output,
            Err(e) => {
                warn!(check = %check.name, error = %e, "Command could not be run");
                return failed(check, None, check.failure_message.clone());
            }
        };

        let captured = match spec.output {
            OutputMode::Capture if !output.stdout.is_empty() => Some(output.stdout.clone()),
            _ => None,
        };

        if !output.success() {
            warn!(check = %check.name, command = %spec, status = ?output.status, "Command failed");
            return failed(check, captured, check.failure_message.clone());
        }

        let inspection = check
            .inspector
            .map_or(Inspection::Clean, |inspect| inspect(&output.stdout));

        match (inspection, check.mode) {
            (Inspection::Clean, _) => passed(check, captured),
            (Inspection::Concern(concern), Mode::Advisory) => {
                warn!(check = %check.name, %concern, "Advisory concern");
                CheckResult {
                    name: check.name.clone(),
                    outcome: Outcome::Warned,
                    captured_output: captured,
                    message: Some(concern),
                }
            }
            (Inspection::Concern(concern), Mode::Strict) => {
                warn!(check = %check.name, %concern, "Strict concern");
                let message = if check.failure_message.is_empty() {
                    concern
                } else {
                    format!("{} ({})", check.failure_message, concern)
                };
                failed(check, captured, message)
            }
        }
    }
}

fn passed(check: &Check, captured_output: Option<String>) -> CheckResult {
    CheckResult {
        name: check.name.clone(),
        outcome: Outcome::Passed,
        captured_output,
        message: None,
    }
}

fn failed(check: &Check, captured_output: Option<String>, message: String) -> CheckResult {
    CheckResult {
        name: check.name.clone(),
        outcome: Outcome::Failed,
        captured_output,
        message: Some(message),
    }
}
