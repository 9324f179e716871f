//! The concrete hook check sequences.

use std::fmt;

use clap::ValueEnum;

use crate::check::{Check, Inspection};
use crate::command::CommandSpec;
use crate::config::Config;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Hook {
    /// Validate tooling and cluster access before deploying
    PreDeploy,
    /// Wait for the rollout and run smoke tests
    PostDeploy,
    /// Make sure a review can start from a git checkout
    PreReview,
}

impl Hook {
    pub fn name(self) -> &'static str {
        match self {
            Hook::PreDeploy => "pre-deploy",
            Hook::PostDeploy => "post-deploy",
            Hook::PreReview => "pre-review",
        }
    }

    /// Ordered checks for this hook.
    pub fn checks(self, config: &Config) -> Vec<Check> {
        match self {
            Hook::PreDeploy => pre_deploy(config),
            Hook::PostDeploy => post_deploy(config),
            Hook::PreReview => pre_review(config),
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn pre_deploy(config: &Config) -> Vec<Check> {
    let kubectl = &config.kubectl.binary;
    vec![
        Check::strict(
            format!("Checking for {}", kubectl),
            CommandSpec::capture("which", [kubectl.as_str()]),
            format!("{} not found. Please install Kubernetes CLI.", kubectl),
        ),
        Check::strict(
            "Checking cluster connection",
            CommandSpec::capture(kubectl.as_str(), ["cluster-info"]),
            "Not connected to Kubernetes cluster",
        ),
    ]
}

fn post_deploy(config: &Config) -> Vec<Check> {
    let kubectl = &config.kubectl;
    let mut checks = vec![Check::strict(
        "Waiting for pods to be ready",
        CommandSpec::inherit(
            kubectl.binary.as_str(),
            [
                "wait".to_string(),
                "--for=condition=ready".to_string(),
                "pod".to_string(),
                "-l".to_string(),
                kubectl.selector.clone(),
                format!("--timeout={}s", kubectl.timeout_secs),
            ],
        ),
        "Pods failed to become ready",
    )];

    let smoke_tests = &config.post_deploy.smoke_tests;
    if smoke_tests.is_empty() {
        checks.push(Check::placeholder("Running smoke tests"));
    } else {
        checks.extend(smoke_tests.iter().map(|line| {
            Check::strict(
                format!("Running smoke test: {}", line),
                CommandSpec::shell(line.as_str()),
                format!("Smoke test failed: {}", line),
            )
        }));
    }
    checks
}

fn pre_review(config: &Config) -> Vec<Check> {
    let git = config.git.binary.as_str();
    vec![
        Check::strict(
            "Checking for git repository",
            CommandSpec::capture(git, ["rev-parse", "--git-dir"]),
            "Not a git repository",
        ),
        Check::advisory(
            "Checking for uncommitted changes",
            CommandSpec::capture(git, ["status", "--porcelain"]),
            uncommitted_changes,
            "Failed to check git status",
        ),
    ]
}

/// `git status --porcelain` prints nothing for a clean tree.
fn uncommitted_changes(status: &str) -> Inspection {
    if status.trim().is_empty() {
        Inspection::Clean
    } else {
        Inspection::Concern("Uncommitted changes detected".to_string())
    }
}
