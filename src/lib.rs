//! hookcheck library.
//!
//! Runs ordered pre/post-condition checks for deployment and review hooks.

pub mod check;
pub mod command;
pub mod config;
pub mod error;
pub mod hooks;
pub mod runner;

pub use check::{Check, CheckResult, HookOutcome, Mode, Outcome};
pub use command::{CommandRunner, CommandSpec, SystemRunner};
pub use error::Error;
pub use hooks::Hook;
pub use runner::CheckRunner;
