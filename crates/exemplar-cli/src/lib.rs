//! # exemplar-cli
//!
//! Command implementations behind the `exemplar` binary. Each command takes
//! the resolved [`ExemplarConfig`](exemplar_core::ExemplarConfig) and returns
//! a process exit code.

pub mod commands;
pub mod exit_codes;
