//! Installer Core - Shared library for the Solaris project scaffolder
//!
//! This library drives the `solaris new` workflow: collect configuration,
//! validate it, scaffold a fresh application through the framework's own
//! tooling, wire up the private Solaris packages and patch the generated
//! environment files.
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Core Operations** - Pure option tables, command builders,
//!   file patching and process execution
//! - **Layer 2: Workflow Orchestration** - [`install::run`] sequences the
//!   whole pipeline from a validated [`ScaffoldPlan`]
//! - **Layer 3: CLI/TUI Interface** - Optional cliclack-based prompts
//!   (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts module
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use installer_core::{install, NewArgs};
//!
//! let args = NewArgs {
//!     name: Some("example-app".into()),
//!     token: Some("ghp_token".into()),
//!     laravel: true,
//!     ..NewArgs::default()
//! };
//! let exit_code = install::run(args).await?;
//! ```

pub mod env;
pub mod error;
pub mod install;
pub mod options;
pub mod plan;
pub mod runner;
pub mod runtime;
pub mod shell;

#[cfg(feature = "tui")]
pub mod tui;

// Re-export main types for convenience
pub use error::InstallError;
pub use options::{Backend, Database, Frontend, SolarisPackage};
pub use plan::{DatabaseSettings, NewArgs, ScaffoldPlan};
pub use runner::{CommandBatch, CommandRunner, ProcessResult};

#[cfg(feature = "tui")]
pub use tui::run;
