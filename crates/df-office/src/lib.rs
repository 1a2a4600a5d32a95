//! # df-office
//!
//! Everything needed to run the headless office suite once, safely.
//!
//! This crate provides:
//!
//! - **Tool discovery** ([`ToolLocator`]) -- find `soffice` / `libreoffice`
//!   and report its version.
//! - **Provisioning** ([`Provisioner`], [`AptProvisioner`]) -- install or
//!   remove the office suite through the system package manager.
//! - **Command execution** ([`ToolCommand`]) -- async builder with timeout
//!   support that kills and reaps the child on expiry.
//! - **Scratch environments** ([`ScratchRoot`], [`ScratchEnvironment`]) --
//!   per-invocation profile directories removed on every exit path.
//! - **Single-job conversion** ([`Converter`]) -- the full validate, invoke,
//!   locate-output sequence, mapped to a
//!   [`ConversionOutcome`](df_core::ConversionOutcome).

pub mod command;
pub mod converter;
pub mod output;
pub mod scratch;
pub mod tools;

// ---- Re-exports for convenience ----

pub use command::{CommandError, ToolCommand, ToolOutput};
pub use converter::Converter;
pub use scratch::{ScratchEnvironment, ScratchRoot};
pub use tools::{AptProvisioner, Provisioner, ToolInfo, ToolLocator};
