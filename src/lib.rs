//! Idempotent provisioning engine for an Arch Linux niri desktop.
//!
//! The core is a declarative config-sync engine: a state [`ledger`] records
//! everything the tool creates, the [`mapper`] deterministically enumerates
//! the source tree, and symlink/text-block [`resources`] reconcile the home
//! directory against it. [`tasks`] compose those primitives into install,
//! update, uninstall, and verify flows driven by the [`commands`] layer.
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod exec;
pub mod ledger;
pub mod logging;
pub mod mapper;
pub mod resources;
pub mod tasks;
