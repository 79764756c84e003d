//! # sourcefetch
//!
//! Interactive setup for a microcontroller firmware SDK.
//!
//! A run asks for a vendor and board, merges the board's Kconfig option
//! files into a `.config` snapshot, lets the user edit it in the Kconfig GUI,
//! clones the SDK into a directory of the user's choosing, regenerates the
//! snapshot there together with a `boardChoice.csv` record, and finally runs
//! the SDK's own configuration script.
//!
//! The Kconfig semantics, the GUI and the clone all belong to external
//! tools; this crate only orders and connects them.
//!
//! ## Modules
//!
//! - [`catalog`] - vendor/board reference data
//! - [`menu`] - numbered console menus
//! - [`locate`] - board option file discovery
//! - [`merge`] - merge tool invocation
//! - [`menuconfig`] - GUI editor invocation
//! - [`bootstrap`] - clone, record and handoff
//! - [`config`] - settings file
//! - [`ctx`] - application context and path layout
//! - [`utils`] - process helpers

/// Output tree bootstrapping and the full setup flow.
pub mod bootstrap;

/// Vendor/board catalog.
pub mod catalog;

/// Settings file handling.
pub mod config;

/// Application context and state management.
pub mod ctx;

/// Layered Kconfig file discovery.
pub mod locate;

/// Numbered console menus.
pub mod menu;

/// Graphical configuration editing.
pub mod menuconfig;

/// Kconfig merge tool invocation.
pub mod merge;

/// Common utilities and helper functions.
pub mod utils;

#[macro_use]
extern crate log;
#[macro_use]
extern crate anyhow;
