// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Library interface to the simulated Redfish storage service
//!
//! This crate emulates a small slice of a Redfish hardware-management API:
//! read endpoints for a system's storage controller and its drives, a
//! `Drive.SecureErase` action that runs as a simulated long-running
//! operation, and a `Storage.ResetToDefaults` action that re-arms the drive
//! action list.

#[macro_use]
extern crate slog;

pub mod config;
mod erase;
pub mod error;
mod http_entrypoints;
mod registry;
pub mod resources;
mod server;

pub use http_entrypoints::ResetToDefaultsResponse;
pub use http_entrypoints::SecureEraseAck;
pub use registry::EraseDispatch;
pub use registry::StorageSim;
pub use server::run_server;
pub use server::Server;
