// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Library interface to the simulated Redfish storage service

use crate::config::{Config, ConfigSystem};
use crate::http_entrypoints::api as http_api;
use crate::registry::StorageSim;
use crate::resources::{Drive, DriveKey, Storage, StorageKey};
use slog::Logger;
use std::sync::Arc;
use std::time::Duration;

/// Packages up a [`StorageSim`], running the simulated Redfish storage API
/// under a dropshot server wired up to it.
pub struct Server {
    /// underlying simulated registry and operation controller
    pub sim: Arc<StorageSim>,
    /// dropshot server for the API
    pub http_server: dropshot::HttpServer<Arc<StorageSim>>,
}

impl Server {
    /// Start the simulated storage service, loading the resource tree
    /// described by `config`.
    pub async fn start(config: &Config, log: &Logger) -> Result<Server, String> {
        info!(log, "setting up simulated redfish storage service");

        let sim_log = log.new(o!("component" => "StorageSim"));
        let sim = Arc::new(StorageSim::new(
            Duration::from_millis(config.secure_erase_time_ms),
            sim_log,
        ));

        load_resources(&sim, &config.systems, log).await;

        let dropshot_log = log.new(o!("component" => "dropshot"));
        let http_server = dropshot::HttpServerStarter::new(
            &config.dropshot,
            http_api(),
            Arc::clone(&sim),
            &dropshot_log,
        )
        .map_err(|error| format!("initializing server: {}", error))?
        .start();

        info!(log, "simulated redfish storage service started";
            "address" => %http_server.local_addr(),
        );
        Ok(Server { sim, http_server })
    }

    /// Wait for the given server to shut down
    ///
    /// Note that this doesn't initiate a graceful shutdown, so if you call
    /// this immediately after calling `start()`, the program will block
    /// indefinitely or until something else initiates a graceful shutdown.
    pub async fn wait_for_finish(self) -> Result<(), String> {
        self.http_server.await
    }
}

/// Populate the registry from the configured resource tree.
///
/// Drives are registered by parsing the reference paths embedded in their
/// owning storage resource, following the
/// `.../Storage/{storage}/Drives/{drive}` path convention.
async fn load_resources(
    sim: &Arc<StorageSim>,
    systems: &[ConfigSystem],
    log: &Logger,
) {
    for system in systems {
        sim.insert_system(&system.id, system.powered_on).await;
        for storage_config in &system.storage {
            let storage_key = StorageKey::new(&system.id, &storage_config.id);
            let drive_ids: Vec<String> = storage_config
                .drives
                .iter()
                .map(|drive| drive.id.clone())
                .collect();
            let storage = Storage::new(
                &storage_key,
                storage_config.name.clone(),
                &drive_ids,
            );

            for (drive_config, drive_ref) in
                storage_config.drives.iter().zip(&storage.drives)
            {
                let Some(drive_key) = DriveKey::parse(&drive_ref.odata_id)
                else {
                    warn!(log, "skipping drive with malformed reference";
                        "path" => &drive_ref.odata_id,
                    );
                    continue;
                };
                let drive = Drive::new(
                    &drive_key,
                    drive_config.name.clone(),
                    drive_config.extra.clone(),
                );
                sim.insert_drive(drive_key, drive).await;
            }

            sim.insert_storage(storage_key, storage).await;
        }
    }
}

/// Run an instance of the [`Server`].
pub async fn run_server(config: &Config) -> Result<(), String> {
    let log = config
        .log
        .to_logger("redfish-storage-sim")
        .map_err(|message| format!("initializing logger: {}", message))?;

    let server = Server::start(config, &log).await?;
    info!(log, "simulated redfish storage service running");
    server.wait_for_finish().await
}
