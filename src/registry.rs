// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Simulated storage resource registry and secure-erase operation controller
//!
//! All resource state lives behind one async mutex. Request handlers read
//! through it, the loader writes through it once at startup, and erase
//! workers mutate through it when their simulated delay elapses, so for any
//! one drive the `INPROGRESS` and `COMPLETE` transitions are observed
//! strictly in order.

use crate::erase;
use crate::error::Error;
use crate::resources::{
    default_drive_actions, Drive, DriveKey, DriveState, Storage, StorageKey,
};
use futures::lock::Mutex;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use slog::Logger;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Outcome of a secure-erase start request.
///
/// A request against a drive whose previous operation is still running is
/// accepted but ignored; the caller can tell the two apart by this value.
#[derive(
    Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq,
)]
#[serde(rename_all = "snake_case")]
pub enum EraseDispatch {
    Started,
    AlreadyRunning,
}

/// A registered drive plus the controller-side record of its most recent
/// erase task.
struct DriveEntry {
    drive: Drive,
    /// Handle for the most recently dispatched erase task. Replaced on
    /// re-dispatch, never removed; a live (unfinished) handle is what makes a
    /// second start request a no-op.
    erase_task: Option<JoinHandle<()>>,
}

impl DriveEntry {
    fn new(drive: Drive) -> DriveEntry {
        DriveEntry { drive, erase_task: None }
    }
}

struct StorageSimInner {
    power: HashMap<String, bool>,
    storages: HashMap<StorageKey, Storage>,
    drives: HashMap<DriveKey, DriveEntry>,
}

impl StorageSimInner {
    fn new() -> StorageSimInner {
        StorageSimInner {
            power: HashMap::new(),
            storages: HashMap::new(),
            drives: HashMap::new(),
        }
    }

    fn is_powered_on(&self, system: &str) -> Result<bool, Error> {
        self.power
            .get(system)
            .copied()
            .ok_or_else(|| Error::SystemNotFound(system.to_string()))
    }

    /// All registered drives under the given storage controller, in stable
    /// order.
    fn drives_for_storage(&self, key: &StorageKey) -> Vec<DriveKey> {
        let mut keys: Vec<DriveKey> = self
            .drives
            .keys()
            .filter(|drive_key| drive_key.storage_key() == *key)
            .cloned()
            .collect();
        keys.sort();
        keys
    }
}

/// Simulated registry of storage controllers and drives, plus the controller
/// for the long-running secure-erase operation.
pub struct StorageSim {
    log: Logger,
    /// Simulated duration of a secure-erase operation.
    erase_time: Duration,
    inner: Mutex<StorageSimInner>,
}

impl StorageSim {
    pub fn new(erase_time: Duration, log: Logger) -> StorageSim {
        StorageSim { log, erase_time, inner: Mutex::new(StorageSimInner::new()) }
    }

    /// Registers a system and its initial power state.
    pub async fn insert_system(&self, system_id: &str, powered_on: bool) {
        let mut inner = self.inner.lock().await;
        inner.power.insert(system_id.to_string(), powered_on);
        info!(self.log, "registered system";
            "system" => system_id,
            "powered_on" => powered_on,
        );
    }

    /// Sets the simulated power state of a registered system.
    pub async fn set_powered_on(
        &self,
        system_id: &str,
        powered_on: bool,
    ) -> Result<(), Error> {
        let mut inner = self.inner.lock().await;
        if !inner.power.contains_key(system_id) {
            return Err(Error::SystemNotFound(system_id.to_string()));
        }
        inner.power.insert(system_id.to_string(), powered_on);
        info!(self.log, "set system power state";
            "system" => system_id,
            "powered_on" => powered_on,
        );
        Ok(())
    }

    /// Registers a storage controller resource.
    pub async fn insert_storage(&self, key: StorageKey, storage: Storage) {
        let mut inner = self.inner.lock().await;
        info!(self.log, "registered storage controller"; "storage" => %key);
        inner.storages.insert(key, storage);
    }

    /// Registers a drive resource in its initial state.
    pub async fn insert_drive(&self, key: DriveKey, drive: Drive) {
        let mut inner = self.inner.lock().await;
        info!(self.log, "registered drive"; "drive" => %key);
        inner.drives.insert(key, DriveEntry::new(drive));
    }

    /// Returns a snapshot of a storage controller.
    ///
    /// Requires the owning system to be powered on; a powered-off system
    /// yields a precondition failure rather than a possibly-stale payload.
    pub async fn storage_get(&self, key: &StorageKey) -> Result<Storage, Error> {
        let inner = self.inner.lock().await;
        let storage = inner
            .storages
            .get(key)
            .ok_or_else(|| Error::StorageNotFound(key.clone()))?;
        if !inner.is_powered_on(&key.system)? {
            return Err(Error::SystemPoweredOff(key.system.clone()));
        }
        Ok(storage.clone())
    }

    /// Returns a snapshot of a drive.
    pub async fn drive_get(&self, key: &DriveKey) -> Result<Drive, Error> {
        let inner = self.inner.lock().await;
        inner
            .drives
            .get(key)
            .map(|entry| entry.drive.clone())
            .ok_or_else(|| Error::DriveNotFound(key.clone()))
    }

    /// All registered drives under the given storage controller.
    pub async fn drives_for_storage(&self, key: &StorageKey) -> Vec<DriveKey> {
        self.inner.lock().await.drives_for_storage(key)
    }

    /// Starts a simulated secure-erase operation on the given drive, unless
    /// one is already running.
    ///
    /// On dispatch the drive moves to `INPROGRESS` immediately and a worker
    /// task finishes the operation after the configured simulated duration;
    /// this method does not wait for it. The check of the previous task and
    /// the dispatch of the new one happen under the registry lock, so two
    /// racing requests cannot both dispatch.
    pub async fn drive_secure_erase(
        self: &Arc<Self>,
        key: DriveKey,
    ) -> Result<EraseDispatch, Error> {
        let mut inner = self.inner.lock().await;
        let entry = inner
            .drives
            .get_mut(&key)
            .ok_or_else(|| Error::DriveNotFound(key.clone()))?;

        if let Some(task) = &entry.erase_task {
            if !task.is_finished() {
                info!(self.log, "secure erase already running, ignoring request";
                    "drive" => %key,
                );
                return Ok(EraseDispatch::AlreadyRunning);
            }
        }

        erase::start(&mut entry.drive);

        let sim = Arc::clone(self);
        let worker_key = key.clone();
        let erase_time = self.erase_time;
        entry.erase_task = Some(tokio::spawn(async move {
            tokio::time::sleep(erase_time).await;
            sim.finish_secure_erase(&worker_key).await;
        }));

        info!(self.log, "dispatched secure erase";
            "drive" => %key,
            "simulated_duration" => ?erase_time,
        );
        Ok(EraseDispatch::Started)
    }

    /// Applies the completion transition for a drive's erase task. Called
    /// only from the worker spawned by [`StorageSim::drive_secure_erase`].
    async fn finish_secure_erase(&self, key: &DriveKey) {
        let mut inner = self.inner.lock().await;
        let Some(entry) = inner.drives.get_mut(key) else {
            // Drives are never unregistered, so this indicates a bug.
            error!(self.log, "erase worker found no drive"; "drive" => %key);
            return;
        };
        match erase::finish(&mut entry.drive) {
            DriveState::Complete => {
                info!(self.log, "secure erase complete"; "drive" => %key);
            }
            state => {
                warn!(self.log, "secure erase terminated unexpectedly";
                    "drive" => %key,
                    "state" => %state,
                );
            }
        }
    }

    /// Re-installs the default action list on every drive under the given
    /// storage controller. Pure metadata mutation; running operations are
    /// unaffected. Returns the number of drives updated.
    pub async fn storage_reset_to_defaults(
        &self,
        key: &StorageKey,
    ) -> Result<usize, Error> {
        let mut inner = self.inner.lock().await;
        if !inner.storages.contains_key(key) {
            return Err(Error::StorageNotFound(key.clone()));
        }
        if !inner.is_powered_on(&key.system)? {
            return Err(Error::SystemPoweredOff(key.system.clone()));
        }

        let mut drives_updated = 0;
        for (drive_key, entry) in inner.drives.iter_mut() {
            if drive_key.storage_key() == *key {
                entry.drive.actions = default_drive_actions(drive_key);
                drives_updated += 1;
            }
        }
        info!(self.log, "reset drive actions to defaults";
            "storage" => %key,
            "drives" => drives_updated,
        );
        Ok(drives_updated)
    }
}
