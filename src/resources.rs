// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Redfish-shaped resource types and the composite identifiers used to
//! address them
//!
//! Only the fields the simulator acts on are modeled explicitly; everything
//! else a mockup supplies rides along in the flattened `extra` maps.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// Prefix of every resource path served by the simulator.
pub const REDFISH_SYSTEMS_BASE: &str = "/redfish/v1/Systems";

/// Redfish name of the secure-erase action in a drive's `Actions` map.
pub const SECURE_ERASE_ACTION: &str = "#Drive.SecureErase";

/// Identifies a storage controller: `(system, storage)`.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct StorageKey {
    pub system: String,
    pub storage: String,
}

impl StorageKey {
    pub fn new(system: &str, storage: &str) -> StorageKey {
        StorageKey { system: system.to_string(), storage: storage.to_string() }
    }

    /// Resource path of this storage controller.
    pub fn uri(&self) -> String {
        format!("{}/{}/Storage/{}", REDFISH_SYSTEMS_BASE, self.system, self.storage)
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.system, self.storage)
    }
}

/// Identifies a drive: `(system, storage, drive)`.
#[derive(Clone, Debug, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct DriveKey {
    pub system: String,
    pub storage: String,
    pub drive: String,
}

impl DriveKey {
    pub fn new(system: &str, storage: &str, drive: &str) -> DriveKey {
        DriveKey {
            system: system.to_string(),
            storage: storage.to_string(),
            drive: drive.to_string(),
        }
    }

    /// The key of the storage controller owning this drive.
    pub fn storage_key(&self) -> StorageKey {
        StorageKey { system: self.system.clone(), storage: self.storage.clone() }
    }

    /// Resource path of this drive.
    pub fn uri(&self) -> String {
        format!("{}/Drives/{}", self.storage_key().uri(), self.drive)
    }

    /// Target path of the drive's secure-erase action.
    pub fn erase_target(&self) -> String {
        format!("{}/Actions/Drive.SecureErase", self.uri())
    }

    /// Parse a drive reference path of the conventional form
    /// `/redfish/v1/Systems/{system}/Storage/{storage}/Drives/{drive}`.
    ///
    /// Resource loading keys drives off the reference paths embedded in the
    /// owning storage resource, so this is the inverse of [`DriveKey::uri`].
    pub fn parse(path: &str) -> Option<DriveKey> {
        let segments: Vec<&str> =
            path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            ["redfish", "v1", "Systems", system, "Storage", storage, "Drives", drive] => {
                Some(DriveKey::new(system, storage, drive))
            }
            _ => None,
        }
    }
}

impl fmt::Display for DriveKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.system, self.storage, self.drive)
    }
}

/// State of a drive as reported in `Status.State`.
///
/// `ENABLED` is the load-time default; the secure-erase operation moves a
/// drive through `INPROGRESS` to `COMPLETE`. `FAILED` is reported when an
/// operation terminates unexpectedly.
#[derive(
    Clone, Copy, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq,
)]
#[serde(rename_all = "UPPERCASE")]
pub enum DriveState {
    Enabled,
    InProgress,
    Complete,
    Failed,
}

impl fmt::Display for DriveState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DriveState::Enabled => "ENABLED",
            DriveState::InProgress => "INPROGRESS",
            DriveState::Complete => "COMPLETE",
            DriveState::Failed => "FAILED",
        };
        write!(f, "{}", s)
    }
}

#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct DriveStatus {
    #[serde(rename = "State")]
    pub state: DriveState,
}

/// One entry of a drive's `Operations` list.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct DriveOperation {
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "PercentageComplete")]
    pub percentage_complete: u8,
}

/// Target of an entry in a resource's `Actions` map.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct ActionTarget {
    pub target: String,
}

/// A bare `@odata.id` reference to another resource.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema, PartialEq, Eq)]
pub struct OdataRef {
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
}

/// A drive resource.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct Drive {
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Status")]
    pub status: DriveStatus,
    #[serde(rename = "Operations", default, skip_serializing_if = "Vec::is_empty")]
    pub operations: Vec<DriveOperation>,
    #[serde(
        rename = "Actions",
        default,
        skip_serializing_if = "BTreeMap::is_empty"
    )]
    pub actions: BTreeMap<String, ActionTarget>,
    /// Descriptive fields the simulator carries but does not interpret.
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Drive {
    /// Build the initial snapshot of a drive as registered at load time: no
    /// operations, `ENABLED`, secure-erase action armed.
    pub fn new(
        key: &DriveKey,
        name: Option<String>,
        extra: BTreeMap<String, serde_json::Value>,
    ) -> Drive {
        Drive {
            odata_id: key.uri(),
            id: key.drive.clone(),
            name: name.unwrap_or_else(|| key.drive.clone()),
            status: DriveStatus { state: DriveState::Enabled },
            operations: Vec::new(),
            actions: default_drive_actions(key),
            extra,
        }
    }
}

/// A storage controller resource. Immutable after load except for the
/// `Actions` maps of its child drives.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct Storage {
    #[serde(rename = "@odata.id")]
    pub odata_id: String,
    #[serde(rename = "Id")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Drives@odata.count")]
    pub drive_count: usize,
    #[serde(rename = "Drives", default)]
    pub drives: Vec<OdataRef>,
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl Storage {
    pub fn new(
        key: &StorageKey,
        name: Option<String>,
        drive_ids: &[String],
    ) -> Storage {
        let drives: Vec<OdataRef> = drive_ids
            .iter()
            .map(|drive_id| OdataRef {
                odata_id: DriveKey::new(&key.system, &key.storage, drive_id)
                    .uri(),
            })
            .collect();
        Storage {
            odata_id: key.uri(),
            id: key.storage.clone(),
            name: name.unwrap_or_else(|| key.storage.clone()),
            drive_count: drives.len(),
            drives,
            extra: BTreeMap::new(),
        }
    }
}

/// The default action list for a drive: exactly the secure-erase action,
/// targeting the drive's own action path. Installed at load time and
/// re-installed by `Storage.ResetToDefaults`.
pub fn default_drive_actions(key: &DriveKey) -> BTreeMap<String, ActionTarget> {
    let mut actions = BTreeMap::new();
    actions.insert(
        SECURE_ERASE_ACTION.to_string(),
        ActionTarget { target: key.erase_target() },
    );
    actions
}
