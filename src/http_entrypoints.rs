// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP entrypoint functions for the simulated Redfish storage API.

use dropshot::{
    endpoint, ApiDescription, HttpError, HttpResponseOk,
    HttpResponseUpdatedNoContent, Path as TypedPath, RequestContext, TypedBody,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::registry::{EraseDispatch, StorageSim};
use crate::resources::{Drive, DriveKey, Storage, StorageKey};

type StorageSimApiDescription = ApiDescription<Arc<StorageSim>>;

/// Returns a description of the simulated Redfish storage API.
pub fn api() -> StorageSimApiDescription {
    fn register_endpoints(
        api: &mut StorageSimApiDescription,
    ) -> Result<(), String> {
        api.register(storage_get)?;
        api.register(drive_get)?;
        api.register(drive_secure_erase)?;
        api.register(storage_reset_to_defaults)?;
        api.register(system_power_state_put)?;
        Ok(())
    }

    let mut api = StorageSimApiDescription::new();
    if let Err(err) = register_endpoints(&mut api) {
        panic!("failed to register entrypoints: {}", err);
    }
    api
}

#[derive(Deserialize, JsonSchema)]
struct StoragePath {
    system_id: String,
    storage_id: String,
}

impl StoragePath {
    fn key(self) -> StorageKey {
        StorageKey { system: self.system_id, storage: self.storage_id }
    }
}

#[derive(Deserialize, JsonSchema)]
struct DrivePath {
    system_id: String,
    storage_id: String,
    drive_id: String,
}

impl DrivePath {
    fn key(self) -> DriveKey {
        DriveKey {
            system: self.system_id,
            storage: self.storage_id,
            drive: self.drive_id,
        }
    }
}

#[derive(Deserialize, JsonSchema)]
struct SystemPath {
    system_id: String,
}

/// Response to a secure-erase action request.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct SecureEraseAck {
    pub status: EraseDispatch,
    pub message: String,
}

/// Response to a reset-to-defaults action request.
#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
pub struct ResetToDefaultsResponse {
    pub drives_updated: usize,
}

#[derive(Clone, Debug, Deserialize, Serialize, JsonSchema)]
struct PowerStateBody {
    powered_on: bool,
}

/// Fetch the current snapshot of a storage controller.
#[endpoint {
    method = GET,
    path = "/redfish/v1/Systems/{system_id}/Storage/{storage_id}",
}]
async fn storage_get(
    rqctx: RequestContext<Arc<StorageSim>>,
    path: TypedPath<StoragePath>,
) -> Result<HttpResponseOk<Storage>, HttpError> {
    let sim = rqctx.context();
    let key = path.into_inner().key();
    Ok(HttpResponseOk(sim.storage_get(&key).await?))
}

/// Fetch the current snapshot of a drive.
#[endpoint {
    method = GET,
    path = "/redfish/v1/Systems/{system_id}/Storage/{storage_id}/Drives/{drive_id}",
}]
async fn drive_get(
    rqctx: RequestContext<Arc<StorageSim>>,
    path: TypedPath<DrivePath>,
) -> Result<HttpResponseOk<Drive>, HttpError> {
    let sim = rqctx.context();
    let key = path.into_inner().key();
    Ok(HttpResponseOk(sim.drive_get(&key).await?))
}

/// Start a simulated secure-erase operation on a drive.
///
/// The operation completes asynchronously; poll the drive to observe its
/// progress. A request against a drive with an operation still running is
/// accepted but does not start a new one.
#[endpoint {
    method = POST,
    path = "/redfish/v1/Systems/{system_id}/Storage/{storage_id}/Drives/{drive_id}/Actions/Drive.SecureErase",
}]
async fn drive_secure_erase(
    rqctx: RequestContext<Arc<StorageSim>>,
    path: TypedPath<DrivePath>,
) -> Result<HttpResponseOk<SecureEraseAck>, HttpError> {
    let sim = rqctx.context();
    let key = path.into_inner().key();
    let status = sim.drive_secure_erase(key).await?;
    let message = match status {
        EraseDispatch::Started => "secure erase operation started",
        EraseDispatch::AlreadyRunning => {
            "secure erase operation already running; request ignored"
        }
    };
    Ok(HttpResponseOk(SecureEraseAck { status, message: message.to_string() }))
}

/// Re-install the default action list on every drive under a storage
/// controller.
#[endpoint {
    method = POST,
    path = "/redfish/v1/Systems/{system_id}/Storage/{storage_id}/Actions/Storage.ResetToDefaults",
}]
async fn storage_reset_to_defaults(
    rqctx: RequestContext<Arc<StorageSim>>,
    path: TypedPath<StoragePath>,
) -> Result<HttpResponseOk<ResetToDefaultsResponse>, HttpError> {
    let sim = rqctx.context();
    let key = path.into_inner().key();
    let drives_updated = sim.storage_reset_to_defaults(&key).await?;
    Ok(HttpResponseOk(ResetToDefaultsResponse { drives_updated }))
}

/// Set the simulated power state of a system.
#[endpoint {
    method = PUT,
    path = "/redfish/v1/Systems/{system_id}/PowerState",
}]
async fn system_power_state_put(
    rqctx: RequestContext<Arc<StorageSim>>,
    path: TypedPath<SystemPath>,
    body: TypedBody<PowerStateBody>,
) -> Result<HttpResponseUpdatedNoContent, HttpError> {
    let sim = rqctx.context();
    let system_id = path.into_inner().system_id;
    sim.set_powered_on(&system_id, body.into_inner().powered_on).await?;
    Ok(HttpResponseUpdatedNoContent())
}
