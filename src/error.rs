// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error handling facilities for the simulated Redfish storage service.

use crate::resources::{DriveKey, StorageKey};
use dropshot::HttpError;
use thiserror::Error;

#[derive(Clone, Debug, Error)]
pub enum Error {
    #[error("no such system \"{0}\"")]
    SystemNotFound(String),
    #[error("no such storage controller \"{0}\"")]
    StorageNotFound(StorageKey),
    #[error("no such drive \"{0}\"")]
    DriveNotFound(DriveKey),
    #[error("system \"{0}\" is powered off")]
    SystemPoweredOff(String),
}

impl From<Error> for HttpError {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        match err {
            Error::SystemNotFound(_)
            | Error::StorageNotFound(_)
            | Error::DriveNotFound(_) => HttpError::for_client_error(
                Some("ObjectNotFound".to_string()),
                http::StatusCode::NOT_FOUND,
                message,
            ),
            Error::SystemPoweredOff(_) => HttpError::for_bad_request(
                Some("ResourceNotReady".to_string()),
                message,
            ),
        }
    }
}
