// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Tests for the storage-level reset-to-defaults action.

use dropshot::test_util::{object_get, read_json};
use http::method::Method;
use http::StatusCode;
use redfish_storage_sim::resources::{Drive, SECURE_ERASE_ACTION};
use redfish_storage_sim::ResetToDefaultsResponse;

pub mod common;
use common::{
    drive_url, power_state_url, reset_to_defaults_url, secure_erase_url,
    test_setup,
};

#[tokio::test]
async fn test_reset_to_defaults() {
    let cptestctx = test_setup("test_reset_to_defaults").await;
    let client = &cptestctx.client;

    let mut response = client
        .make_request::<()>(
            Method::POST,
            &reset_to_defaults_url(),
            None,
            StatusCode::OK,
        )
        .await
        .unwrap();
    let result = read_json::<ResetToDefaultsResponse>(&mut response).await;
    assert_eq!(result.drives_updated, 2);

    // Every drive ends up with exactly the secure-erase action, targeting
    // its own action path.
    for drive_id in ["D1", "D2"] {
        let drive = object_get::<Drive>(client, &drive_url(drive_id)).await;
        assert_eq!(drive.actions.len(), 1);
        assert_eq!(
            drive.actions[SECURE_ERASE_ACTION].target,
            secure_erase_url(drive_id)
        );
    }

    cptestctx.teardown().await;
}

#[tokio::test]
async fn test_reset_to_defaults_unknown_storage() {
    let cptestctx = test_setup("test_reset_to_defaults_unknown_storage").await;
    let client = &cptestctx.client;

    client
        .make_request_error(
            Method::POST,
            "/redfish/v1/Systems/S1/Storage/ST9\
             /Actions/Storage.ResetToDefaults",
            StatusCode::NOT_FOUND,
        )
        .await;

    cptestctx.teardown().await;
}

#[tokio::test]
async fn test_reset_to_defaults_requires_power() {
    let cptestctx = test_setup("test_reset_to_defaults_requires_power").await;
    let client = &cptestctx.client;

    client
        .make_request(
            Method::PUT,
            power_state_url(),
            Some(serde_json::json!({ "powered_on": false })),
            StatusCode::NO_CONTENT,
        )
        .await
        .unwrap();

    let error = client
        .make_request_error(
            Method::POST,
            &reset_to_defaults_url(),
            StatusCode::BAD_REQUEST,
        )
        .await;
    assert_eq!(error.error_code, Some("ResourceNotReady".to_string()));

    cptestctx.teardown().await;
}
