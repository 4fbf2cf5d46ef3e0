// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Shared integration testing facilities

use dropshot::test_util::ClientTestContext;
use dropshot::test_util::LogContext;
use dropshot::ConfigDropshot;
use dropshot::ConfigLogging;
use dropshot::ConfigLoggingLevel;
use redfish_storage_sim::config::Config;
use redfish_storage_sim::config::ConfigDrive;
use redfish_storage_sim::config::ConfigStorage;
use redfish_storage_sim::config::ConfigSystem;
use redfish_storage_sim::Server;
use slog::o;
use std::collections::BTreeMap;

/// Simulated erase duration used by the tests: short enough to keep them
/// fast, long enough that an "immediate" follow-up read reliably lands
/// before the operation completes.
pub const ERASE_TIME_MS: u64 = 250;

/// How long the tests wait before expecting an operation to have completed.
pub const ERASE_WAIT_MS: u64 = 1000;

pub const STORAGE_URL: &str = "/redfish/v1/Systems/S1/Storage/ST1";

pub struct StorageSimTestContext {
    pub client: ClientTestContext,
    pub server: Server,
    pub logctx: LogContext,
}

impl StorageSimTestContext {
    pub async fn teardown(self) {
        self.server.http_server.close().await.unwrap();
        self.logctx.cleanup_successful();
    }
}

/// Configuration with one system `S1` holding storage controller `ST1` with
/// drives `D1` and `D2`.
pub fn test_config() -> Config {
    let drive = |id: &str| ConfigDrive {
        id: id.to_string(),
        name: None,
        extra: BTreeMap::new(),
    };
    Config {
        secure_erase_time_ms: ERASE_TIME_MS,
        systems: vec![ConfigSystem {
            id: "S1".to_string(),
            powered_on: true,
            storage: vec![ConfigStorage {
                id: "ST1".to_string(),
                name: Some("Local Storage Controller".to_string()),
                drives: vec![drive("D1"), drive("D2")],
            }],
        }],
        dropshot: ConfigDropshot {
            bind_address: "127.0.0.1:0".parse().unwrap(),
            ..Default::default()
        },
        log: ConfigLogging::StderrTerminal { level: ConfigLoggingLevel::Debug },
    }
}

pub async fn test_setup(test_name: &str) -> StorageSimTestContext {
    let config = test_config();
    let logctx = LogContext::new(test_name, &config.log);

    let server = Server::start(&config, &logctx.log)
        .await
        .expect("failed to start test server");
    let client = ClientTestContext::new(
        server.http_server.local_addr(),
        logctx.log.new(o!("component" => "client test context")),
    );
    StorageSimTestContext { client, server, logctx }
}

pub fn drive_url(drive_id: &str) -> String {
    format!("{}/Drives/{}", STORAGE_URL, drive_id)
}

pub fn secure_erase_url(drive_id: &str) -> String {
    format!("{}/Actions/Drive.SecureErase", drive_url(drive_id))
}

pub fn reset_to_defaults_url() -> String {
    format!("{}/Actions/Storage.ResetToDefaults", STORAGE_URL)
}

pub fn power_state_url() -> &'static str {
    "/redfish/v1/Systems/S1/PowerState"
}
