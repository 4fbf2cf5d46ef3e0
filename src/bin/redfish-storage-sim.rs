// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Executable program to run the simulated Redfish storage service

use anyhow::{anyhow, Context};
use camino::Utf8PathBuf;
use clap::Parser;
use redfish_storage_sim::config::Config;
use redfish_storage_sim::run_server;

#[derive(Debug, Parser)]
#[clap(
    name = "redfish-storage-sim",
    about = "Simulated Redfish storage service"
)]
struct Args {
    #[clap(name = "CONFIG_FILE_PATH")]
    config_file_path: Utf8PathBuf,
}

#[tokio::main]
async fn main() {
    if let Err(error) = do_run().await {
        fatal(error);
    }
}

async fn do_run() -> Result<(), anyhow::Error> {
    let args = Args::parse();
    let config = Config::from_file(&args.config_file_path)
        .context("loading configuration")?;
    run_server(&config).await.map_err(|message| anyhow!(message))
}

fn fatal(error: anyhow::Error) -> ! {
    eprintln!("redfish-storage-sim: {:#}", error);
    std::process::exit(1);
}
