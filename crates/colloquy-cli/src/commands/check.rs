//! Backend reachability probe.

use std::sync::Arc;

use anyhow::Result;
use colored::Colorize;

use colloquy_interaction::ChatBackend;

pub async fn run(backend: Arc<dyn ChatBackend>) -> Result<()> {
    if backend.check_connection().await {
        println!("{}", "backend connection OK".green());
        Ok(())
    } else {
        println!("{}", "backend unreachable".red());
        // Non-zero exit so scripts can gate on the probe
        std::process::exit(1);
    }
}
