//! Host command: effective variables of one host

use crate::context::Loaded;
use crate::error::{CliError, Result};

/// Run the host command
pub fn run_host(loaded: &Loaded, host: &str) -> Result<()> {
    println!("{}", render_host(loaded, host)?);
    Ok(())
}

/// Render a host's effective variables as pretty JSON.
pub fn render_host(loaded: &Loaded, host: &str) -> Result<String> {
    let vars = loaded
        .registry
        .host_vars(host)
        .ok_or_else(|| CliError::user(format!("Host '{host}' not found in inventory")))?;
    Ok(serde_json::to_string_pretty(&vars)?)
}
