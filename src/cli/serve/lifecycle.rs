//! Server lifecycle management.

use super::ServeState;
use crate::log;
use anyhow::{Result, anyhow};
use crossbeam::channel::{Receiver, RecvTimeoutError};
use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
    thread::{self, JoinHandle},
    time::Duration,
};
use tiny_http::Server;

/// Maximum number of port binding attempts.
const MAX_PORT_RETRIES: u16 = 10;

/// How often the config file is checked for edits.
const RELOAD_INTERVAL: Duration = Duration::from_secs(2);

/// Bind to the specified interface and port, with automatic port retry.
pub fn bind_with_retry(interface: IpAddr, base_port: u16) -> Result<(Server, SocketAddr)> {
    let mut last_error = None;
    for offset in 0..MAX_PORT_RETRIES {
        let port = base_port.saturating_add(offset);
        let addr = SocketAddr::new(interface, port);

        match Server::http(addr) {
            Ok(server) => {
                if offset > 0 {
                    log!("serve"; "port {} in use, using {} instead", base_port, port);
                }
                return Ok((server, addr));
            }
            Err(e) => last_error = Some(e),
        }
    }
    Err(anyhow!(
        "Failed to bind after {} attempts (ports {}-{}): {}",
        MAX_PORT_RETRIES,
        base_port,
        base_port.saturating_add(MAX_PORT_RETRIES - 1),
        last_error.map(|e| e.to_string()).unwrap_or_default()
    ))
}

/// Poll the config file until shutdown is signalled.
pub fn spawn_reloader(state: Arc<ServeState>, shutdown_rx: Receiver<()>) -> JoinHandle<()> {
    thread::spawn(move || {
        loop {
            match shutdown_rx.recv_timeout(RELOAD_INTERVAL) {
                Err(RecvTimeoutError::Timeout) => state.reload(),
                Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
            }
        }
    })
}

/// Wait for the reload thread to finish (max 2 seconds).
pub fn wait_for_shutdown(handle: Option<JoinHandle<()>>) {
    let Some(handle) = handle else { return };

    for _ in 0..40 {
        if handle.is_finished() {
            let _ = handle.join();
            return;
        }
        thread::sleep(Duration::from_millis(50));
    }
}
