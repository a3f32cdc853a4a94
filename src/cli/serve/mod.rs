//! HTTP front end.
//!
//! ```text
//! tiny_http ──▶ rayon pool (serve.threads) ──▶ FeedService::handle
//!                                                  ▲
//! reload thread ── ConfigHandle::reload_if_changed ┘ (swaps the service)
//! ```
//!
//! Any path ending in `feed.php` is the feed endpoint; everything else is 404.

mod lifecycle;
mod response;

use crate::config::{ConfigHandle, SiteConfig};
use crate::core::{is_shutdown, register_server, register_shutdown_tx};
use crate::feed::{FeedRequest, FeedService, Params};
use crate::utils::date::now_unix;
use crate::{debug, log};
use anyhow::{Context, Result};
use arc_swap::ArcSwap;
use crossbeam::channel;
use std::sync::Arc;
use tiny_http::{Method, Request, Server};

/// Config handle plus the service built from its current snapshot.
pub struct ServeState {
    config: ConfigHandle,
    service: ArcSwap<FeedService>,
    /// Port the server actually bound (fallback for requests without `Host`).
    port: u16,
}

impl ServeState {
    fn new(config: ConfigHandle, port: u16) -> Result<Self> {
        let service = FeedService::open(config.load())?;
        Ok(Self {
            config,
            service: ArcSwap::from_pointee(service),
            port,
        })
    }

    /// Rebuild the service when the config file changed.
    ///
    /// A broken config keeps the previous service running.
    fn reload(&self) {
        match self.config.reload_if_changed() {
            Ok(false) => {}
            Ok(true) => match FeedService::open(self.config.load()) {
                Ok(service) => {
                    self.service.store(Arc::new(service));
                    log!("serve"; "config reloaded");
                }
                Err(e) => log!("error"; "reload failed: {:#}", e),
            },
            Err(e) => log!("error"; "reload failed: {:#}", e),
        }
    }
}

/// Bind, serve until Ctrl+C, then drain.
pub fn serve(config: ConfigHandle) -> Result<()> {
    let snapshot: Arc<SiteConfig> = config.load();
    let (server, addr) = lifecycle::bind_with_retry(snapshot.serve.interface, snapshot.serve.port)?;
    let server = Arc::new(server);

    let (shutdown_tx, shutdown_rx) = channel::unbounded::<()>();
    register_server(Arc::clone(&server));
    register_shutdown_tx(shutdown_tx);

    let state = Arc::new(ServeState::new(config, addr.port())?);
    log!("serve"; "http://{}{}feed.php", addr, snapshot.site.base_path());

    let reloader = snapshot
        .serve
        .reload
        .then(|| lifecycle::spawn_reloader(Arc::clone(&state), shutdown_rx));

    run_request_loop(&server, &state, snapshot.serve.threads)?;
    lifecycle::wait_for_shutdown(reloader);
    Ok(())
}

fn run_request_loop(server: &Server, state: &Arc<ServeState>, threads: usize) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(|i| format!("wikifeed-http-{i}"))
        .build()
        .context("Failed to create request thread pool")?;

    for request in server.incoming_requests() {
        let state = Arc::clone(state);
        pool.spawn(move || {
            if let Err(e) = handle_request(request, &state) {
                log!("serve"; "request error: {e}");
            }
        });
    }
    Ok(())
}

/// Handle a single HTTP request
fn handle_request(request: Request, state: &ServeState) -> Result<()> {
    if is_shutdown() {
        return response::respond_unavailable(request);
    }

    let (path, query) = split_url(request.url());
    if !path.ends_with("feed.php") {
        return response::respond_not_found(request);
    }
    let head = match request.method() {
        Method::Get => false,
        Method::Head => true,
        _ => return response::respond_method_not_allowed(request),
    };

    let service = state.service.load_full();
    let feed_request = feed_request(&request, Params::from_query(query), service.config(), state.port);
    debug!("serve"; "{} {}", request.method(), request.url());

    let response = service.handle(&feed_request, now_unix());
    response::respond_feed(request, response, head)
}

fn split_url(url: &str) -> (&str, &str) {
    url.split_once('?').unwrap_or((url, ""))
}

/// Translate HTTP request metadata into a [`FeedRequest`].
fn feed_request(request: &Request, params: Params, config: &SiteConfig, default_port: u16) -> FeedRequest {
    let header = |name: &str| {
        request
            .headers()
            .iter()
            .find(|h| h.field.as_str().as_str().eq_ignore_ascii_case(name))
            .map(|h| h.value.as_str().trim().to_string())
            .filter(|v| !v.is_empty())
    };

    let (host, port) = header("Host")
        .map(|h| split_host(&h, default_port))
        .unwrap_or_else(|| (String::new(), default_port));

    FeedRequest {
        params,
        user: config
            .serve
            .remote_user_header
            .as_deref()
            .and_then(|name| header(name)),
        host,
        port,
        if_modified_since: header("If-Modified-Since"),
        if_none_match: header("If-None-Match"),
    }
}

/// `example.com:8080` -> (`example.com`, 8080); IPv6 brackets are kept.
fn split_host(host: &str, default_port: u16) -> (String, u16) {
    if let Some((name, port)) = host.rsplit_once(':')
        && !name.is_empty()
        && !port.contains(']')
        && let Ok(port) = port.parse()
    {
        return (name.to_ascii_lowercase(), port);
    }
    (host.to_ascii_lowercase(), default_port)
}
