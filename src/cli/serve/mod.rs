//! Asset endpoint server.
//!
//! Serves `GET|HEAD {base}{controller}/index?group=&type=&lm=` from the
//! bundler; other methods get 405. Requests run on a small thread pool.
//! Ctrl+C unblocks the accept loop, and `serve` returns once the requests
//! already accepted have been answered.

mod lifecycle;
mod path;
mod response;

pub use response::{AssetResponse, respond};

use crate::{bundler::Bundler, config::BundleConfig, debug, log};
use anyhow::{Context, Result};
use crossbeam::channel::Receiver;
use std::sync::Arc;
use tiny_http::{Request, Server};

/// Worker threads handling requests.
const WORKERS: usize = 4;

/// Bind the configured address and serve until Ctrl+C.
pub fn serve(config: &BundleConfig) -> Result<()> {
    let bundler = Bundler::from_config(config)?;
    let endpoint = config.groups.endpoint_path();

    let (server, addr) = lifecycle::bind_with_retry(config.serve.interface, config.serve.port)?;
    let server = Arc::new(server);
    let shutdown = lifecycle::install_shutdown_handler(Arc::clone(&server))?;

    log!("serve"; "http://{}{}", addr, endpoint);
    run_request_loop(&server, &bundler, &endpoint, &shutdown)
}

/// Accept requests until the server is unblocked, then wait for the
/// requests already handed to the pool.
fn run_request_loop(
    server: &Server,
    bundler: &Bundler,
    endpoint: &str,
    shutdown: &Receiver<()>,
) -> Result<()> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(WORKERS)
        .thread_name(|i| format!("vasset-serve-{i}"))
        .build()
        .context("failed to create thread pool")?;

    pool.in_place_scope(|scope| {
        for request in server.incoming_requests() {
            scope.spawn(move |_| {
                if let Err(e) = handle_request(request, bundler, endpoint, shutdown) {
                    log!("serve"; "request error: {e}");
                }
            });
        }
    });
    debug!("serve"; "all requests finished");
    Ok(())
}

fn handle_request(
    request: Request,
    bundler: &Bundler,
    endpoint: &str,
    shutdown: &Receiver<()>,
) -> Result<()> {
    if !shutdown.is_empty() {
        return response::send(request, AssetResponse::unavailable());
    }

    let reply = respond(bundler, endpoint, request.method(), request.url());
    debug!("serve"; "{} {} -> {}", request.method(), request.url(), reply.status);
    response::send(request, reply)
}
