//! Development server.
//!
//! A `tiny_http` accept loop on the calling thread hands every request to a
//! small `rayon` pool. Handlers implement [`Responder`] and are shared
//! read-only between workers.

mod lifecycle;
mod path;
mod preview;
mod response;
mod router;

#[cfg(test)]
mod tests;

pub use preview::Preview;
pub use response::Reply;
pub use router::{Dispatch, Document, Router};

use std::any::Any;
use std::error::Error as StdError;
use std::io;
use std::net::SocketAddr;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use thiserror::Error;
use tiny_http::{Request, Server};

use crate::logger::{debug, log};

/// Port used when none is given.
pub const DEFAULT_PORT: u16 = 3000;

/// Worker threads handling requests.
const WORKER_THREADS: usize = 4;

/// Fatal dev server errors. Unmatched requests are 404s, never errors.
#[derive(Debug, Error)]
pub enum ServeError {
    #[error("could not listen on {addr}")]
    Bind {
        addr: String,
        #[source]
        source: Box<dyn StdError + Send + Sync + 'static>,
    },

    #[error("could not start request workers")]
    Workers(#[from] rayon::ThreadPoolBuildError),
}

/// Turns a request target into a reply.
pub trait Responder: Send + Sync + 'static {
    fn respond(&self, url: &str) -> Reply;
}

/// Bound server ready to accept requests
pub struct BoundServer<R> {
    server: Arc<Server>,
    addr: SocketAddr,
    responder: Arc<R>,
}

/// Stops a running [`BoundServer`] from another thread.
#[derive(Clone)]
pub struct ShutdownHandle(Arc<Server>);

impl ShutdownHandle {
    pub fn shutdown(&self) {
        self.0.unblock();
    }
}

/// Bind `addr` (e.g. `localhost:3000`) without starting the request loop.
pub fn bind<R: Responder>(addr: &str, responder: R) -> Result<BoundServer<R>, ServeError> {
    let bind_error = |source: Box<dyn StdError + Send + Sync>| ServeError::Bind {
        addr: addr.to_string(),
        source,
    };

    let server = Server::http(addr).map_err(bind_error)?;
    let local = server
        .server_addr()
        .to_ip()
        .ok_or_else(|| bind_error("not an IP listener".into()))?;

    Ok(BoundServer {
        server: Arc::new(server),
        addr: local,
        responder: Arc::new(responder),
    })
}

impl<R: Responder> BoundServer<R> {
    /// Get the bound address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle(Arc::clone(&self.server))
    }

    /// Serve until shut down, with Ctrl+C wired to a graceful stop.
    pub fn run(self) -> Result<(), ServeError> {
        lifecycle::register(&self.server);
        let result = self.run_request_loop();
        lifecycle::unregister();
        result
    }

    /// Serve until shut down through a [`ShutdownHandle`].
    pub fn run_request_loop(self) -> Result<(), ServeError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(WORKER_THREADS)
            .build()?;

        for request in self.server.incoming_requests() {
            let responder = Arc::clone(&self.responder);
            pool.spawn(move || handle_request(request, responder.as_ref()));
        }
        Ok(())
    }
}

fn handle_request<R: Responder>(request: Request, responder: &R) {
    let reply = respond_guarded(responder, request.url());
    debug!("request"; "{} {} {}", request.method(), request.url(), reply.status);

    if let Err(err) = response::send(request, reply) {
        log!("serve"; "request error: {}", err);
    }
}

/// Respond, turning a panic inside the responder into a 500 for this request.
///
/// A panic escaping a pool job would abort the whole process.
fn respond_guarded<R: Responder>(responder: &R, url: &str) -> Reply {
    panic::catch_unwind(AssertUnwindSafe(|| responder.respond(url))).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        log!("error"; "request {} panicked: {}", url, message);
        Reply::server_error(url, &io::Error::other(message))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic".to_string()
    }
}
