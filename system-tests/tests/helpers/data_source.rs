// system-tests/tests/helpers/data_source.rs
// ============================================================================
// Module: Mock Data Source
// Description: Minimal HTTP responder backing provider assets.
// Purpose: Verify actual byte-level data retrieval occurred.
// Dependencies: axum, tokio
// ============================================================================

//! ## Overview
//! A fixed-body HTTP responder for `GET /source`. Every request is
//! recorded with its query string so scenarios can verify that a pull
//! reached the origin rather than being served from anywhere else.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::net::TcpListener as StdTcpListener;
use std::sync::Arc;
use std::sync::Mutex;

use axum::Router;
use axum::extract::RawQuery;
use axum::extract::State;
use axum::routing::get;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

// ============================================================================
// SECTION: Recorded Requests
// ============================================================================

/// One recorded origin request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceRequest {
    /// Raw query string, when present.
    pub query: Option<String>,
}

/// Shared recorder state.
#[derive(Clone)]
struct SourceState {
    /// Body returned for every request.
    body: String,
    /// Recorded requests in arrival order.
    requests: Arc<Mutex<Vec<SourceRequest>>>,
}

// ============================================================================
// SECTION: Handle
// ============================================================================

/// Handle for the mock data source.
pub struct DataSourceHandle {
    /// Base URL of the `/source` route.
    source_url: String,
    /// Graceful-shutdown trigger.
    shutdown: Option<oneshot::Sender<()>>,
    /// Serving task.
    join: Option<JoinHandle<()>>,
    /// Recorded requests.
    requests: Arc<Mutex<Vec<SourceRequest>>>,
}

impl DataSourceHandle {
    /// Returns the URL assets should use as their base address.
    pub fn source_url(&self) -> &str {
        &self.source_url
    }

    /// Returns the recorded origin requests.
    pub fn requests(&self) -> Vec<SourceRequest> {
        self.requests.lock().map_or_else(|_| Vec::new(), |entries| entries.clone())
    }

    /// Asserts that at least one origin request carried the query fragment.
    pub fn verify_query_contains(&self, fragment: &str) -> Result<(), String> {
        let requests = self.requests();
        if requests
            .iter()
            .any(|request| request.query.as_deref().is_some_and(|query| query.contains(fragment)))
        {
            Ok(())
        } else {
            Err(format!("no origin request carried `{fragment}`; saw {} requests", requests.len()))
        }
    }
}

impl Drop for DataSourceHandle {
    fn drop(&mut self) {
        if let Some(shutdown) = self.shutdown.take() {
            let _ = shutdown.send(());
        }
        if let Some(join) = self.join.take() {
            join.abort();
        }
    }
}

// ============================================================================
// SECTION: Spawn
// ============================================================================

async fn serve_source(State(state): State<SourceState>, RawQuery(query): RawQuery) -> String {
    if let Ok(mut guard) = state.requests.lock() {
        guard.push(SourceRequest {
            query,
        });
    }
    state.body.clone()
}

/// Spawns a mock data source returning a fixed body for `GET /source`.
pub fn spawn_data_source(body: &str) -> Result<DataSourceHandle, String> {
    let listener = StdTcpListener::bind("127.0.0.1:0")
        .map_err(|err| format!("data source bind failed: {err}"))?;
    listener
        .set_nonblocking(true)
        .map_err(|err| format!("data source listener nonblocking failed: {err}"))?;
    let addr =
        listener.local_addr().map_err(|err| format!("data source local addr failed: {err}"))?;
    let requests = Arc::new(Mutex::new(Vec::new()));
    let state = SourceState {
        body: body.to_string(),
        requests: Arc::clone(&requests),
    };
    let app = Router::new().route("/source", get(serve_source)).with_state(state);
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let listener = tokio::net::TcpListener::from_std(listener)
        .map_err(|err| format!("data source listener conversion failed: {err}"))?;
    let join = tokio::spawn(async move {
        let server = axum::serve(listener, app).with_graceful_shutdown(async move {
            let _ = shutdown_rx.await;
        });
        let _ = server.await;
    });
    Ok(DataSourceHandle {
        source_url: format!("http://{addr}/source"),
        shutdown: Some(shutdown_tx),
        join: Some(join),
        requests,
    })
}
