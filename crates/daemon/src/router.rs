//! Maps decoded HTTP requests onto `DaemonState` operations and back onto
//! HTTP responses. One route per method+path pair; anything else is a 404
//! or 405 by way of `ApiError`.

use snapfind_engine::DirHandle;
use snapfind_protocol::codec::{self, HttpRequest, HttpResponse};
use snapfind_protocol::{
    AddDirRequest, AddDirResponse, DirState, IgnorePattern, IndexActivity, IndexStatusResponse, SearchRequest,
    SearchResponse, StatusOk,
};

use crate::error::ApiError;
use crate::state::DaemonState;

/// What the control loop should do after a request was handled.
pub enum RouteResult {
    Respond(HttpResponse),
    RespondThenExit(HttpResponse),
}

pub fn dispatch(state: &mut DaemonState, req: &HttpRequest) -> Result<RouteResult, ApiError> {
    let method = req.method.to_ascii_uppercase();
    let segments: Vec<&str> = req.path.trim_matches('/').split('/').filter(|s| !s.is_empty()).collect();

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["ping"]) => ok_json(&"pong"),
        ("GET" | "POST", ["exit"]) => Ok(RouteResult::RespondThenExit(json_ok(&StatusOk::ok())?)),
        ("GET", ["status"]) => handle_status(state),
        ("POST", ["search"]) => handle_search(state, req),
        ("POST", ["sync"]) => handle_sync(state),
        ("POST", ["begin_reindex"]) => {
            state.index.begin_reindex();
            ok_json(&StatusOk::ok())
        }
        ("POST", ["dirs", "add"]) => handle_add_dir(state, req),
        ("GET", ["dirs"]) => handle_list_dirs(state),
        ("GET", ["dirs", id]) => handle_get_dir(state, id),
        ("DELETE", ["dirs", id]) => handle_delete_dir(state, id),
        ("GET", ["ignores"]) => ok_json(&state.index.get_ignores().to_vec()),
        ("POST", ["ignores", "add"]) => handle_add_ignore(state, req),
        ("POST", ["ignores", "remove"]) => handle_remove_ignore(state, req),
        (_, ["ping" | "exit" | "status" | "search" | "sync" | "begin_reindex" | "dirs" | "ignores", ..]) => {
            Err(ApiError::MethodNotAllowed { path: req.path.clone() })
        }
        _ => Err(ApiError::NotFound { method: req.method.clone(), path: req.path.clone() }),
    }
}

fn ok_json<T: serde::Serialize>(body: &T) -> Result<RouteResult, ApiError> {
    Ok(RouteResult::Respond(json_ok(body)?))
}

fn json_ok<T: serde::Serialize>(body: &T) -> Result<HttpResponse, ApiError> {
    codec::json_response(200, "OK", body).map_err(ApiError::Internal)
}

fn dir_state(handle: DirHandle, path: &std::path::Path, ready: bool) -> DirState {
    DirState { id: handle.0.to_string(), path: path.display().to_string(), ready }
}

fn handle_status(state: &DaemonState) -> Result<RouteResult, ApiError> {
    let status = state.index.status();
    let has_index = status.dir_count > 0;
    let is_up_to_date = has_index && status.ready_dir_count == status.dir_count;
    let activity = if has_index && !is_up_to_date { IndexActivity::Indexing } else { IndexActivity::Idle };

    ok_json(&IndexStatusResponse {
        status: activity,
        has_index,
        is_up_to_date,
        dir_count: status.dir_count,
        ready_dir_count: status.ready_dir_count,
        total_entries: status.total_entries,
    })
}

fn handle_list_dirs(state: &DaemonState) -> Result<RouteResult, ApiError> {
    let dirs: Vec<DirState> = state
        .index
        .list_dirs()
        .into_iter()
        .map(|(handle, path, s)| dir_state(handle, &path, s == snapfind_engine::DirState::Ready))
        .collect();
    ok_json(&dirs)
}

fn parse_dir_id(id: &str) -> Result<u64, ApiError> {
    id.parse().map_err(|_| ApiError::NotFound { method: "GET".to_string(), path: format!("/dirs/{id}") })
}

fn handle_get_dir(state: &DaemonState, id: &str) -> Result<RouteResult, ApiError> {
    let handle = DirHandle(parse_dir_id(id)?);
    let (_, path, dir_state_kind) = state
        .index
        .list_dirs()
        .into_iter()
        .find(|(h, _, _)| *h == handle)
        .ok_or_else(|| ApiError::NotFound { method: "GET".to_string(), path: format!("/dirs/{id}") })?;
    ok_json(&dir_state(handle, &path, dir_state_kind == snapfind_engine::DirState::Ready))
}

fn handle_add_dir(state: &mut DaemonState, req: &HttpRequest) -> Result<RouteResult, ApiError> {
    let body: AddDirRequest =
        codec::parse_json_request_body(req).map_err(|e| ApiError::Silent(format!("malformed body: {e}")))?;
    if body.path.trim().is_empty() {
        return Err(ApiError::Silent("path must not be empty".to_string()));
    }
    let handle = state.index.add_dir(std::path::PathBuf::from(body.path));
    ok_json(&AddDirResponse::new(handle.0))
}

fn handle_delete_dir(state: &mut DaemonState, id: &str) -> Result<RouteResult, ApiError> {
    let handle = DirHandle(parse_dir_id(id)?);
    if !state.index.delete_dir(handle) {
        return Err(ApiError::NotFound { method: "DELETE".to_string(), path: format!("/dirs/{id}") });
    }
    ok_json(&StatusOk::ok())
}

fn handle_add_ignore(state: &mut DaemonState, req: &HttpRequest) -> Result<RouteResult, ApiError> {
    let body: IgnorePattern =
        codec::parse_json_request_body(req).map_err(|e| ApiError::Silent(format!("malformed body: {e}")))?;
    if body.pattern.trim().is_empty() {
        return Err(ApiError::Silent("pattern must not be empty".to_string()));
    }
    state.index.ignore(&body.pattern);
    ok_json(&StatusOk::ok())
}

fn handle_remove_ignore(state: &mut DaemonState, req: &HttpRequest) -> Result<RouteResult, ApiError> {
    let body: IgnorePattern =
        codec::parse_json_request_body(req).map_err(|e| ApiError::Silent(format!("malformed body: {e}")))?;
    if !state.index.unignore(&body.pattern) {
        return Err(ApiError::Silent(format!("{:?} is not an ignored pattern", body.pattern)));
    }
    ok_json(&StatusOk::ok())
}

fn handle_search(state: &DaemonState, req: &HttpRequest) -> Result<RouteResult, ApiError> {
    let body: SearchRequest =
        codec::parse_json_request_body(req).map_err(|e| ApiError::Silent(format!("malformed body: {e}")))?;
    if body.query.as_bytes().contains(&0) {
        return Err(ApiError::Silent("query must not contain a NUL byte".to_string()));
    }
    if body.query.len() > state.query_byte_limit() {
        return Err(ApiError::Silent(format!("query exceeds {} bytes", state.query_byte_limit())));
    }

    let max_hits = body.max_hits.unwrap_or_else(|| state.default_max_hits());
    let raw_hits = state.index.search(&body.query, max_hits);
    let truncated = raw_hits.len() >= max_hits;

    let mut hits = Vec::with_capacity(raw_hits.len());
    let mut ranks = Vec::with_capacity(raw_hits.len());
    for hit in raw_hits {
        hits.push(hit.basename);
        ranks.push(hit.rank);
    }

    ok_json(&SearchResponse { hits, ranks, truncated })
}

/// Drive the indexer to completion, synchronously, for callers that asked
/// explicitly to wait for it. Bounded so a pathological walk can't wedge
/// the connection forever.
const MAX_SYNC_STEPS: usize = 100_000;

fn handle_sync(state: &mut DaemonState) -> Result<RouteResult, ApiError> {
    let mut steps_taken = 0;
    while steps_taken < MAX_SYNC_STEPS {
        match state.indexer.step(&mut state.index) {
            snapfind_indexer::StepOutcome::Idle => break,
            _ => steps_taken += 1,
        }
    }
    ok_json(&StatusOk::ok())
}

#[cfg(test)]
#[path = "router_tests.rs"]
mod tests;
