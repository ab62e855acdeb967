use std::path::PathBuf;

use snapfind_protocol::codec::{self, HttpRequest};

use super::*;
use crate::config::DaemonConfig;

fn test_state() -> DaemonState {
    let config = DaemonConfig {
        host: "localhost".to_string(),
        port: 0,
        settings_path: PathBuf::from("/nonexistent"),
        test_mode: true,
        verbose: 0,
        trace: false,
    };
    DaemonState::new(config).unwrap()
}

fn get(path: &str) -> HttpRequest {
    codec::empty_request("GET", path)
}

fn post(path: &str) -> HttpRequest {
    codec::empty_request("POST", path)
}

fn status_of(result: RouteResult) -> u16 {
    match result {
        RouteResult::Respond(resp) | RouteResult::RespondThenExit(resp) => resp.status,
    }
}

#[test]
fn ping_replies_pong() {
    let mut state = test_state();
    let result = dispatch(&mut state, &get("/ping")).unwrap();
    let RouteResult::Respond(resp) = result else { panic!("expected Respond") };
    let body: String = codec::parse_json_body(&resp).unwrap();
    assert_eq!(body, "pong");
}

#[test]
fn exit_asks_the_control_loop_to_stop() {
    let mut state = test_state();
    let result = dispatch(&mut state, &get("/exit")).unwrap();
    assert!(matches!(result, RouteResult::RespondThenExit(_)));
}

#[test]
fn unknown_route_is_404() {
    let mut state = test_state();
    let err = dispatch(&mut state, &get("/nope")).unwrap_err();
    assert_eq!(err.status(), 404);
}

#[test]
fn known_path_with_wrong_verb_is_405() {
    let mut state = test_state();
    let err = dispatch(&mut state, &post("/ping")).unwrap_err();
    assert_eq!(err.status(), 405);
}

#[test]
fn add_list_get_and_delete_a_directory() {
    let mut state = test_state();

    let mut add_req = post("/dirs/add");
    add_req.body = serde_json::to_vec(&AddDirRequest { path: "/tmp".to_string() }).unwrap();
    let resp = dispatch(&mut state, &add_req).unwrap();
    let RouteResult::Respond(resp) = resp else { panic!("expected Respond") };
    let added: AddDirResponse = codec::parse_json_body(&resp).unwrap();

    let list_resp = dispatch(&mut state, &get("/dirs")).unwrap();
    let RouteResult::Respond(list_resp) = list_resp else { panic!("expected Respond") };
    let dirs: Vec<DirState> = codec::parse_json_body(&list_resp).unwrap();
    assert_eq!(dirs.len(), 1);
    assert_eq!(dirs[0].id, added.id);

    let get_resp = dispatch(&mut state, &get(&format!("/dirs/{}", added.id))).unwrap();
    let RouteResult::Respond(get_resp) = get_resp else { panic!("expected Respond") };
    let dir: DirState = codec::parse_json_body(&get_resp).unwrap();
    assert_eq!(dir.path, "/tmp");

    let delete_req = HttpRequest {
        method: "DELETE".to_string(),
        path: format!("/dirs/{}", added.id),
        headers: Vec::new(),
        body: Vec::new(),
    };
    let delete_status = status_of(dispatch(&mut state, &delete_req).unwrap());
    assert_eq!(delete_status, 200);

    let missing_get = dispatch(&mut state, &get(&format!("/dirs/{}", added.id))).unwrap_err();
    assert_eq!(missing_get.status(), 404);
}

#[test]
fn deleting_an_unknown_dir_id_is_404() {
    let mut state = test_state();
    let delete_req = HttpRequest { method: "DELETE".to_string(), path: "/dirs/999".to_string(), headers: Vec::new(), body: Vec::new() };
    let err = dispatch(&mut state, &delete_req).unwrap_err();
    assert_eq!(err.status(), 404);
}

#[test]
fn ignores_add_and_remove_round_trip() {
    let mut state = test_state();

    let mut add_req = post("/ignores/add");
    add_req.body = serde_json::to_vec(&IgnorePattern { pattern: "*.log".to_string() }).unwrap();
    assert_eq!(status_of(dispatch(&mut state, &add_req).unwrap()), 200);

    let listed = dispatch(&mut state, &get("/ignores")).unwrap();
    let RouteResult::Respond(listed) = listed else { panic!("expected Respond") };
    let patterns: Vec<String> = codec::parse_json_body(&listed).unwrap();
    assert_eq!(patterns, vec!["*.log".to_string()]);

    let mut remove_req = post("/ignores/remove");
    remove_req.body = serde_json::to_vec(&IgnorePattern { pattern: "*.log".to_string() }).unwrap();
    assert_eq!(status_of(dispatch(&mut state, &remove_req).unwrap()), 200);
}

#[test]
fn unignoring_a_pattern_that_was_never_added_is_a_silent_500() {
    let mut state = test_state();
    let mut remove_req = post("/ignores/remove");
    remove_req.body = serde_json::to_vec(&IgnorePattern { pattern: "*.log".to_string() }).unwrap();
    let err = dispatch(&mut state, &remove_req).unwrap_err();
    assert_eq!(err.status(), 500);
    assert!(!err.should_log_trace());
}

#[test]
fn search_with_no_directories_returns_empty_untruncated_hits() {
    let mut state = test_state();
    let mut search_req = post("/search");
    search_req.body = serde_json::to_vec(&SearchRequest { query: "main".to_string(), max_hits: None }).unwrap();
    let resp = dispatch(&mut state, &search_req).unwrap();
    let RouteResult::Respond(resp) = resp else { panic!("expected Respond") };
    let body: SearchResponse = codec::parse_json_body(&resp).unwrap();
    assert!(body.hits.is_empty());
    assert!(!body.truncated);
}

#[test]
fn search_rejects_a_query_past_the_byte_limit() {
    let mut state = test_state();
    let huge = "a".repeat(state.query_byte_limit() + 1);
    let mut search_req = post("/search");
    search_req.body = serde_json::to_vec(&SearchRequest { query: huge, max_hits: None }).unwrap();
    let err = dispatch(&mut state, &search_req).unwrap_err();
    assert_eq!(err.status(), 500);
}

#[test]
fn status_reports_has_index_only_once_a_directory_is_registered() {
    let mut state = test_state();
    let before = dispatch(&mut state, &get("/status")).unwrap();
    let RouteResult::Respond(before) = before else { panic!("expected Respond") };
    let before: IndexStatusResponse = codec::parse_json_body(&before).unwrap();
    assert!(!before.has_index);
    assert_eq!(before.status, IndexActivity::Idle);

    let mut add_req = post("/dirs/add");
    add_req.body = serde_json::to_vec(&AddDirRequest { path: "/tmp".to_string() }).unwrap();
    dispatch(&mut state, &add_req).unwrap();

    let after = dispatch(&mut state, &get("/status")).unwrap();
    let RouteResult::Respond(after) = after else { panic!("expected Respond") };
    let after: IndexStatusResponse = codec::parse_json_body(&after).unwrap();
    assert!(after.has_index);
    assert!(!after.is_up_to_date);
    assert_eq!(after.status, IndexActivity::Indexing);
}

#[test]
fn begin_reindex_and_sync_are_ok_with_no_directories() {
    let mut state = test_state();
    assert_eq!(status_of(dispatch(&mut state, &post("/begin_reindex")).unwrap()), 200);
    assert_eq!(status_of(dispatch(&mut state, &post("/sync")).unwrap()), 200);
}
