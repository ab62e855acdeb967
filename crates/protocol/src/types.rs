//! JSON request and response bodies for every route the daemon serves.
//!
//! Field names mirror the wire contract of the original daemon this
//! protocol descends from: `status`, `has_index`, `hits`/`ranks`/
//! `truncated`, and so on. Fields with no literal ancestor (`dir_count`)
//! are additive — present alongside the required ones, never replacing
//! them.

use serde::{Deserialize, Serialize};

/// `{"status":"OK"}`, returned by every route whose only job is to report
/// that a mutation happened: `/exit`, `/sync`, `/begin_reindex`,
/// `/ignores/add`, `/ignores/remove`, and the trailing half of
/// `/dirs/add`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StatusOk {
    pub status: String,
}

impl StatusOk {
    pub fn ok() -> Self {
        Self { status: "OK".to_string() }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum IndexActivity {
    #[serde(rename = "idle")]
    Idle,
    #[serde(rename = "indexing")]
    Indexing,
    #[serde(rename = "searching")]
    Searching,
}

/// Response body for `GET /status`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IndexStatusResponse {
    pub status: IndexActivity,
    pub has_index: bool,
    pub is_up_to_date: bool,
    pub dir_count: usize,
    pub ready_dir_count: usize,
    pub total_entries: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct DirState {
    pub id: String,
    pub path: String,
    pub ready: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchRequest {
    pub query: String,
    pub max_hits: Option<usize>,
}

/// Response body for `POST /search`: `hits` (lowercased basenames) and
/// `ranks` are parallel arrays, one entry per matched basename.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SearchResponse {
    pub hits: Vec<String>,
    pub ranks: Vec<u32>,
    pub truncated: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddDirRequest {
    pub path: String,
}

/// Response body for `POST /dirs/add`: `{"id": str, "status":"OK"}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AddDirResponse {
    pub id: String,
    pub status: String,
}

impl AddDirResponse {
    pub fn new(id: u64) -> Self {
        Self { id: id.to_string(), status: "OK".to_string() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct IgnorePattern {
    pub pattern: String,
}

/// The taxonomy an error body's `class` falls into, so a client can tell
/// "your request was bad" from "the daemon is unwell" without matching on
/// `exception` prose.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ErrorKind {
    NotFound,
    Silent,
    Integrity,
    Internal,
}

/// 500-body shape: `{"exception": str, "class": str, "args": [...]}`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExceptionBody {
    pub exception: String,
    pub class: ErrorKind,
    pub args: Vec<String>,
}
