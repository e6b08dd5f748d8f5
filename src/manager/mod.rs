// src/manager/mod.rs
// =============================================================================
// This module runs the whole pipeline.
//
//   LineSource -> ParsedUrl::parse -> bounded queue -> N workers
//              -> UrlCheck -> ResultSink
//
// Submodules:
// - url:  which input lines count as URLs
// - pool: the dispatcher and the worker pool
// =============================================================================

mod pool;
mod url;

pub use pool::{Manager, RunSummary};
