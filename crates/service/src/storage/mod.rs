//! Storage abstractions for service layer
//!
//! File-backed stores that persist a whole collection as one JSON document.

pub mod json_doc_store;
