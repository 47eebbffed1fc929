//! Service layer for product records.
//! - `storage`: whole-document JSON persistence.
//! - `products`: the record model, the repository trait and its file-backed store.
//! - `runtime`: startup environment checks.

pub mod errors;
pub mod runtime;
pub mod storage;
pub mod products;
