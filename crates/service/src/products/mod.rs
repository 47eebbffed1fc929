//! Product records: the model, the repository seam and the file-backed store.

pub mod model;
pub mod repository;
pub mod store;

pub use model::{Fields, Product};
pub use repository::ProductRepository;
pub use store::ProductStore;
