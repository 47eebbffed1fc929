use std::{path::PathBuf, sync::Arc};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::errors::ServiceError;
use crate::products::model::{next_id, Fields, Product};
use crate::products::repository::ProductRepository;
use crate::storage::json_doc_store::JsonDocStore;

/// File storage: the product collection persisted as one JSON array.
///
/// Every call re-reads the document. Mutations take `write_lock` for the
/// whole read-modify-write cycle so concurrent requests in this process do
/// not lose updates; other processes writing the same file are not excluded.
pub struct ProductStore {
    doc: JsonDocStore<Product>,
    write_lock: Mutex<()>,
}

impl ProductStore {
    pub fn new<P: Into<PathBuf>>(path: P) -> Arc<Self> {
        Arc::new(Self { doc: JsonDocStore::new(path), write_lock: Mutex::new(()) })
    }

    /// All products in insertion order.
    pub async fn list(&self) -> Result<Vec<Product>, ServiceError> {
        self.doc.read_all().await
    }

    /// Linear scan for the first record with `id`.
    pub async fn get(&self, id: u64) -> Result<Option<Product>, ServiceError> {
        let items = self.doc.read_all().await?;
        Ok(items.into_iter().find(|p| p.id == id))
    }

    /// Append a new record with the next id and persist.
    pub async fn create(&self, fields: Fields) -> Result<Product, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.doc.read_all().await?;
        let id = next_id(&items)
            .ok_or_else(|| ServiceError::Storage("product ids exhausted: largest id is u64::MAX".into()))?;
        let product = Product::new(id, fields);
        items.push(product.clone());
        self.doc.write_all(&items).await?;
        info!(id = product.id, total = items.len(), "product created");
        Ok(product)
    }

    /// Shallow-merge `patch` into the record with `id` and persist.
    pub async fn update(&self, id: u64, patch: Fields) -> Result<Product, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let mut items = self.doc.read_all().await?;
        let existing = items
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| ServiceError::not_found("product"))?;
        existing.merge(patch);
        let updated = existing.clone();
        self.doc.write_all(&items).await?;
        info!(id, "product updated");
        Ok(updated)
    }

    /// Drop the record with `id`; the document is only rewritten when one was removed.
    pub async fn delete(&self, id: u64) -> Result<bool, ServiceError> {
        let _guard = self.write_lock.lock().await;
        let items = self.doc.read_all().await?;
        let before = items.len();
        let kept: Vec<Product> = items.into_iter().filter(|p| p.id != id).collect();
        if kept.len() == before {
            debug!(id, "delete of unknown product");
            return Ok(false);
        }
        self.doc.write_all(&kept).await?;
        info!(id, total = kept.len(), "product deleted");
        Ok(true)
    }
}

#[async_trait::async_trait]
impl ProductRepository for ProductStore {
    async fn list(&self) -> Result<Vec<Product>, ServiceError> { self.list().await }
    async fn get(&self, id: u64) -> Result<Option<Product>, ServiceError> { self.get(id).await }
    async fn create(&self, fields: Fields) -> Result<Product, ServiceError> { self.create(fields).await }
    async fn update(&self, id: u64, patch: Fields) -> Result<Product, ServiceError> { self.update(id, patch).await }
    async fn delete(&self, id: u64) -> Result<bool, ServiceError> { self.delete(id).await }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, Value};
    use uuid::Uuid;

    fn setup_store() -> (Arc<ProductStore>, PathBuf) {
        let tmp = std::env::temp_dir().join(format!("svc_products_{}.json", Uuid::new_v4()));
        (ProductStore::new(&tmp), tmp)
    }

    fn fields(v: Value) -> Fields {
        match v {
            Value::Object(m) => m,
            other => panic!("not an object: {other}"),
        }
    }

    #[tokio::test]
    async fn product_store_crud_persists() -> Result<(), anyhow::Error> {
        let (store, tmp) = setup_store();

        // initially empty
        assert!(store.list().await?.is_empty());

        // create assigns 1, 2
        let a = store.create(fields(json!({"name": "Widget", "price": 9.99}))).await?;
        let b = store.create(fields(json!({"name": "Gadget"}))).await?;
        assert_eq!((a.id, b.id), (1, 2));

        // get
        let found = store.get(1).await?.expect("found");
        assert_eq!(found, a);
        assert!(store.get(3).await?.is_none());

        // update merges
        let upd = store.update(1, fields(json!({"price": 12.5}))).await?;
        assert_eq!(serde_json::to_value(&upd)?, json!({"id": 1, "name": "Widget", "price": 12.5}));
        assert_eq!(serde_json::to_string(&upd)?, r#"{"name":"Widget","price":12.5,"id":1}"#);

        // delete, second delete is a miss
        assert!(store.delete(1).await?);
        assert!(!store.delete(1).await?);

        // reload from disk through a fresh store
        let reloaded = ProductStore::new(&tmp);
        let list = reloaded.list().await?;
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].id, 2);

        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn ids_follow_max_after_delete() -> Result<(), anyhow::Error> {
        let (store, tmp) = setup_store();
        for _ in 0..3 {
            store.create(Fields::new()).await?;
        }
        store.delete(2).await?;
        store.delete(3).await?;
        // max is now 1, so the next id reuses 2
        let next = store.create(Fields::new()).await?;
        assert_eq!(next.id, 2);
        let ids: Vec<u64> = store.list().await?.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2]);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn misses_leave_document_untouched() -> Result<(), anyhow::Error> {
        let (store, tmp) = setup_store();
        store.create(fields(json!({"name": "keep"}))).await?;
        let before = tokio::fs::read(&tmp).await?;

        assert!(matches!(
            store.update(42, fields(json!({"name": "x"}))).await,
            Err(ServiceError::NotFound(_))
        ));
        assert!(!store.delete(42).await?);
        assert!(store.get(42).await?.is_none());

        assert_eq!(tokio::fs::read(&tmp).await?, before);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn concurrent_creates_get_distinct_ids() -> Result<(), anyhow::Error> {
        let (store, tmp) = setup_store();
        let mut handles = Vec::new();
        for i in 0..16 {
            let store = Arc::clone(&store);
            handles.push(tokio::spawn(async move {
                let mut f = Fields::new();
                f.insert("n".into(), json!(i));
                store.create(f).await
            }));
        }
        for h in handles {
            h.await??;
        }
        let mut ids: Vec<u64> = store.list().await?.iter().map(|p| p.id).collect();
        ids.sort_unstable();
        assert_eq!(ids, (1..=16).collect::<Vec<u64>>());
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn create_fails_cleanly_when_ids_exhausted() -> Result<(), anyhow::Error> {
        let (store, tmp) = setup_store();
        tokio::fs::write(&tmp, br#"[{"id":18446744073709551615,"name":"max"}]"#).await?;
        let before = tokio::fs::read(&tmp).await?;

        assert!(matches!(store.create(Fields::new()).await, Err(ServiceError::Storage(_))));
        // existing record still readable, document untouched
        assert_eq!(store.get(u64::MAX).await?.map(|p| p.id), Some(u64::MAX));
        assert_eq!(tokio::fs::read(&tmp).await?, before);
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_document_propagates() -> Result<(), anyhow::Error> {
        let (store, tmp) = setup_store();
        tokio::fs::write(&tmp, b"not json").await?;
        assert!(matches!(store.list().await, Err(ServiceError::Corrupt(_))));
        assert!(matches!(store.create(Fields::new()).await, Err(ServiceError::Corrupt(_))));
        let _ = tokio::fs::remove_file(&tmp).await;
        Ok(())
    }
}
