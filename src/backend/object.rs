//! [`AssetStore`] over any `object_store` implementation
//!
//! Azure containers are built by [`super::azure`]; tests use the in-memory
//! store from `object_store::memory`.

use super::error::{BackendResult, StoreError};
use super::AssetStore;
use async_trait::async_trait;
use bytes::Bytes;
use object_store::memory::InMemory;
use object_store::{path::Path as ObjectPath, Attribute, Attributes, ObjectStore, PutOptions};
use std::sync::Arc;

/// Asset store backed by an `object_store` container
#[derive(Debug, Clone)]
pub struct ObjectStoreBackend {
    store: Arc<dyn ObjectStore>,
    name: String,
}

impl ObjectStoreBackend {
    pub fn new(store: Arc<dyn ObjectStore>, name: impl Into<String>) -> Self {
        Self {
            store,
            name: name.into(),
        }
    }

    /// Process-local container, empty on creation
    pub fn in_memory() -> Self {
        Self::new(Arc::new(InMemory::new()), "memory")
    }

    /// The underlying object store
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }
}

/// Convert a blob name into an object path, rejecting empty or relative segments
fn object_path(name: &str) -> BackendResult<ObjectPath> {
    ObjectPath::parse(name.trim_start_matches('/')).map_err(|e| StoreError::InvalidName {
        name: name.to_string(),
        message: e.to_string(),
    })
}

#[async_trait]
impl AssetStore for ObjectStoreBackend {
    #[tracing::instrument(skip(self), fields(backend = %self.name))]
    async fn exists(&self, name: &str) -> BackendResult<bool> {
        let path = object_path(name)?;

        match self.store.head(&path).await {
            Ok(_) => Ok(true),
            Err(object_store::Error::NotFound { .. }) => Ok(false),
            Err(source) => Err(StoreError::Exists {
                name: name.to_string(),
                source,
            }),
        }
    }

    #[tracing::instrument(
        skip(self, content),
        fields(backend = %self.name, size = content.len())
    )]
    async fn upload(&self, name: &str, content: Bytes, content_type: &str) -> BackendResult<()> {
        let path = object_path(name)?;

        let mut attributes = Attributes::new();
        attributes.insert(Attribute::ContentType, content_type.to_string().into());
        let options = PutOptions {
            attributes,
            ..Default::default()
        };

        self.store
            .put_opts(&path, content.into(), options)
            .await
            .map_err(|source| StoreError::Upload {
                name: name.to_string(),
                source,
            })?;

        Ok(())
    }

    fn backend_name(&self) -> &str {
        &self.name
    }
}
