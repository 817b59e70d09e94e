//! Repository Layer - Core Traits
//!
//! Abstract interfaces for data access. The SQLite implementation lives in
//! `task`; tests run it against an in-memory database.

use async_trait::async_trait;

use crate::domain::{DomainResult, Entity};

/// Core repository trait for CRUD operations
#[async_trait]
pub trait Repository<T: Entity>: Send + Sync {
    /// Creation input
    type Draft: Send + Sync;
    /// Partial update input
    type Patch: Send + Sync;
    /// List query
    type Filter: Send + Sync;

    async fn create(&self, draft: &Self::Draft) -> DomainResult<T>;

    async fn find_by_id(&self, id: T::Id) -> DomainResult<Option<T>>;

    async fn list(&self, filter: &Self::Filter) -> DomainResult<Vec<T>>;

    async fn update(&self, id: T::Id, patch: &Self::Patch) -> DomainResult<T>;

    async fn delete(&self, id: T::Id) -> DomainResult<()>;
}
