//! Type description cache
//!
//! Descriptions are built lazily on first use and never evicted. The registry
//! is shared behind an `Arc` by every mapper that should see the same cache.

use crate::description::TypeDescription;
use crate::errors::ShapeError;
use crate::shape::Shape;
use std::any::TypeId;
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default)]
pub struct TypeRegistry {
    descriptions: RwLock<HashMap<TypeId, Arc<TypeDescription>>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Description of `T`, building and caching it on first use.
    ///
    /// Concurrent first callers may each build a description; the first one
    /// inserted wins and every caller receives it.
    pub fn describe<T: Shape>(&self) -> Result<Arc<TypeDescription>, ShapeError> {
        let type_id = TypeId::of::<T>();

        if let Some(description) = self.read().get(&type_id) {
            return Ok(Arc::clone(description));
        }

        let built = Arc::new(T::describe()?);

        let mut descriptions = self.write();
        let description = descriptions.entry(type_id).or_insert_with(|| {
            tracing::trace!(
                "Cached description of {} (table {}, {} members)",
                built.shape_name(),
                built.table(),
                built.properties().len()
            );
            built
        });
        Ok(Arc::clone(description))
    }

    /// Description of the runtime type of `instance`
    pub fn describe_of<T: Shape>(&self, _instance: &T) -> Result<Arc<TypeDescription>, ShapeError> {
        self.describe::<T>()
    }

    pub fn contains<T: Shape>(&self) -> bool {
        self.read().contains_key(&TypeId::of::<T>())
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    // A panic while holding the lock cannot leave a half-inserted entry behind
    fn read(&self) -> RwLockReadGuard<'_, HashMap<TypeId, Arc<TypeDescription>>> {
        self.descriptions
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<TypeId, Arc<TypeDescription>>> {
        self.descriptions
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}
