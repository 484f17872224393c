//! The storage contract the hierarchy engine is written against.

use crate::{
    Error,
    category::{Category, CategoryId, CategoryName},
};

/// Persistent keyed storage of categories and their parent links.
///
/// The store owns the category records. The validator, mutator and
/// materializer only ever hold the copies returned by these methods.
///
/// Sequences are returned in insertion order.
pub trait CategoryStore {
    /// Get a category by its ID, or `None` if there is no such category.
    fn get(&self, category_id: CategoryId) -> Result<Option<Category>, Error>;

    /// Get every category.
    fn get_all(&self) -> Result<Vec<Category>, Error>;

    /// Get the categories that have no parent.
    fn get_roots(&self) -> Result<Vec<Category>, Error>;

    /// Get the categories whose parent is `category_id`.
    fn get_children(&self, category_id: CategoryId) -> Result<Vec<Category>, Error>;

    /// The total number of categories.
    fn count(&self) -> Result<usize, Error>;

    /// Add a category and return it with its newly assigned ID.
    ///
    /// # Errors
    ///
    /// Returns [Error::DuplicateName] if another category already uses `name`.
    fn insert(&self, name: CategoryName, parent_id: Option<CategoryId>)
    -> Result<Category, Error>;

    /// Overwrite the name and parent of an existing category.
    ///
    /// # Errors
    ///
    /// Returns [Error::CategoryNotFound] if the category does not exist or
    /// [Error::DuplicateName] if another category already uses `name`.
    fn update_fields(
        &self,
        category_id: CategoryId,
        name: CategoryName,
        parent_id: Option<CategoryId>,
    ) -> Result<Category, Error>;

    /// Remove a category. Returns `false` if there was nothing to remove.
    fn remove(&self, category_id: CategoryId) -> Result<bool, Error>;

    /// Run `operation` as a single atomic unit.
    ///
    /// Either every write made through the store passed to `operation` is
    /// kept, or, if `operation` returns an error, none of them are.
    fn atomically<T, F>(&self, operation: F) -> Result<T, Error>
    where
        F: FnOnce(&Self) -> Result<T, Error>;
}
