//! Create, update and delete categories without ever breaking the hierarchy.
//!
//! Each operation validates and writes inside one [CategoryStore::atomically]
//! call, so a rejected or failed operation leaves the store untouched and no
//! other writer can slip a conflicting parent link in between the check and
//! the write.

use crate::{
    Error,
    category::{
        Category, CategoryId, CategoryName, CategoryStore, check_parent_assignment,
        check_parent_exists,
    },
};

/// Create a category under `parent_id`, or as a root if `parent_id` is `None`.
///
/// # Errors
///
/// - [Error::ParentNotFound] if `parent_id` does not refer to a category.
/// - [Error::DuplicateName] if another category already uses `name`.
/// - [Error::StorageFailure] if the store fails.
pub fn create_category<S: CategoryStore>(
    store: &S,
    name: CategoryName,
    parent_id: Option<CategoryId>,
) -> Result<Category, Error> {
    store.atomically(|store| {
        check_parent_exists(store, parent_id)?;
        store.insert(name, parent_id)
    })
}

/// Rename a category and move it under `parent_id` in a single write.
///
/// Passing `None` for `parent_id` makes the category a root.
///
/// # Errors
///
/// - [Error::CategoryNotFound] if the category does not exist.
/// - [Error::SelfParent] if `parent_id` is the category itself.
/// - [Error::ParentNotFound] if `parent_id` does not refer to a category.
/// - [Error::CyclicHierarchy] if `parent_id` is a descendant of the category.
/// - [Error::DuplicateName] if another category already uses `name`.
/// - [Error::StorageFailure] if the store fails.
pub fn update_category<S: CategoryStore>(
    store: &S,
    category_id: CategoryId,
    name: CategoryName,
    parent_id: Option<CategoryId>,
) -> Result<Category, Error> {
    store.atomically(|store| {
        store
            .get(category_id)?
            .ok_or(Error::CategoryNotFound(category_id))?;

        check_parent_assignment(store, Some(category_id), parent_id)?;

        store.update_fields(category_id, name, parent_id)
    })
}

/// Delete a category, moving its children up to the deleted category's parent.
///
/// Children of a root category become roots themselves. The children are
/// reparented before the category is removed, all in one atomic unit.
///
/// Product links to the deleted category are dropped by the store.
///
/// # Errors
///
/// - [Error::CategoryNotFound] if the category does not exist.
/// - [Error::StorageFailure] if the store fails.
pub fn delete_category<S: CategoryStore>(store: &S, category_id: CategoryId) -> Result<(), Error> {
    store.atomically(|store| {
        let category = store
            .get(category_id)?
            .ok_or(Error::CategoryNotFound(category_id))?;

        let children = store.get_children(category_id)?;
        let child_count = children.len();

        for child in children {
            store.update_fields(child.id, child.name, category.parent_id)?;
        }

        if !store.remove(category_id)? {
            return Err(Error::CategoryNotFound(category_id));
        }

        tracing::debug!(
            "Deleted category {category_id} and moved {child_count} child(ren) to {:?}",
            category.parent_id
        );

        Ok(())
    })
}
