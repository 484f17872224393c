//! Decides whether a proposed parent assignment keeps the hierarchy a forest.
//!
//! All functions here only read from the store.
//!
//! Parent chains are walked upwards one `get` at a time. Every walk is capped
//! at the number of categories in the store: a chain that is still going
//! after that many hops must loop, which can only happen if the table was
//! edited outside of this crate. Such chains, and chains that point at a
//! category that does not exist, are reported as [Error::CorruptHierarchy].

use crate::{
    Error,
    category::{Category, CategoryId, CategoryStore},
};

/// Check that `proposed_parent_id` is a legal parent for the category with
/// `category_id`.
///
/// `category_id` is `None` for a category that has not been created yet,
/// which cannot be part of a cycle. Assigning no parent is always legal.
///
/// # Errors
///
/// - [Error::SelfParent] if the category would be its own parent.
/// - [Error::ParentNotFound] if the proposed parent does not exist.
/// - [Error::CyclicHierarchy] if the category is an ancestor of the proposed
///   parent.
/// - [Error::CorruptHierarchy] if the proposed parent's ancestor chain is
///   broken.
pub fn check_parent_assignment<S: CategoryStore>(
    store: &S,
    category_id: Option<CategoryId>,
    proposed_parent_id: Option<CategoryId>,
) -> Result<(), Error> {
    let Some(parent_id) = proposed_parent_id else {
        return Ok(());
    };

    if category_id == Some(parent_id) {
        return Err(Error::SelfParent);
    }

    let parent = store.get(parent_id)?.ok_or(Error::ParentNotFound(parent_id))?;

    let Some(category_id) = category_id else {
        return Ok(());
    };

    if is_in_chain(store, category_id, &parent)? {
        tracing::debug!(
            "Rejected moving category {category_id} under its descendant {parent_id}"
        );
        return Err(Error::CyclicHierarchy);
    }

    Ok(())
}

/// Check only that `proposed_parent_id`, if set, refers to an existing
/// category.
///
/// # Errors
///
/// Returns [Error::ParentNotFound] if the proposed parent does not exist.
pub fn check_parent_exists<S: CategoryStore>(
    store: &S,
    proposed_parent_id: Option<CategoryId>,
) -> Result<(), Error> {
    check_parent_assignment(store, None, proposed_parent_id)
}

/// Get the ancestors of a category, from its immediate parent up to its root.
///
/// Returns an empty vec for a root category.
///
/// # Errors
///
/// Returns [Error::CategoryNotFound] if the category does not exist or
/// [Error::CorruptHierarchy] if its ancestor chain is broken.
pub fn ancestors<S: CategoryStore>(
    store: &S,
    category_id: CategoryId,
) -> Result<Vec<Category>, Error> {
    let category = store
        .get(category_id)?
        .ok_or(Error::CategoryNotFound(category_id))?;
    let max_hops = store.count()?;

    let mut ancestors = Vec::new();
    let mut current = category;

    while let Some(parent_id) = current.parent_id {
        if ancestors.len() >= max_hops {
            return Err(Error::CorruptHierarchy(category_id));
        }

        let parent = store
            .get(parent_id)?
            .ok_or(Error::CorruptHierarchy(current.id))?;

        ancestors.push(parent.clone());
        current = parent;
    }

    Ok(ancestors)
}

/// Whether `needle_id` is `start` or one of the ancestors of `start`.
fn is_in_chain<S: CategoryStore>(
    store: &S,
    needle_id: CategoryId,
    start: &Category,
) -> Result<bool, Error> {
    let max_hops = store.count()?;
    let mut current = start.clone();

    for _ in 0..=max_hops {
        if current.id == needle_id {
            return Ok(true);
        }

        let Some(parent_id) = current.parent_id else {
            return Ok(false);
        };

        current = store
            .get(parent_id)?
            .ok_or(Error::CorruptHierarchy(current.id))?;
    }

    Err(Error::CorruptHierarchy(start.id))
}

#[cfg(test)]
mod check_parent_assignment_tests {
    use rusqlite::Connection;

    use crate::{
        Error, NameCase,
        category::{
            Category, CategoryName, CategoryStore, ancestors, check_parent_assignment,
            check_parent_exists,
        },
        db::initialize,
    };

    fn get_test_db_connection() -> Connection {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection, NameCase::Sensitive).expect("Could not initialize database");
        connection
    }

    fn insert(connection: &Connection, name: &str, parent: Option<&Category>) -> Category {
        connection
            .insert(
                CategoryName::new_unchecked(name),
                parent.map(|parent| parent.id),
            )
            .expect("Could not create test category")
    }

    /// Creates the chain A <- B <- C.
    fn chain(connection: &Connection) -> (Category, Category, Category) {
        let a = insert(connection, "A", None);
        let b = insert(connection, "B", Some(&a));
        let c = insert(connection, "C", Some(&b));

        (a, b, c)
    }

    #[test]
    fn root_assignment_is_always_legal() {
        let connection = get_test_db_connection();
        let (a, _, c) = chain(&connection);

        assert_eq!(check_parent_assignment(&connection, Some(a.id), None), Ok(()));
        assert_eq!(check_parent_assignment(&connection, Some(c.id), None), Ok(()));
        assert_eq!(check_parent_assignment(&connection, None, None), Ok(()));
    }

    #[test]
    fn rejects_self_parent() {
        let connection = get_test_db_connection();
        let a = insert(&connection, "A", None);

        let result = check_parent_assignment(&connection, Some(a.id), Some(a.id));

        assert_eq!(result, Err(Error::SelfParent));
    }

    #[test]
    fn rejects_missing_parent() {
        let connection = get_test_db_connection();
        let a = insert(&connection, "A", None);

        let result = check_parent_assignment(&connection, Some(a.id), Some(9999));

        assert_eq!(result, Err(Error::ParentNotFound(9999)));
    }

    #[test]
    fn rejects_descendant_as_parent() {
        let connection = get_test_db_connection();
        let (a, b, c) = chain(&connection);

        assert_eq!(
            check_parent_assignment(&connection, Some(a.id), Some(c.id)),
            Err(Error::CyclicHierarchy)
        );
        assert_eq!(
            check_parent_assignment(&connection, Some(a.id), Some(b.id)),
            Err(Error::CyclicHierarchy)
        );
        assert_eq!(
            check_parent_assignment(&connection, Some(b.id), Some(c.id)),
            Err(Error::CyclicHierarchy)
        );
    }

    #[test]
    fn accepts_ancestor_or_unrelated_parent() {
        let connection = get_test_db_connection();
        let (a, _, c) = chain(&connection);
        let other = insert(&connection, "Other", None);

        assert_eq!(check_parent_assignment(&connection, Some(c.id), Some(a.id)), Ok(()));
        assert_eq!(
            check_parent_assignment(&connection, Some(a.id), Some(other.id)),
            Ok(())
        );
    }

    #[test]
    fn new_category_only_needs_existing_parent() {
        let connection = get_test_db_connection();
        let (_, _, c) = chain(&connection);

        assert_eq!(check_parent_exists(&connection, Some(c.id)), Ok(()));
        assert_eq!(
            check_parent_exists(&connection, Some(c.id + 1)),
            Err(Error::ParentNotFound(c.id + 1))
        );
    }

    #[test]
    fn detects_existing_loop_instead_of_spinning() {
        let connection = get_test_db_connection();
        let x = insert(&connection, "X", None);
        let y = insert(&connection, "Y", Some(&x));
        let outsider = insert(&connection, "Outsider", None);
        // Corrupt the table behind the engine's back: X <-> Y.
        connection
            .execute("UPDATE category SET parent_id = ?1 WHERE id = ?2", (y.id, x.id))
            .unwrap();

        let result = check_parent_assignment(&connection, Some(outsider.id), Some(y.id));

        assert!(matches!(result, Err(Error::CorruptHierarchy(_))));
    }

    #[test]
    fn ancestors_walks_up_to_the_root() {
        let connection = get_test_db_connection();
        let (a, b, c) = chain(&connection);

        assert_eq!(ancestors(&connection, c.id), Ok(vec![b, a.clone()]));
        assert_eq!(ancestors(&connection, a.id), Ok(vec![]));
        assert_eq!(
            ancestors(&connection, 9999),
            Err(Error::CategoryNotFound(9999))
        );
    }

    #[test]
    fn ancestors_reports_dangling_parent() {
        let connection = get_test_db_connection();
        connection
            .pragma_update(None, "foreign_keys", "OFF")
            .unwrap();
        let orphan = connection
            .insert(CategoryName::new_unchecked("Orphan"), Some(4242))
            .unwrap();

        assert_eq!(
            ancestors(&connection, orphan.id),
            Err(Error::CorruptHierarchy(orphan.id))
        );
    }
}
