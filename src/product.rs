//! Links between products and the categories they are filed under.
//!
//! Products themselves live outside this crate, only their IDs are stored.
//! A link is dropped automatically when its category is deleted.

use std::collections::HashMap;

use rusqlite::{Connection, params};

use crate::{
    Error,
    category::{CategoryId, CategoryStore},
};

/// The ID of a product.
pub type ProductId = i64;

/// Create the table linking products to categories.
///
/// # Errors
/// Returns an error if the table could not be created.
pub fn create_product_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS product_category (
            product_id INTEGER NOT NULL,
            category_id INTEGER NOT NULL REFERENCES category(id) ON DELETE CASCADE,
            PRIMARY KEY(product_id, category_id)
        )",
        (),
    )?;

    connection.execute(
        "CREATE INDEX IF NOT EXISTS idx_product_category_category_id
        ON product_category(category_id)",
        (),
    )?;

    Ok(())
}

/// Replace the categories of `product_id` with `category_ids`.
///
/// Duplicate IDs are ignored. An empty slice removes every link for the
/// product.
///
/// # Errors
/// - [Error::InvalidCategory] if an ID does not refer to a category, in which
///   case none of the links are changed.
/// - [Error::StorageFailure] if there is an unexpected SQL error.
pub fn set_product_categories(
    connection: &Connection,
    product_id: ProductId,
    category_ids: &[CategoryId],
) -> Result<(), Error> {
    connection.atomically(|connection| {
        for &category_id in category_ids {
            if connection.get(category_id)?.is_none() {
                return Err(Error::InvalidCategory(category_id));
            }
        }

        connection.execute(
            "DELETE FROM product_category WHERE product_id = ?1",
            params![product_id],
        )?;

        let mut statement = connection.prepare(
            "INSERT OR IGNORE INTO product_category (product_id, category_id) VALUES (?1, ?2)",
        )?;

        for category_id in category_ids {
            statement.execute(params![product_id, category_id])?;
        }

        Ok(())
    })
}

/// Get the IDs of the categories `product_id` is filed under, in ascending order.
///
/// # Errors
/// Returns [Error::StorageFailure] if there is an unexpected SQL error.
pub fn get_product_categories(
    connection: &Connection,
    product_id: ProductId,
) -> Result<Vec<CategoryId>, Error> {
    connection
        .prepare(
            "SELECT category_id FROM product_category
            WHERE product_id = ?1
            ORDER BY category_id ASC",
        )?
        .query_map(params![product_id], |row| row.get(0))?
        .map(|maybe_id| maybe_id.map_err(Error::from))
        .collect()
}

/// Count the products filed directly under each category.
///
/// Categories without products are absent from the map.
///
/// # Errors
/// Returns [Error::StorageFailure] if there is an unexpected SQL error.
pub fn count_products_per_category(
    connection: &Connection,
) -> Result<HashMap<CategoryId, u32>, Error> {
    let result: Result<HashMap<CategoryId, u32>, rusqlite::Error> = connection
        .prepare("SELECT category_id, COUNT(1) FROM product_category GROUP BY category_id")?
        .query_map((), |row| {
            let category_id = row.get(0)?;
            let count = row.get(1)?;

            Ok((category_id, count))
        })?
        .collect();

    result.map_err(Error::from)
}

/// Count the products filed directly under `category_id`.
///
/// # Errors
/// Returns [Error::StorageFailure] if there is an unexpected SQL error.
pub fn count_products_in_category(
    connection: &Connection,
    category_id: CategoryId,
) -> Result<u32, Error> {
    connection
        .query_row(
            "SELECT COUNT(1) FROM product_category WHERE category_id = ?1",
            params![category_id],
            |row| row.get(0),
        )
        .map_err(Error::from)
}
