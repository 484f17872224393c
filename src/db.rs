//! Database initialization.

use clap::ValueEnum;
use rusqlite::{Connection, Transaction as SqlTransaction};

use crate::{category::create_category_table, product::create_product_category_table};

/// How category names are compared when checking that they are unique.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum NameCase {
    /// "Phones" and "phones" are different names.
    #[default]
    Sensitive,
    /// "Phones" and "phones" are the same name (ASCII case folding).
    Insensitive,
}

/// Create the tables for the domain models and turn on foreign key checks.
///
/// `name_case` only takes effect when the category table is first created.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection, name_case: NameCase) -> Result<(), rusqlite::Error> {
    // Foreign keys are a per-connection setting and cannot be changed inside a transaction.
    connection.pragma_update(None, "foreign_keys", "ON")?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_category_table(&transaction, name_case)?;
    create_product_category_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}
