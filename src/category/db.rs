//! Database operations for categories.

use rusqlite::{Connection, Row};

use crate::{
    Error, NameCase,
    category::{Category, CategoryId, CategoryName, CategoryStore},
};

// Code 2067 occurs when a UNIQUE constraint failed.
const SQLITE_CONSTRAINT_UNIQUE: i32 = 2067;

impl CategoryStore for Connection {
    fn get(&self, category_id: CategoryId) -> Result<Option<Category>, Error> {
        let result = self
            .prepare("SELECT id, name, parent_id FROM category WHERE id = :id;")?
            .query_row(&[(":id", &category_id)], map_row);

        match result {
            Ok(category) => Ok(Some(category)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(error) => Err(error.into()),
        }
    }

    fn get_all(&self) -> Result<Vec<Category>, Error> {
        self.prepare("SELECT id, name, parent_id FROM category ORDER BY id ASC;")?
            .query_map([], map_row)?
            .map(|maybe_category| maybe_category.map_err(|error| error.into()))
            .collect()
    }

    fn get_roots(&self) -> Result<Vec<Category>, Error> {
        self.prepare(
            "SELECT id, name, parent_id FROM category WHERE parent_id IS NULL ORDER BY id ASC;",
        )?
        .query_map([], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
    }

    fn get_children(&self, category_id: CategoryId) -> Result<Vec<Category>, Error> {
        self.prepare(
            "SELECT id, name, parent_id FROM category WHERE parent_id = :parent_id ORDER BY id ASC;",
        )?
        .query_map(&[(":parent_id", &category_id)], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
    }

    fn count(&self) -> Result<usize, Error> {
        let count: i64 = self.query_row("SELECT COUNT(1) FROM category;", [], |row| row.get(0))?;

        usize::try_from(count)
            .map_err(|_| Error::StorageFailure(rusqlite::Error::IntegralValueOutOfRange(0, count)))
    }

    fn insert(
        &self,
        name: CategoryName,
        parent_id: Option<CategoryId>,
    ) -> Result<Category, Error> {
        self.execute(
            "INSERT INTO category (name, parent_id) VALUES (?1, ?2);",
            (name.as_ref(), parent_id),
        )
        .map_err(|error| map_duplicate_name(error, &name))?;

        let id = self.last_insert_rowid();

        Ok(Category {
            id,
            name,
            parent_id,
        })
    }

    fn update_fields(
        &self,
        category_id: CategoryId,
        name: CategoryName,
        parent_id: Option<CategoryId>,
    ) -> Result<Category, Error> {
        let rows_affected = self
            .execute(
                "UPDATE category SET name = ?1, parent_id = ?2 WHERE id = ?3",
                (name.as_ref(), parent_id, category_id),
            )
            .map_err(|error| map_duplicate_name(error, &name))?;

        if rows_affected == 0 {
            return Err(Error::CategoryNotFound(category_id));
        }

        Ok(Category {
            id: category_id,
            name,
            parent_id,
        })
    }

    fn remove(&self, category_id: CategoryId) -> Result<bool, Error> {
        let rows_affected = self.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

        Ok(rows_affected > 0)
    }

    fn atomically<T, F>(&self, operation: F) -> Result<T, Error>
    where
        F: FnOnce(&Self) -> Result<T, Error>,
    {
        // Using unchecked_transaction because the store is shared as &Connection.
        // Dropping the transaction without committing rolls it back.
        let transaction = self.unchecked_transaction()?;
        let value = operation(&transaction)?;
        transaction.commit()?;

        Ok(value)
    }
}

/// Initialize the category table and indexes.
///
/// `name_case` decides whether two names that differ only in ASCII case
/// count as duplicates.
pub fn create_category_table(
    connection: &Connection,
    name_case: NameCase,
) -> Result<(), rusqlite::Error> {
    let collation = match name_case {
        NameCase::Sensitive => "",
        NameCase::Insensitive => " COLLATE NOCASE",
    };

    connection.execute_batch(&format!(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE{collation},
            parent_id INTEGER REFERENCES category(id),
            CHECK (parent_id IS NULL OR parent_id != id)
        );

        CREATE INDEX IF NOT EXISTS idx_category_parent_id ON category(parent_id);"
    ))?;

    Ok(())
}

fn map_duplicate_name(error: rusqlite::Error, name: &CategoryName) -> Error {
    match error {
        rusqlite::Error::SqliteFailure(sql_error, Some(ref desc))
            if sql_error.extended_code == SQLITE_CONSTRAINT_UNIQUE
                && desc.ends_with("category.name") =>
        {
            Error::DuplicateName(name.to_string())
        }
        error => error.into(),
    }
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let raw_name: String = row.get(1)?;
    let name = CategoryName::new_unchecked(&raw_name);
    let parent_id = row.get(2)?;

    Ok(Category {
        id,
        name,
        parent_id,
    })
}
