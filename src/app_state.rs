//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, NameCase, db::initialize};

/// The state of the REST server.
///
/// Every handler locks the one database connection for the whole of its
/// work, so writes to the category hierarchy never interleave.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection
    pub db_connection: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the tables for
    /// the domain models. `name_case` decides how category names are compared
    /// when a new database is created.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, name_case: NameCase) -> Result<Self, Error> {
        initialize(&db_connection, name_case)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
        })
    }
}
