use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{
    NameCase,
    category::{Category, CategoryName, create_category},
    db::initialize,
};

pub(crate) fn get_shared_test_connection() -> Arc<Mutex<Connection>> {
    let connection =
        Connection::open_in_memory().expect("Could not open in-memory SQLite database");
    initialize(&connection, NameCase::Sensitive).expect("Could not initialize database");

    Arc::new(Mutex::new(connection))
}

#[track_caller]
pub(crate) fn must_create_category(
    connection: &Arc<Mutex<Connection>>,
    name: &str,
    parent: Option<&Category>,
) -> Category {
    let connection = connection.lock().unwrap();

    create_category(
        &*connection,
        CategoryName::new_unchecked(name),
        parent.map(|parent| parent.id),
    )
    .expect("Could not create test category")
}
