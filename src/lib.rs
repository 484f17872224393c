//! Category Tree is a web app for organising products into a hierarchy of
//! categories.
//!
//! The heart of the crate is the category hierarchy engine in [category]:
//! it keeps the parent links between categories acyclic, moves children up a
//! level when their parent is deleted and materializes the flat table of
//! categories into a forest for display.
//!
//! This library also provides a REST API that directly serves HTML pages.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_server::Handle;
use tokio::signal;

mod alert;
mod app_state;
pub mod category;
mod db;
mod endpoints;
mod html;
mod internal_server_error;
mod logging;
mod navigation;
mod not_found;
pub mod product;
mod routing;
#[cfg(test)]
mod test_utils;

pub use app_state::AppState;
pub use db::{NameCase, initialize as initialize_db};
pub use logging::{LOG_BODY_LENGTH_LIMIT, logging_middleware};
pub use routing::build_router;

use crate::{
    alert::Alert, category::CategoryId, internal_server_error::InternalServerError,
    not_found::get_404_not_found_response,
};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum Error {
    /// An empty string was used to create a category name.
    #[error("Category name cannot be empty")]
    EmptyCategoryName,

    /// A category name longer than [category::CategoryName::MAX_LENGTH]
    /// characters was used to create a category name.
    #[error("Category name cannot be longer than 255 characters")]
    CategoryNameTooLong,

    /// The parent ID submitted in a form could not be parsed as an ID.
    #[error("\"{0}\" is not a valid parent category ID")]
    InvalidParentId(String),

    /// The category being read, updated or deleted does not exist.
    #[error("the category {0} could not be found")]
    CategoryNotFound(CategoryId),

    /// The proposed parent category does not exist.
    #[error("the parent category {0} does not exist")]
    ParentNotFound(CategoryId),

    /// A category was assigned itself as its parent.
    #[error("a category cannot be its own parent")]
    SelfParent,

    /// The proposed parent is a descendant of the category being moved, so
    /// the assignment would close a loop in the hierarchy.
    #[error("setting this parent would create a circular hierarchy")]
    CyclicHierarchy,

    /// Another category already uses this name.
    #[error("a category named \"{0}\" already exists")]
    DuplicateName(String),

    /// The stored hierarchy is inconsistent: following parent links from the
    /// category with this ID either reaches a category that does not exist or
    /// never reaches a root.
    ///
    /// This only happens if the database was modified outside of this crate.
    #[error("the stored category hierarchy is corrupt around category {0}")]
    CorruptHierarchy(CategoryId),

    /// A product was linked to a category ID that does not refer to a valid
    /// category.
    #[error("the category ID {0} does not refer to a valid category")]
    InvalidCategory(CategoryId),

    /// The requested resource was not found.
    ///
    /// Internally, this error may occur when a query returns no rows.
    #[error("the requested resource could not be found")]
    NotFound,

    /// An unhandled/unexpected SQL error.
    ///
    /// Any write that was in progress has been rolled back.
    #[error("an unexpected storage error occurred: {0}")]
    StorageFailure(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        match value {
            rusqlite::Error::QueryReturnedNoRows => Error::NotFound,
            error => {
                tracing::error!("an unhandled SQL error occurred: {}", error);
                Error::StorageFailure(error)
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        match self {
            Error::NotFound | Error::CategoryNotFound(_) => get_404_not_found_response(),
            Error::CorruptHierarchy(category_id) => {
                tracing::error!("Found a corrupt hierarchy around category {category_id}");
                InternalServerError {
                    description: "Corrupt Category Hierarchy",
                    fix: "The stored categories contain a broken parent link. \
                    Check the server logs and repair the database.",
                }
                .into_response()
            }
            Error::DatabaseLockError => InternalServerError::default().into_response(),
            // Any errors that are not handled above are not intended to be shown to the client.
            error => {
                tracing::error!("An unexpected error occurred: {}", error);
                InternalServerError::default().into_response()
            }
        }
    }
}

impl Error {
    /// The status code a client should see for this error.
    ///
    /// Rejected input maps to 422, a missing category to 404 and everything
    /// else to 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::EmptyCategoryName
            | Error::CategoryNameTooLong
            | Error::InvalidParentId(_)
            | Error::ParentNotFound(_)
            | Error::SelfParent
            | Error::CyclicHierarchy
            | Error::DuplicateName(_)
            | Error::InvalidCategory(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Error::CategoryNotFound(_) | Error::NotFound => StatusCode::NOT_FOUND,
            Error::CorruptHierarchy(_) | Error::StorageFailure(_) | Error::DatabaseLockError => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn into_alert_response(self) -> Response {
        let status_code = self.status_code();

        let alert = match self {
            Error::CategoryNotFound(_) | Error::NotFound => Alert::Error {
                message: "Category not found".to_owned(),
                details: "The category could not be found. \
                    Try refreshing the page to see if the category has already been deleted."
                    .to_owned(),
            },
            Error::SelfParent => Alert::Error {
                message: "Invalid parent category".to_owned(),
                details: "A category cannot be its own parent.".to_owned(),
            },
            Error::CyclicHierarchy => Alert::Error {
                message: "Invalid parent category".to_owned(),
                details: "The selected parent is nested under this category. \
                    Move the parent somewhere else first, or choose a different parent."
                    .to_owned(),
            },
            Error::ParentNotFound(parent_id) => Alert::Error {
                message: "Invalid parent category".to_owned(),
                details: format!("Could not find a category with the ID {parent_id}."),
            },
            Error::DuplicateName(name) => Alert::Error {
                message: "Duplicate Category Name".to_owned(),
                details: format!(
                    "The category {name} already exists. \
                    Choose a different name, or edit the existing category."
                ),
            },
            error @ (Error::EmptyCategoryName
            | Error::CategoryNameTooLong
            | Error::InvalidParentId(_)
            | Error::InvalidCategory(_)) => Alert::Error {
                message: "Invalid category".to_owned(),
                details: error.to_string(),
            },
            error => {
                tracing::error!("An unexpected error occurred: {error}");
                Alert::Error {
                    message: "Something went wrong".to_owned(),
                    details: "An unexpected error occurred, check the server logs for more details."
                        .to_owned(),
                }
            }
        };

        (status_code, alert).into_response()
    }
}
