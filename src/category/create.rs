//! Category creation page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{
        CategoryFormData, CategoryName, build_forest, create_category,
        form::{CategoryFormView, FormMode, ParentOption, parent_options},
    },
    endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The state needed for creating a category.
#[derive(Debug, Clone)]
pub struct CreateCategoryState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CreateCategoryState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category creation page.
pub async fn get_new_category_page(
    State(state): State<CreateCategoryState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let forest = build_forest(&*connection)
        .inspect_err(|error| tracing::error!("Failed to build category forest: {error}"))?;
    let options = parent_options(&forest, None);

    Ok(new_category_view(&options).into_response())
}

/// Handle category creation form submission.
pub async fn create_category_endpoint(
    State(state): State<CreateCategoryState>,
    Form(form_data): Form<CategoryFormData>,
) -> Response {
    let connection = match state.db_connection.lock() {
        Ok(connection) => connection,
        Err(error) => {
            tracing::error!("could not acquire database lock: {error}");
            return Error::DatabaseLockError.into_alert_response();
        }
    };

    let parsed = form_data
        .parent_id()
        .and_then(|parent_id| Ok((CategoryName::new(&form_data.name)?, parent_id)));

    let (name, parent_id) = match parsed {
        Ok(parsed) => parsed,
        Err(error) => {
            return match build_forest(&*connection) {
                Ok(forest) => new_category_form_view(
                    &form_data.name,
                    form_data.parent_id().ok().flatten(),
                    &parent_options(&forest, None),
                    &format!("Error: {error}"),
                )
                .into_response(),
                Err(error) => error.into_alert_response(),
            };
        }
    };

    match create_category(&*connection, name, parent_id) {
        Ok(category) => {
            tracing::debug!("Created category {} under {:?}", category.id, parent_id);

            (
                HxRedirect(endpoints::CATEGORIES_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response()
        }
        Err(error) => error.into_alert_response(),
    }
}

fn new_category_view(parent_options: &[ParentOption]) -> Markup {
    let nav_bar = NavBar::new(endpoints::NEW_CATEGORY_VIEW).into_html();
    let form = new_category_form_view("", None, parent_options, "");

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Create Category", &content)
}

fn new_category_form_view(
    name: &str,
    parent_id: Option<i64>,
    parent_options: &[ParentOption],
    error_message: &str,
) -> Markup {
    CategoryFormView {
        mode: FormMode::Create,
        endpoint: endpoints::POST_CATEGORY,
        name,
        parent_id,
        parent_options,
        error_message,
    }
    .into_html()
}
