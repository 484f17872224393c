//! Category editing page and endpoint.

use std::sync::{Arc, Mutex};

use axum::{
    Form,
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{
        CategoryFormData, CategoryId, CategoryName, CategoryStore, build_forest,
        form::{CategoryFormView, FormMode, ParentOption, parent_options},
        update_category,
    },
    endpoints,
    html::{FORM_CONTAINER_STYLE, base},
    navigation::NavBar,
};

/// The state needed for the edit category page.
#[derive(Debug, Clone)]
pub struct EditCategoryPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for EditCategoryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The state needed for updating a category.
#[derive(Debug, Clone)]
pub struct UpdateCategoryEndpointState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for UpdateCategoryEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render the category editing page.
///
/// The parent dropdown leaves out the category and its descendants.
pub async fn get_edit_category_page(
    Path(category_id): Path<CategoryId>,
    State(state): State<EditCategoryPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = connection
        .get(category_id)?
        .ok_or(Error::CategoryNotFound(category_id))?;
    let forest = build_forest(&*connection)
        .inspect_err(|error| tracing::error!("Failed to build category forest: {error}"))?;
    let options = parent_options(&forest, Some(category_id));

    let edit_endpoint = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category_id);
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CATEGORY, category_id);
    let form = edit_category_form_view(
        &update_endpoint,
        category.name.as_ref(),
        category.parent_id,
        &options,
        "",
    );

    Ok(edit_category_view(&edit_endpoint, form).into_response())
}

/// Handle category update form submission.
///
/// Renaming and moving happen in one write. On success the client is
/// redirected to the category's page.
pub async fn update_category_endpoint(
    Path(category_id): Path<CategoryId>,
    State(state): State<UpdateCategoryEndpointState>,
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
            let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CATEGORY, category_id);

            return match build_forest(&*connection) {
                Ok(forest) => edit_category_form_view(
                    &update_endpoint,
                    &form_data.name,
                    form_data.parent_id().ok().flatten(),
                    &parent_options(&forest, Some(category_id)),
                    &format!("Error: {error}"),
                )
                .into_response(),
                Err(error) => error.into_alert_response(),
            };
        }
    };

    match update_category(&*connection, category_id, name, parent_id) {
        Ok(category) => (
            HxRedirect(endpoints::format_endpoint(
                endpoints::CATEGORY_VIEW,
                category.id,
            )),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::debug!("Rejected update of category {category_id}: {error}");
            error.into_alert_response()
        }
    }
}

fn edit_category_view(edit_endpoint: &str, form: Markup) -> Markup {
    let nav_bar = NavBar::new(edit_endpoint).into_html();

    let content = html! {
        (nav_bar)
        div class=(FORM_CONTAINER_STYLE) { (form) }
    };

    base("Edit Category", &content)
}

fn edit_category_form_view(
    update_endpoint: &str,
    name: &str,
    parent_id: Option<CategoryId>,
    parent_options: &[ParentOption],
    error_message: &str,
) -> Markup {
    CategoryFormView {
        mode: FormMode::Update,
        endpoint: update_endpoint,
        name,
        parent_id,
        parent_options,
        error_message,
    }
    .into_html()
}


#[cfg(test)]
mod update_category_endpoint_tests {
    use axum::{
        Form,
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        category::{
            CategoryFormData, CategoryStore, edit::UpdateCategoryEndpointState,
            update_category_endpoint,
        },
        endpoints,
        test_utils::{
            assert_form_error_message, assert_form_select_with_selected, assert_hx_redirect,
            assert_valid_html, get_shared_test_connection, must_create_category, must_get_form,
            parse_html_fragment,
        },
    };

    #[tokio::test]
    async fn can_rename_and_move_category() {
        let db_connection = get_shared_test_connection();
        let electronics = must_create_category(&db_connection, "Electronics", None);
        let books = must_create_category(&db_connection, "Books", None);
        let phones = must_create_category(&db_connection, "Phones", Some(&electronics));
        let state = UpdateCategoryEndpointState { db_connection };
        let form = CategoryFormData {
            name: "E-Readers".to_owned(),
            parent_id: books.id.to_string(),
        };

        let response = update_category_endpoint(Path(phones.id), State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_hx_redirect(
            &response,
            &endpoints::format_endpoint(endpoints::CATEGORY_VIEW, phones.id),
        );
        let connection = state.db_connection.lock().unwrap();
        let updated = connection.get(phones.id).unwrap().unwrap();
        assert_eq!(updated.name.as_ref(), "E-Readers");
        assert_eq!(updated.parent_id, Some(books.id));
    }

    #[tokio::test]
    async fn can_make_category_a_root() {
        let db_connection = get_shared_test_connection();
        let electronics = must_create_category(&db_connection, "Electronics", None);
        let phones = must_create_category(&db_connection, "Phones", Some(&electronics));
        let state = UpdateCategoryEndpointState { db_connection };
        let form = CategoryFormData {
            name: "Phones".to_owned(),
            parent_id: "".to_owned(),
        };

        let response = update_category_endpoint(Path(phones.id), State(state.clone()), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        let connection = state.db_connection.lock().unwrap();
        assert!(connection.get(phones.id).unwrap().unwrap().is_root());
    }

    #[tokio::test]
    async fn moving_under_descendant_is_rejected() {
        let db_connection = get_shared_test_connection();
        let electronics = must_create_category(&db_connection, "Electronics", None);
        let phones = must_create_category(&db_connection, "Phones", Some(&electronics));
        let smartphones = must_create_category(&db_connection, "Smartphones", Some(&phones));
        let state = UpdateCategoryEndpointState { db_connection };
        let form = CategoryFormData {
            name: "Electronics".to_owned(),
            parent_id: smartphones.id.to_string(),
        };

        let response =
            update_category_endpoint(Path(electronics.id), State(state.clone()), Form(form))
                .await
                .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let connection = state.db_connection.lock().unwrap();
        assert!(connection.get(electronics.id).unwrap().unwrap().is_root());
    }

    #[tokio::test]
    async fn self_parent_is_rejected() {
        let db_connection = get_shared_test_connection();
        let electronics = must_create_category(&db_connection, "Electronics", None);
        let state = UpdateCategoryEndpointState { db_connection };
        let form = CategoryFormData {
            name: "Electronics".to_owned(),
            parent_id: electronics.id.to_string(),
        };

        let response = update_category_endpoint(Path(electronics.id), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn updating_missing_category_is_not_found() {
        let state = UpdateCategoryEndpointState {
            db_connection: get_shared_test_connection(),
        };
        let form = CategoryFormData {
            name: "Ghost".to_owned(),
            parent_id: "".to_owned(),
        };

        let response = update_category_endpoint(Path(7), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn invalid_parent_id_renders_form_error() {
        let db_connection = get_shared_test_connection();
        let electronics = must_create_category(&db_connection, "Electronics", None);
        let state = UpdateCategoryEndpointState { db_connection };
        let form = CategoryFormData {
            name: "Electronics".to_owned(),
            parent_id: "abc".to_owned(),
        };

        let response = update_category_endpoint(Path(electronics.id), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: \"abc\" is not a valid parent category ID");
    }

    #[tokio::test]
    async fn empty_name_keeps_selected_parent() {
        let db_connection = get_shared_test_connection();
        let electronics = must_create_category(&db_connection, "Electronics", None);
        must_create_category(&db_connection, "Books", None);
        let phones = must_create_category(&db_connection, "Phones", None);
        let state = UpdateCategoryEndpointState { db_connection };
        let form = CategoryFormData {
            name: "".to_owned(),
            parent_id: electronics.id.to_string(),
        };

        let response = update_category_endpoint(Path(phones.id), State(state), Form(form))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::OK);
        let html = parse_html_fragment(response).await;
        let form = must_get_form(&html);
        assert_form_error_message(&form, "Error: Category name cannot be empty");
        assert_form_select_with_selected(&form, "parent_id", &electronics.id.to_string());
    }
}
