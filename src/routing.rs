//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    category::{
        create_category_endpoint, delete_category_endpoint, get_categories_page,
        get_category_page, get_edit_category_page, get_new_category_page,
        update_category_endpoint,
    },
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let page_routes = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::CATEGORIES_VIEW, get(get_categories_page))
        .route(endpoints::NEW_CATEGORY_VIEW, get(get_new_category_page))
        .route(endpoints::CATEGORY_VIEW, get(get_category_page))
        .route(endpoints::EDIT_CATEGORY_VIEW, get(get_edit_category_page))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api_routes = Router::new()
        .route(endpoints::POST_CATEGORY, post(create_category_endpoint))
        .route(endpoints::PUT_CATEGORY, put(update_category_endpoint))
        .route(endpoints::DELETE_CATEGORY, delete(delete_category_endpoint));

    page_routes
        .merge(api_routes)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the category tree.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::CATEGORIES_VIEW)
}
