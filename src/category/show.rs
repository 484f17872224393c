//! The page for a single category.

use std::sync::{Arc, Mutex};

use axum::{
    extract::{FromRef, Path, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    category::{Category, CategoryId, CategoryStore, ancestors},
    endpoints,
    html::{BUTTON_DELETE_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, base, link},
    navigation::NavBar,
    product::count_products_in_category,
};

/// The state needed for the category page.
#[derive(Debug, Clone)]
pub struct CategoryPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoryPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// Render a category with its path from the root, its children and the
/// number of products filed under it.
pub async fn get_category_page(
    Path(category_id): Path<CategoryId>,
    State(state): State<CategoryPageState>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let category = connection
        .get(category_id)?
        .ok_or(Error::CategoryNotFound(category_id))?;
    let mut path = ancestors(&*connection, category_id)?;
    path.reverse();
    let children = connection.get_children(category_id)?;
    let product_count = count_products_in_category(&connection, category_id)?;

    Ok(category_view(&category, &path, &children, product_count).into_response())
}

fn category_url(category_id: CategoryId) -> String {
    endpoints::format_endpoint(endpoints::CATEGORY_VIEW, category_id)
}

fn category_view(
    category: &Category,
    path: &[Category],
    children: &[Category],
    product_count: u32,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::CATEGORY_VIEW).into_html();
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, category.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_CATEGORY, category.id);
    let confirm_message = format!(
        "Are you sure you want to delete '{}'? Its {} subcategories will move up a level.",
        category.name,
        children.len()
    );

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full max-w-xl"
            {
                nav aria-label="Breadcrumb" class="text-sm"
                {
                    ol class="flex flex-wrap gap-2"
                    {
                        li { (link(endpoints::CATEGORIES_VIEW, "Categories")) }

                        @for ancestor in path {
                            li { "/" }
                            li { (link(&category_url(ancestor.id), ancestor.name.as_ref())) }
                        }

                        li { "/" }
                        li aria-current="page" { (category.name) }
                    }
                }

                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { (category.name) }

                    div class="flex gap-4"
                    {
                        a href=(edit_url) class=(LINK_STYLE) { "Edit" }

                        button
                            type="button"
                            hx-delete=(delete_url)
                            hx-confirm=(confirm_message)
                            hx-target-error="#alert-container"
                            hx-swap="none"
                            class=(BUTTON_DELETE_STYLE)
                        {
                            "Delete"
                        }
                    }
                }

                dl class="grid grid-cols-2 gap-2"
                {
                    dt class="font-medium" { "Parent" }
                    dd id="parent"
                    {
                        @match path.last() {
                            Some(parent) => {
                                (link(&category_url(parent.id), parent.name.as_ref()))
                            }
                            None => { "None (root category)" }
                        }
                    }

                    dt class="font-medium" { "Products" }
                    dd id="product-count" { (product_count) }
                }

                section
                {
                    h2 class="text-lg font-semibold" { "Subcategories" }

                    @if children.is_empty() {
                        p id="no-children" class="text-gray-500 dark:text-gray-400"
                        {
                            "This category has no subcategories."
                        }
                    } @else {
                        ul id="children" class="list-disc list-inside"
                        {
                            @for child in children {
                                li { (link(&category_url(child.id), child.name.as_ref())) }
                            }
                        }
                    }
                }
            }
        }
    );

    base(category.name.as_ref(), &content)
}

#[cfg(test)]
mod category_page_tests {
    use axum::{
        extract::{Path, State},
        http::StatusCode,
        response::IntoResponse,
    };
    use scraper::{Html, Selector};

    use crate::{
        category::show::{CategoryPageState, get_category_page},
        endpoints,
        product::set_product_categories,
        test_utils::{
            assert_status_ok, assert_valid_html, get_shared_test_connection, must_create_category,
            parse_html_document,
        },
    };

    fn text_of(html: &Html, selector: &str) -> String {
        html.select(&Selector::parse(selector).unwrap())
            .next()
            .unwrap_or_else(|| panic!("Nothing matched {selector}"))
            .text()
            .collect::<String>()
            .trim()
            .to_owned()
    }

    fn link_texts(html: &Html, selector: &str) -> Vec<String> {
        html.select(&Selector::parse(selector).unwrap())
            .map(|link| link.text().collect::<String>())
            .collect()
    }

    #[tokio::test]
    async fn shows_path_parent_children_and_products() {
        let db_connection = get_shared_test_connection();
        let electronics = must_create_category(&db_connection, "Electronics", None);
        let phones = must_create_category(&db_connection, "Phones", Some(&electronics));
        must_create_category(&db_connection, "Smartphones", Some(&phones));
        must_create_category(&db_connection, "Feature Phones", Some(&phones));
        set_product_categories(&db_connection.lock().unwrap(), 1, &[phones.id]).unwrap();
        let state = CategoryPageState { db_connection };

        let response = get_category_page(Path(phones.id), State(state))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        assert_eq!(text_of(&html, "h1"), "Phones");
        assert_eq!(
            link_texts(&html, "nav[aria-label=Breadcrumb] a"),
            vec!["Categories", "Electronics"]
        );
        assert_eq!(text_of(&html, "#parent"), "Electronics");
        let parent_href = html
            .select(&Selector::parse("#parent a").unwrap())
            .next()
            .and_then(|link| link.value().attr("href"))
            .map(str::to_owned);
        assert_eq!(
            parent_href,
            Some(endpoints::format_endpoint(
                endpoints::CATEGORY_VIEW,
                electronics.id
            ))
        );
        assert_eq!(
            link_texts(&html, "#children a"),
            vec!["Smartphones", "Feature Phones"]
        );
        assert_eq!(text_of(&html, "#product-count"), "1");
    }

    #[tokio::test]
    async fn root_category_has_no_parent() {
        let db_connection = get_shared_test_connection();
        let books = must_create_category(&db_connection, "Books", None);
        let state = CategoryPageState { db_connection };

        let response = get_category_page(Path(books.id), State(state))
            .await
            .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(text_of(&html, "#parent"), "None (root category)");
        assert_eq!(
            text_of(&html, "#no-children"),
            "This category has no subcategories."
        );
        assert_eq!(text_of(&html, "#product-count"), "0");
    }

    #[tokio::test]
    async fn missing_category_is_not_found() {
        let state = CategoryPageState {
            db_connection: get_shared_test_connection(),
        };

        let response = get_category_page(Path(3), State(state))
            .await
            .into_response();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
