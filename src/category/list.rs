//! The category tree page.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{
    AppState, Error,
    category::{CategoryId, SiblingOrder, TreeNode, build_forest_with_order, flatten},
    endpoints,
    html::{
        LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE,
        base, edit_delete_action_links,
    },
    navigation::NavBar,
    product::count_products_per_category,
};

/// The state needed for the category tree page.
#[derive(Debug, Clone)]
pub struct CategoriesPageState {
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for CategoriesPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for the category tree page.
#[derive(Debug, Default, Deserialize)]
pub struct CategoriesQuery {
    /// How to order sibling categories, `insertion` or `name`.
    #[serde(default)]
    pub sort: SiblingOrder,
}

/// A row in the category tree table.
#[derive(Debug, Clone)]
struct CategoryRow<'a> {
    depth: usize,
    node: &'a TreeNode,
    product_count: u32,
}

/// Render every category as an indented tree along with product counts.
pub async fn get_categories_page(
    State(state): State<CategoriesPageState>,
    Query(query): Query<CategoriesQuery>,
) -> Result<Response, Error> {
    let connection = state
        .db_connection
        .lock()
        .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
        .map_err(|_| Error::DatabaseLockError)?;

    let forest = build_forest_with_order(&*connection, query.sort)
        .inspect_err(|error| tracing::error!("Failed to build category forest: {error}"))?;

    let products_per_category = count_products_per_category(&connection).inspect_err(|error| {
        tracing::error!("Could not count products per category: {error}")
    })?;

    let rows = category_rows(&forest, &products_per_category);

    Ok(categories_view(&rows, query.sort).into_response())
}

fn category_rows<'a>(
    forest: &'a [TreeNode],
    products_per_category: &HashMap<CategoryId, u32>,
) -> Vec<CategoryRow<'a>> {
    flatten(forest)
        .into_iter()
        .map(|(depth, node)| CategoryRow {
            depth,
            node,
            product_count: *products_per_category.get(&node.id).unwrap_or(&0),
        })
        .collect()
}

fn categories_view(rows: &[CategoryRow], sort: SiblingOrder) -> Markup {
    let new_category_route = endpoints::NEW_CATEGORY_VIEW;
    let nav_bar = NavBar::new(endpoints::CATEGORIES_VIEW).into_html();

    let (sort_link, sort_text) = match sort {
        SiblingOrder::Insertion => (
            format!("{}?sort=name", endpoints::CATEGORIES_VIEW),
            "Sort by name",
        ),
        SiblingOrder::Name => (
            format!("{}?sort=insertion", endpoints::CATEGORIES_VIEW),
            "Sort by creation order",
        ),
    };

    let table_row = |row: &CategoryRow| {
        let category_url = endpoints::format_endpoint(endpoints::CATEGORY_VIEW, row.node.id);
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_CATEGORY_VIEW, row.node.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_CATEGORY, row.node.id);
        let confirm_message = format!(
            "Are you sure you want to delete '{}'? Its {} subcategories will move up a level \
            and it will be removed from {} product(s).",
            row.node.name,
            row.node.children.len(),
            row.product_count
        );
        let indent = format!("padding-left: {}rem", row.depth * 2);

        html!(
            tr class=(TABLE_ROW_STYLE) data-depth=(row.depth)
            {
                td class=(TABLE_CELL_STYLE)
                {
                    div style=(indent)
                    {
                        @if row.depth > 0 {
                            span class="text-gray-400" { "└─ " }
                        }

                        a href=(category_url) class=(LINK_STYLE) { (row.node.name) }
                    }
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (row.node.children.len())
                }

                td class=(TABLE_CELL_STYLE)
                {
                    (row.product_count)
                }

                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(
                            &edit_url,
                            &delete_url,
                            &confirm_message,
                            "body",
                            "none",
                        ))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 lg:max-w-5xl lg:w-full"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Categories" }

                    div class="flex gap-4"
                    {
                        a href=(sort_link) class=(LINK_STYLE) { (sort_text) }

                        a href=(new_category_route) class=(LINK_STYLE)
                        {
                            "Create Category"
                        }
                    }
                }

                section class="dark:bg-gray-800 lg:mx-auto overflow-x-auto"
                {
                    table class="w-full text-sm text-left rtl:text-right
                        text-gray-500 dark:text-gray-400"
                    {
                        thead class=(TABLE_HEADER_STYLE)
                        {
                            tr
                            {
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Name"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Subcategories"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Products"
                                }
                                th scope="col" class=(TABLE_CELL_STYLE)
                                {
                                    "Actions"
                                }
                            }
                        }

                        tbody
                        {
                            @for row in rows {
                                (table_row(row))
                            }

                            @if rows.is_empty() {
                                tr
                                {
                                    td
                                        colspan="4"
                                        class="px-6 py-4 text-center
                                            text-gray-500 dark:text-gray-400"
                                    {
                                        "No categories created yet. "
                                        a href=(new_category_route) class=(LINK_STYLE)
                                        {
                                            "Create your first category"
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Categories", &content)
}
