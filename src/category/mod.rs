//! The category hierarchy engine and the pages for managing categories.
//!
//! - [CategoryStore]: the storage contract, implemented for SQLite connections.
//! - [check_parent_assignment]: decides whether a parent assignment keeps the
//!   hierarchy acyclic.
//! - [create_category], [update_category] and [delete_category]: write
//!   categories atomically.
//! - [build_forest]: materializes the flat table into nested trees.

mod create;
mod db;
mod delete;
mod domain;
mod edit;
mod forest;
mod form;
mod list;
mod mutate;
mod show;
mod store;
mod validate;

pub use create::{create_category_endpoint, get_new_category_page};
pub use db::create_category_table;
pub use delete::delete_category_endpoint;
pub use domain::{Category, CategoryFormData, CategoryId, CategoryName};
pub use edit::{get_edit_category_page, update_category_endpoint};
pub use forest::{SiblingOrder, TreeNode, build_forest, build_forest_with_order, flatten};
pub use list::get_categories_page;
pub use mutate::{create_category, delete_category, update_category};
pub use show::get_category_page;
pub use store::CategoryStore;
pub use validate::{ancestors, check_parent_assignment, check_parent_exists};
