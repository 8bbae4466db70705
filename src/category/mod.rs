//! Categories: user-defined, typed labels that transactions refer to.

mod db;
mod domain;
mod endpoints;
mod service;

pub use db::{
    create_category_table, delete_category_row, find_category_by_name, get_categories_for_user,
    get_category, insert_category, update_category_row,
};
pub use domain::{Category, CategoryForm, CategoryName};
pub use endpoints::{
    create_category_endpoint, delete_category_endpoint, list_categories_endpoint,
    update_category_endpoint,
};
pub use service::{create_category, delete_category, list_categories, update_category};
