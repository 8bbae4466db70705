//! Route handlers for categories.

use axum::{Extension, Json, extract::State, http::StatusCode};

use crate::{
    Error,
    category::{
        Category, CategoryForm, create_category, delete_category, list_categories,
        update_category,
    },
    database_id::CategoryId,
    db::{DatabaseState, lock_connection},
    extract::{ApiJson, ApiPath},
    user::UserID,
};

/// A route handler for creating a new category.
pub async fn create_category_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    ApiJson(form): ApiJson<CategoryForm>,
) -> Result<(StatusCode, Json<Category>), Error> {
    let connection = lock_connection(&state.db_connection)?;
    let category = create_category(user_id, form, &connection)?;

    Ok((StatusCode::CREATED, Json(category)))
}

/// A route handler for listing the logged-in user's categories.
pub async fn list_categories_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
) -> Result<Json<Vec<Category>>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    list_categories(user_id, &connection).map(Json)
}

/// A route handler for renaming or retyping a category.
pub async fn update_category_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(category_id): ApiPath<CategoryId>,
    ApiJson(form): ApiJson<CategoryForm>,
) -> Result<Json<Category>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    update_category(category_id, user_id, form, &connection).map(Json)
}

/// A route handler for deleting an unused category. Responds with the deleted category.
pub async fn delete_category_endpoint(
    State(state): State<DatabaseState>,
    Extension(user_id): Extension<UserID>,
    ApiPath(category_id): ApiPath<CategoryId>,
) -> Result<Json<Category>, Error> {
    let connection = lock_connection(&state.db_connection)?;

    delete_category(category_id, user_id, &connection).map(Json)
}
