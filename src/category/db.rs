//! Database operations for categories.

use rusqlite::{Connection, OptionalExtension, Row};

use crate::{
    Error, TransactionType,
    category::{Category, CategoryName},
    database_id::CategoryId,
    user::UserID,
};

/// Create the category table and indexes.
pub fn create_category_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute_batch(
        "CREATE TABLE IF NOT EXISTS category (
            id INTEGER PRIMARY KEY,
            user_id INTEGER NOT NULL,
            name TEXT NOT NULL,
            type TEXT NOT NULL,
            UNIQUE(user_id, name),
            FOREIGN KEY(user_id) REFERENCES user(id) ON UPDATE CASCADE ON DELETE CASCADE
        );

        CREATE INDEX IF NOT EXISTS idx_category_user_id ON category(user_id);",
    )?;

    Ok(())
}

/// Create a category and return it with its generated ID.
///
/// # Errors
///
/// Returns [Error::DuplicateCategory] if the user already has a category called `name`.
pub fn insert_category(
    user_id: UserID,
    name: CategoryName,
    kind: TransactionType,
    connection: &Connection,
) -> Result<Category, Error> {
    connection
        .prepare(
            "INSERT INTO category (user_id, name, type) VALUES (?1, ?2, ?3)
             RETURNING id, user_id, name, type",
        )?
        .query_row((user_id.as_i64(), name.as_ref(), kind), map_row)
        .map_err(|error| error.into())
}

/// Retrieve a single category by ID.
///
/// # Errors
///
/// Returns [Error::NotFound] if there is no category with `category_id`.
pub fn get_category(category_id: CategoryId, connection: &Connection) -> Result<Category, Error> {
    connection
        .prepare("SELECT id, user_id, name, type FROM category WHERE id = :id;")?
        .query_row(&[(":id", &category_id)], map_row)
        .map_err(|error| error.into())
}

/// Retrieve the categories of `user_id` ordered alphabetically by name.
pub fn get_categories_for_user(
    user_id: UserID,
    connection: &Connection,
) -> Result<Vec<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type FROM category WHERE user_id = :user_id
             ORDER BY name ASC;",
        )?
        .query_map(&[(":user_id", &user_id.as_i64())], map_row)?
        .map(|maybe_category| maybe_category.map_err(|error| error.into()))
        .collect()
}

/// Find the category of `user_id` called `name`.
///
/// Only the user's own categories are searched.
pub fn find_category_by_name(
    user_id: UserID,
    name: &CategoryName,
    connection: &Connection,
) -> Result<Option<Category>, Error> {
    connection
        .prepare(
            "SELECT id, user_id, name, type FROM category
             WHERE user_id = :user_id AND name = :name;",
        )?
        .query_row(
            rusqlite::named_params! {":user_id": user_id.as_i64(), ":name": name.as_ref()},
            map_row,
        )
        .optional()
        .map_err(|error| error.into())
}

/// Overwrite the name and type of a category.
///
/// # Errors
///
/// Returns a:
/// - [Error::NotFound] if the category does not exist,
/// - [Error::DuplicateCategory] if the owner already has another category with the new name.
pub fn update_category_row(category: &Category, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute(
        "UPDATE category SET name = ?1, type = ?2 WHERE id = ?3",
        (category.name.as_ref(), category.kind, category.id),
    )?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

/// Delete a category by ID.
///
/// This does not check whether transactions still use the category.
///
/// # Errors
///
/// Returns [Error::NotFound] if the category does not exist.
pub fn delete_category_row(category_id: CategoryId, connection: &Connection) -> Result<(), Error> {
    let rows_affected = connection.execute("DELETE FROM category WHERE id = ?1", [category_id])?;

    if rows_affected == 0 {
        return Err(Error::NotFound);
    }

    Ok(())
}

fn map_row(row: &Row) -> Result<Category, rusqlite::Error> {
    let id = row.get(0)?;
    let user_id = UserID::new(row.get(1)?);
    let raw_name: String = row.get(2)?;
    let kind = row.get(3)?;

    Ok(Category {
        id,
        user_id,
        name: CategoryName::new_unchecked(&raw_name),
        kind,
    })
}
