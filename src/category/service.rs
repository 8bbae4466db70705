//! Ownership and consistency rules for categories.

use rusqlite::Connection;

use crate::{
    Error, TransactionType,
    category::{
        Category, CategoryForm, CategoryName, delete_category_row, get_categories_for_user,
        get_category, insert_category, update_category_row,
    },
    database_id::CategoryId,
    extract::require,
    transaction::count_transactions_in_category,
    user::UserID,
};

/// Create a category for `user_id` from a request body.
///
/// # Errors
///
/// Returns a:
/// - [Error::Validation] if the name is empty or the type is not "income" or "expense",
/// - [Error::DuplicateCategory] if the user already has a category with the same name.
pub fn create_category(
    user_id: UserID,
    form: CategoryForm,
    connection: &Connection,
) -> Result<Category, Error> {
    let name = CategoryName::new(&require(form.name, "name")?)?;
    let kind: TransactionType = require(form.kind, "type")?.parse()?;

    insert_category(user_id, name, kind, connection)
}

/// List the categories owned by `user_id`.
pub fn list_categories(user_id: UserID, connection: &Connection) -> Result<Vec<Category>, Error> {
    get_categories_for_user(user_id, connection)
}

/// Get a category, checking that it belongs to `user_id`.
///
/// # Errors
///
/// Returns a:
/// - [Error::NotFound] if the category does not exist,
/// - [Error::Forbidden] if it belongs to another user.
pub fn get_owned_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    let category = get_category(category_id, connection)?;

    if category.user_id != user_id {
        tracing::warn!(
            "User {user_id} tried to access category {category_id} owned by user {}",
            category.user_id
        );
        return Err(Error::Forbidden);
    }

    Ok(category)
}

/// Apply the supplied fields of `form` to a category owned by `user_id`.
///
/// Transactions refer to categories by ID, so a rename needs no changes to
/// any transaction.
///
/// # Errors
///
/// Returns a:
/// - [Error::NotFound] or [Error::Forbidden] as for [get_owned_category],
/// - [Error::Validation] if no field was supplied or a field is invalid,
/// - [Error::DuplicateCategory] if the new name is already used by another of the user's categories.
pub fn update_category(
    category_id: CategoryId,
    user_id: UserID,
    form: CategoryForm,
    connection: &Connection,
) -> Result<Category, Error> {
    let mut category = get_owned_category(category_id, user_id, connection)?;

    if form.name.is_none() && form.kind.is_none() {
        return Err(Error::Validation(
            "provide a name or type to update".to_owned(),
        ));
    }

    if let Some(name) = form.name {
        category.name = CategoryName::new(&name)?;
    }

    if let Some(kind) = form.kind {
        category.kind = kind.parse()?;
    }

    update_category_row(&category, connection)?;

    Ok(category)
}

/// Delete a category owned by `user_id` and return it.
///
/// A category that is still used by a transaction is never deleted.
///
/// The check and the delete must run on the same locked connection so that no
/// transaction can be recorded against the category in between.
///
/// # Errors
///
/// Returns a:
/// - [Error::NotFound] or [Error::Forbidden] as for [get_owned_category],
/// - [Error::CategoryInUse] if any of the user's transactions use the category.
pub fn delete_category(
    category_id: CategoryId,
    user_id: UserID,
    connection: &Connection,
) -> Result<Category, Error> {
    let category = get_owned_category(category_id, user_id, connection)?;

    let transaction_count = count_transactions_in_category(user_id, category_id, connection)?;
    if transaction_count > 0 {
        tracing::debug!(
            "Refusing to delete category {category_id} used by {transaction_count} transactions"
        );
        return Err(Error::CategoryInUse);
    }

    delete_category_row(category_id, connection)?;

    Ok(category)
}

#[cfg(test)]
mod category_service_tests {
    use rusqlite::Connection;
    use time::macros::date;

    use crate::{
        Error, PasswordHash, TransactionType,
        category::{CategoryForm, CategoryName, get_category},
        db::initialize,
        transaction::{NewTransaction, delete_transaction_row, insert_transaction},
        user::{UserID, Username, create_user, parse_email},
    };

    use super::{create_category, delete_category, list_categories, update_category};

    fn get_test_db_connection() -> (Connection, UserID, UserID) {
        let connection = Connection::open_in_memory().unwrap();
        initialize(&connection).expect("Could not initialize database");
        let ana = create_user(
            Username::new_unchecked("ana"),
            parse_email("a@x.com").unwrap(),
            PasswordHash::new_unchecked("hash"),
            &connection,
        )
        .unwrap()
        .id;
        let bo = create_user(
            Username::new_unchecked("bo"),
            parse_email("b@x.com").unwrap(),
            PasswordHash::new_unchecked("hash"),
            &connection,
        )
        .unwrap()
        .id;

        (connection, ana, bo)
    }

    fn form(name: Option<&str>, kind: Option<&str>) -> CategoryForm {
        CategoryForm {
            name: name.map(str::to_owned),
            kind: kind.map(str::to_owned),
        }
    }

    #[test]
    fn create_normalizes_name_and_type() {
        let (connection, ana, _) = get_test_db_connection();

        let category =
            create_category(ana, form(Some("  Food "), Some("Expense")), &connection).unwrap();

        assert_eq!(category.name.as_ref(), "food");
        assert_eq!(category.kind, TransactionType::Expense);
        assert_eq!(category.user_id, ana);
    }

    #[test]
    fn create_rejects_missing_or_invalid_fields() {
        let (connection, ana, _) = get_test_db_connection();

        let cases = [
            form(None, Some("expense")),
            form(Some("   "), Some("expense")),
            form(Some("food"), None),
            form(Some("food"), Some("transfer")),
        ];

        for case in cases {
            let result = create_category(ana, case, &connection);
            assert!(
                matches!(result, Err(Error::Validation(_))),
                "want validation error, got {result:?}"
            );
        }
    }

    #[test]
    fn create_rejects_case_variant_duplicate() {
        let (connection, ana, _) = get_test_db_connection();
        create_category(ana, form(Some("Food"), Some("expense")), &connection).unwrap();

        let result = create_category(ana, form(Some(" FOOD"), Some("expense")), &connection);

        assert_eq!(result, Err(Error::DuplicateCategory));
    }

    #[test]
    fn list_only_returns_own_categories() {
        let (connection, ana, bo) = get_test_db_connection();
        let food = create_category(ana, form(Some("food"), Some("expense")), &connection).unwrap();
        create_category(bo, form(Some("salary"), Some("income")), &connection).unwrap();

        assert_eq!(list_categories(ana, &connection), Ok(vec![food]));
    }

    #[test]
    fn update_applies_supplied_fields() {
        let (connection, ana, _) = get_test_db_connection();
        let food = create_category(ana, form(Some("food"), Some("expense")), &connection).unwrap();

        let updated = update_category(food.id, ana, form(Some("Groceries"), None), &connection)
            .unwrap();

        assert_eq!(updated.name, CategoryName::new_unchecked("groceries"));
        assert_eq!(updated.kind, TransactionType::Expense);
        assert_eq!(get_category(food.id, &connection), Ok(updated));
    }

    #[test]
    fn update_requires_a_field() {
        let (connection, ana, _) = get_test_db_connection();
        let food = create_category(ana, form(Some("food"), Some("expense")), &connection).unwrap();

        let result = update_category(food.id, ana, form(None, None), &connection);

        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn update_rejects_other_users_category() {
        let (connection, ana, bo) = get_test_db_connection();
        let food = create_category(ana, form(Some("food"), Some("expense")), &connection).unwrap();

        let result = update_category(food.id, bo, form(Some("mine"), None), &connection);

        assert_eq!(result, Err(Error::Forbidden));
        assert_eq!(get_category(food.id, &connection), Ok(food));
    }

    #[test]
    fn update_fails_on_missing_category() {
        let (connection, ana, _) = get_test_db_connection();

        let result = update_category(404, ana, form(Some("x"), None), &connection);

        assert_eq!(result, Err(Error::NotFound));
    }

    #[test]
    fn delete_is_refused_while_transactions_use_the_category() {
        let (connection, ana, _) = get_test_db_connection();
        let food = create_category(ana, form(Some("food"), Some("expense")), &connection).unwrap();
        let transaction = insert_transaction(
            ana,
            &NewTransaction {
                kind: TransactionType::Expense,
                category_id: food.id,
                amount: 50.0,
                date: date!(2024 - 01 - 01),
                description: None,
            },
            &connection,
        )
        .unwrap();

        assert_eq!(
            delete_category(food.id, ana, &connection),
            Err(Error::CategoryInUse)
        );

        delete_transaction_row(transaction.id, &connection).unwrap();

        assert_eq!(delete_category(food.id, ana, &connection), Ok(food.clone()));
        assert_eq!(get_category(food.id, &connection), Err(Error::NotFound));
    }

    #[test]
    fn delete_rejects_other_users_category() {
        let (connection, ana, bo) = get_test_db_connection();
        let food = create_category(ana, form(Some("food"), Some("expense")), &connection).unwrap();

        assert_eq!(delete_category(food.id, bo, &connection), Err(Error::Forbidden));
        assert_eq!(get_category(food.id, &connection), Ok(food));
    }
}
