//! The API endpoints URIs.
//!
//! For endpoints that take a parameter, e.g., '/categories/{category_id}', use [format_endpoint].

/// The root route which reports that the API is up.
pub const ROOT: &str = "/";

/// The route for registering a new user.
pub const REGISTER: &str = "/api/v1/users/register";
/// The route for logging in a user.
pub const LOG_IN: &str = "/api/v1/users/login";
/// The route for getting the logged-in user's profile.
pub const ME: &str = "/api/v1/users/me";
/// The route for changing the username or email.
pub const UPDATE_PROFILE: &str = "/api/v1/users/update-profile";
/// The route for changing the password.
pub const CHANGE_PASSWORD: &str = "/api/v1/users/change-password";

/// The route to create a category.
pub const CREATE_CATEGORY: &str = "/api/v1/categories/create";
/// The route to list the user's categories.
pub const LIST_CATEGORIES: &str = "/api/v1/categories/lists";
/// The route to update a category.
pub const UPDATE_CATEGORY: &str = "/api/v1/categories/update/{category_id}";
/// The route to delete a category.
pub const DELETE_CATEGORY: &str = "/api/v1/categories/delete/{category_id}";

/// The route to create a transaction.
pub const CREATE_TRANSACTION: &str = "/api/v1/transactions/create";
/// The route to list and filter the user's transactions.
pub const LIST_TRANSACTIONS: &str = "/api/v1/transactions/lists";
/// The route to update a transaction.
pub const UPDATE_TRANSACTION: &str = "/api/v1/transactions/update/{transaction_id}";
/// The route to delete a transaction.
pub const DELETE_TRANSACTION: &str = "/api/v1/transactions/delete/{transaction_id}";

/// The route for income, expense and balance totals.
pub const REPORT_SUMMARY: &str = "/api/v1/reports/summary";
/// The route for chart data.
pub const REPORT_CHART: &str = "/api/v1/reports/chart";
/// The route to download a CSV report.
pub const REPORT_EXPORT_CSV: &str = "/api/v1/reports/export.csv";

/// Replace the parameter in `endpoint_path` with `id`.
///
/// A parameter is a string that starts with a left brace, followed by
/// lowercase letters or underscores, and ends with a right brace.
/// For example, in the endpoint path '/users/{user_id}', '{user_id}' is the parameter.
///
/// This function assumes that an endpoint path only contains ASCII characters
/// and a single parameter.
///
/// If no parameter is found in `endpoint_path`, the function returns the
/// the original `endpoint_path`.
pub fn format_endpoint(endpoint_path: &str, id: i64) -> String {
    let mut param_start = None;
    let mut param_end = None;

    for (i, c) in endpoint_path.chars().enumerate() {
        if c == '{' {
            param_start = Some(i);
        } else if param_start.is_some() && c == '}' {
            param_end = Some(i + 1);
            break;
        }
    }

    let param_start = match param_start {
        Some(start) => start,
        None => return endpoint_path.to_string(),
    };

    let param_end = param_end.unwrap_or(endpoint_path.len());

    format!(
        "{}{}{}",
        &endpoint_path[..param_start],
        id,
        &endpoint_path[param_end..]
    )
}
