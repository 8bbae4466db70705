//! Application router configuration with protected and unprotected route definitions.

use axum::{
    Router, middleware,
    routing::{delete, get, post, put},
};

use crate::{
    AppState, Error,
    auth::auth_guard,
    category::{
        create_category_endpoint, delete_category_endpoint, list_categories_endpoint,
        update_category_endpoint,
    },
    endpoints,
    report::{export_report_csv, get_report_chart, get_report_summary},
    transaction::{
        create_transaction_endpoint, delete_transaction_endpoint, list_transactions_endpoint,
        update_transaction_endpoint,
    },
    user::{change_password, get_me, log_in, register_user, update_profile_endpoint},
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let unprotected_routes = Router::new()
        .route(endpoints::ROOT, get(get_root))
        .route(endpoints::REGISTER, post(register_user))
        .route(endpoints::LOG_IN, post(log_in));

    let protected_routes = Router::new()
        .route(endpoints::ME, get(get_me))
        .route(endpoints::UPDATE_PROFILE, put(update_profile_endpoint))
        .route(endpoints::CHANGE_PASSWORD, put(change_password))
        .route(endpoints::CREATE_CATEGORY, post(create_category_endpoint))
        .route(endpoints::LIST_CATEGORIES, get(list_categories_endpoint))
        .route(endpoints::UPDATE_CATEGORY, put(update_category_endpoint))
        .route(endpoints::DELETE_CATEGORY, delete(delete_category_endpoint))
        .route(
            endpoints::CREATE_TRANSACTION,
            post(create_transaction_endpoint),
        )
        .route(
            endpoints::LIST_TRANSACTIONS,
            get(list_transactions_endpoint),
        )
        .route(
            endpoints::UPDATE_TRANSACTION,
            put(update_transaction_endpoint),
        )
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .route(endpoints::REPORT_SUMMARY, get(get_report_summary))
        .route(endpoints::REPORT_CHART, get(get_report_chart))
        .route(endpoints::REPORT_EXPORT_CSV, get(export_report_csv))
        .layer(middleware::from_fn_with_state(state.clone(), auth_guard));

    protected_routes
        .merge(unprotected_routes)
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' tells clients that the server is up.
async fn get_root() -> &'static str {
    "Budget Buddy API is running"
}

async fn get_404_not_found() -> Error {
    Error::NotFound
}
