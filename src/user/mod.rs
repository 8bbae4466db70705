//! Users: registration, logging in and managing the logged-in user's profile.

mod db;
mod domain;
mod log_in;
mod profile;
mod register;

pub use db::{
    create_user, create_user_table, get_user_by_email, get_user_by_id, update_password,
    update_profile,
};
pub use domain::{User, UserID, UserProfile, Username, parse_email};
pub use log_in::log_in;
pub use profile::{MessageResponse, change_password, get_me, update_profile_endpoint};
pub use register::register_user;
