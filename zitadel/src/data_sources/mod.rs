//! Data source implementations

pub mod human_user;

pub use human_user::HumanUserDataSource;
