pub mod articles;
pub mod auth;
pub mod history;
pub mod pagination;
pub mod tasks;
pub mod users;
