pub mod auth;
pub mod intervals;
pub mod items;
