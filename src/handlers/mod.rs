pub mod auth;
pub mod catalog;
pub mod players;
pub mod portal;
