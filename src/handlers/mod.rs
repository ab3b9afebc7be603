pub mod admin;
pub mod auth;
pub mod google_oauth;
pub mod pages;
pub mod projects;
pub mod public;
