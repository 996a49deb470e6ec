//! Application services for the catalog: the hosted store seams, the storefront and admin
//! services built on them, user profiles, configuration and logging.

pub mod admin;
pub mod auth;
pub mod config;
pub mod context;
pub mod logging;
pub mod profiles;
pub mod store;
pub mod storefront;

#[cfg(test)]
mod test;
