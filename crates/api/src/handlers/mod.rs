pub mod admin;
pub mod audit;
pub mod auth;
pub mod backups;
pub mod dashboard;
pub mod devices;
pub mod health;
pub mod permissions;
pub mod registration;
pub mod tickets;
