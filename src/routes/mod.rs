pub mod auth;
pub mod user;
pub mod booking;
pub mod engagement;
pub mod hotel;
pub mod location;
pub mod package;
pub mod event;
pub mod culture;
pub mod review;
pub mod admin;
