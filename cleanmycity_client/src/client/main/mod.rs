mod auth;
mod core;
mod utils;


pub use core::SessionClient;
