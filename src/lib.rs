pub mod config;
pub mod db;
pub mod error;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod session;
pub mod views;


pub use handlers::AppState;
pub use routes::app;
