pub mod password_service;
pub mod session_service;

pub use password_service::PasswordService;
pub use session_service::SessionService;
