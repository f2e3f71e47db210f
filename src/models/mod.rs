pub mod feedback;
pub mod user;

pub use feedback::Feedback;
pub use user::User;
