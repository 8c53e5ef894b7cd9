pub mod error;
pub use error::AppError;
pub mod formatters;
pub mod notify;
pub use notify::{Notification, Notifier, TracingNotifier};
pub mod validation;
