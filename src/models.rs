pub mod auth;
pub use auth::SellerContext;
pub mod seller;
pub use seller::SellerStatus;
pub mod billing;
pub use billing::{SubmissionResult, SubscriptionPayload};
