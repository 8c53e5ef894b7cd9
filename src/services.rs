pub mod api_client;
pub use api_client::ApiClient;
pub mod auth;
pub use auth::AuthService;
pub mod status_service;
pub use status_service::StatusService;
pub mod onboarding_service;
pub use onboarding_service::{GateState, OnboardingGate};
pub mod subscription_service;
pub use subscription_service::SubscriptionService;
