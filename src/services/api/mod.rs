mod client;
mod errors;
mod retry;

pub use client::ApiClient;
pub use errors::ApiError;
pub use retry::RetryPolicy;
