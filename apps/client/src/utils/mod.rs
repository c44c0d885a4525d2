pub mod retry;

pub use retry::{retry_until_some, RetryTimeout};
