//! Utility modules.

pub mod file;
pub mod id;
pub mod retry;
#[cfg(test)]
pub mod test_server;

pub use file::{
    ReadOutcome, extension_of, first_segment, is_plain_relative, normalize_relative,
    read_file_content,
};
pub use id::{SHORT_ID_LEN, short_id};
pub use retry::{RetryConfig, RetryResult, Retryable, with_retry};
