#[cfg(test)]
pub mod common;
mod token_refresh_and_retry;
