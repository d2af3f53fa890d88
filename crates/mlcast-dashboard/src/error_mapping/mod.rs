//! Maps crate errors to mlcast_core::AppError for consistent user-facing messages.
//! One module per source crate keeps each mapping small.

mod forecast;
mod ingest;
