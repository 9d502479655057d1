pub mod client;
pub mod error;
pub mod http;
pub mod mock;
pub mod wire;

pub use client::ChatBackend;
pub use error::BackendError;
pub use http::HttpBackend;
pub use wire::{ChatRequest, ChatResponse, FileUpload, SummaryRequest};
