//! Profile completion: the orchestrating service and its request extractor.

pub mod request;
pub mod service;

pub use request::CompletionRequest;
pub use service::CompletionService;
