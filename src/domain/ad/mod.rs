//! Advertisement generation: ad copy plus an image-generation prompt.

pub mod dto;
pub mod handler;
pub mod prompt;
pub mod service;

pub use service::AdService;
