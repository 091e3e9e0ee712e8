//! Offer generation: prompt assembly, generation and RTL normalization.

pub mod category;
pub mod date;
pub mod dto;
pub mod enhance;
pub mod handler;
pub mod normalizer;
pub mod prompt;
pub mod service;

pub use normalizer::TextNormalizer;
pub use service::OfferService;
