//! Typed errors for the listing parser

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParsingError {
    #[error("failed to compile selector '{selector}': {message}")]
    SelectorCompile { selector: String, message: String },

    #[error("failed to resolve image URL '{url}': {reason}")]
    UrlResolution { url: String, reason: String },

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}

pub type ParsingResult<T> = Result<T, ParsingError>;
