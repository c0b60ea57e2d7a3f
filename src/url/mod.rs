//! URL handling module for Docmap
//!
//! This module provides URL normalization, domain extraction and the static
//! admission filter applied to seeds and discovered links.

mod domain;
mod filter;
mod normalize;

pub use domain::extract_domain;
pub use filter::{check_admission, Rejection};
pub use normalize::normalize_url;
