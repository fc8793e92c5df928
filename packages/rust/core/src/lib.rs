//! Core profile pipeline for ProfileScout.
//!
//! This crate ties the source readers, field resolution, contact extraction
//! and response assembly into one pass over a page snapshot (`extract`), plus
//! the async entry point that fetches the page first (`scrape_profile`).

pub mod assembler;
pub mod contacts;
pub mod pipeline;
pub mod resolver;

pub use assembler::{FailureReply, ProfileReply, ProfileResponse, UNAVAILABLE_MESSAGE, assemble};
pub use contacts::{extract_contacts, normalize_phone};
pub use pipeline::{Extraction, extract, scrape_profile};
pub use resolver::{FieldPolicy, free_text_corpus, resolve};
