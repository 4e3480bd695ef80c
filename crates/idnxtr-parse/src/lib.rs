//! idnxtr-parse: PDF backend for idnxtr.
//!
//! Opens documents with lopdf, resolves page fonts and Form XObjects,
//! tokenizes page content streams, walks the text operators into positioned
//! runs and assembles them into page text
//! ([`PdfReader`]). Depends on idnxtr-core for shared types.

pub mod content;
pub mod error;
pub mod font;
pub mod lopdf_backend;
pub mod reader;
pub mod resources;
pub mod tokenizer;

pub use error::BackendError;
pub use idnxtr_core;
pub use lopdf_backend::LopdfDocument;
pub use reader::{PdfReader, content_to_string};
pub use resources::PageContent;
