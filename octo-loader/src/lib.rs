//! # octo loader
//!
//! Reads program image files and turns them into the dense byte sequence
//! the engine loads at address 0. The image format is text: one 8-bit
//! binary literal per line, `#` comments, blank lines ignored, and
//! unparseable lines skipped without consuming an address.
//!
//! The loader sits outside the core: its errors terminate the process
//! before the engine runs, and the engine only ever sees raw bytes.

pub mod lexer;
pub mod image;
pub mod error;

pub use error::LoaderError;
pub use image::{parse_image, read_image};
