//! Program image parsing
//!
//! Turns image text into the dense byte sequence the engine loads at
//! address 0. Parsing is deliberately lenient: a line contributes a byte
//! only when it holds exactly one well-formed binary literal, and every
//! other line is skipped without consuming an address.

use crate::error::LoaderError;
use crate::lexer::Token;
use logos::Logos;
use octo_spec::MEMORY_SIZE;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;

/// Parse image text into program bytes.
///
/// Never fails: unparseable lines are silently skipped per the format's
/// leniency contract, so addresses advance only on successful parses.
pub fn parse_image(source: &str) -> Vec<u8> {
    let mut bytes = Vec::new();
    // One entry per token on the current line; None marks junk
    let mut line: Vec<Option<String>> = Vec::new();

    for token in Token::lexer(source) {
        match token {
            Ok(Token::Newline) => flush_line(&mut line, &mut bytes),
            Ok(Token::Bits(bits)) => line.push(Some(bits)),
            Err(_) => line.push(None),
        }
    }
    flush_line(&mut line, &mut bytes);

    bytes
}

fn flush_line(line: &mut Vec<Option<String>>, bytes: &mut Vec<u8>) {
    if let [Some(bits)] = line.as_slice() {
        if let Ok(byte) = u8::from_str_radix(bits, 2) {
            bytes.push(byte);
        }
    }
    line.clear();
}

/// Read and parse a program image file.
///
/// A missing file maps to [`LoaderError::ProgramNotFound`]; an image larger
/// than memory is rejected here rather than halfway through a load.
pub fn read_image(path: impl AsRef<Path>) -> Result<Vec<u8>, LoaderError> {
    let path = path.as_ref();
    let source = fs::read_to_string(path).map_err(|err| {
        if err.kind() == ErrorKind::NotFound {
            LoaderError::ProgramNotFound {
                path: path.display().to_string(),
            }
        } else {
            LoaderError::Io(err)
        }
    })?;

    let bytes = parse_image(&source);
    if bytes.len() > MEMORY_SIZE {
        return Err(LoaderError::ImageTooLarge { len: bytes.len() });
    }
    Ok(bytes)
}
