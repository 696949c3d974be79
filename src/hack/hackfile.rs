//! Program images for the instruction store.
//!
//! Two forms are supported:
//! - `.hack` text: one word per line, 16 `0`/`1` characters, MSB first.
//!   Lines of any other length (blank lines, comments) are skipped.
//! - Binary: consecutive big-endian 16-bit words.

use std::path::Path;
use std::io::Write;
use thiserror::Error;
use tracing::{event, Level};
use crate::logic::{BusError, Word};
use crate::computer::ROM_WORDS;

/// Parse `.hack` text into words.
pub fn parse_hack(text: &str) -> Result<Vec<Word>, HackError> {
    let mut words = Vec::new();

    for (line_num, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.chars().count() != 16 {
            if !line.is_empty() {
                event!(Level::DEBUG, line = line_num + 1, "skipping non-word line");
            }
            continue;
        }

        let word = Word::from_bit_str(line).map_err(|e| HackError::Parse {
            line: line_num + 1,
            source: e,
        })?;
        words.push(word);
    }

    check_size(words)
}

/// Parse big-endian binary words.
pub fn parse_binary(bytes: &[u8]) -> Result<Vec<Word>, HackError> {
    if bytes.len() % 2 != 0 {
        return Err(HackError::OddLength(bytes.len()));
    }

    let words = bytes
        .chunks_exact(2)
        .map(|pair| Word::from_u16(u16::from_be_bytes([pair[0], pair[1]])))
        .collect();
    check_size(words)
}

/// Load a `.hack` text file.
pub fn load_hack<P: AsRef<Path>>(path: P) -> Result<Vec<Word>, HackError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    let words = parse_hack(&text)?;
    event!(Level::INFO, path = %path.as_ref().display(), words = words.len(), "loaded program");
    Ok(words)
}

/// Load a program, as text when the extension is `.hack` and as binary otherwise.
pub fn load_program<P: AsRef<Path>>(path: P) -> Result<Vec<Word>, HackError> {
    let path = path.as_ref();
    let is_text = path
        .extension()
        .map(|ext| ext.eq_ignore_ascii_case("hack"))
        .unwrap_or(false);

    if is_text {
        return load_hack(path);
    }

    let bytes = std::fs::read(path)?;
    let words = parse_binary(&bytes)?;
    event!(Level::INFO, path = %path.display(), words = words.len(), "loaded binary program");
    Ok(words)
}

/// Write words as `.hack` text.
pub fn save_hack<P: AsRef<Path>>(path: P, words: &[Word]) -> Result<(), HackError> {
    let mut file = std::io::BufWriter::new(std::fs::File::create(path.as_ref())?);
    for word in words {
        writeln!(file, "{}", word)?;
    }
    file.flush()?;
    Ok(())
}

fn check_size(words: Vec<Word>) -> Result<Vec<Word>, HackError> {
    if words.len() > ROM_WORDS {
        return Err(HackError::TooLarge { words: words.len() });
    }
    Ok(words)
}

/// Errors from loading or saving programs.
#[derive(Debug, Error)]
pub enum HackError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("parse error on line {line}: {source}")]
    Parse { line: usize, source: BusError },

    #[error("binary image has odd length {0}")]
    OddLength(usize),

    #[error("program has {words} words, ROM holds {max}", max = ROM_WORDS)]
    TooLarge { words: usize },
}
