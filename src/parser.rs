use std::fs::File;
use std::io::Read;
use std::path::Path;

use log::debug;

use crate::error::StatsError;

/// Outcome of coercing a single whitespace-separated token.
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    Number(f64),
    /// Token failed to parse but its ASCII digits form a number.
    Salvaged(&'a str, f64),
    Invalid(&'a str),
}

impl<'a> Token<'a> {
    pub fn classify(raw: &'a str) -> Token<'a> {
        match raw.parse::<f64>() {
            Ok(value) if value.is_finite() => Token::Number(value),
            _ => {
                let digits = raw
                    .chars()
                    .filter(char::is_ascii_digit)
                    .collect::<String>();
                // a digit run too long for f64 is dropped like any other invalid token
                match digits.parse::<f64>() {
                    Ok(value) if value.is_finite() => Token::Salvaged(raw, value),
                    _ => Token::Invalid(raw),
                }
            }
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct ParsedData {
    pub values: Vec<f64>,
    pub salvaged: Vec<String>,
    pub invalid: Vec<String>,
}

impl ParsedData {
    pub fn from_text(text: &str) -> ParsedData {
        let mut data = ParsedData::default();
        for raw in text.split_whitespace() {
            match Token::classify(raw) {
                Token::Number(value) => data.values.push(value),
                Token::Salvaged(raw, value) => {
                    data.values.push(value);
                    data.salvaged.push(raw.to_owned());
                }
                Token::Invalid(raw) => data.invalid.push(raw.to_owned()),
            }
        }
        debug!(
            "parsed {} values ({} salvaged), dropped {} invalid tokens",
            data.values.len(),
            data.salvaged.len(),
            data.invalid.len()
        );
        data
    }
}

pub fn read_data(path: &Path) -> Result<ParsedData, StatsError> {
    let mut bytes = Vec::new();
    File::open(path)
        .and_then(|mut file| file.read_to_end(&mut bytes))
        .map_err(|e| StatsError::from_read(path.to_owned(), e))?;

    let text = String::from_utf8(bytes).map_err(|_| StatsError::Encoding {
        path: path.to_owned(),
    })?;

    Ok(ParsedData::from_text(&text))
}
