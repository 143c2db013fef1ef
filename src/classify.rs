//! Field extraction from whitespace-tokenized log lines.

use crate::SeverityLevel;

/// The first token that is exactly one of the severity level literals.
pub fn extract_level(tokens: &[&str]) -> Option<SeverityLevel> {
    tokens.iter().find_map(|token| SeverityLevel::from_token(token))
}

/// The first token that both starts and ends with `/`. A lone `/` counts.
pub fn extract_endpoint<'a>(tokens: &[&'a str]) -> Option<&'a str> {
    tokens.iter().copied().find(|token| token.starts_with('/') && token.ends_with('/'))
}

/// Split a line on whitespace and pull out the endpoint and level, if the line has both.
pub fn classify_line(line: &str) -> Option<(&str, SeverityLevel)> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    Some((extract_endpoint(&tokens)?, extract_level(&tokens)?))
}
