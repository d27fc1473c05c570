use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid position '{0}'. Expected a positive integer (e.g., '10,25,100').")]
    InvalidPosition(String),

    #[error("No positions given. Expected a comma-separated list (e.g., '10,25,100').")]
    EmptyPositions,

    #[error("Invalid --set format: '{0}'. Expected KEY=VALUE.")]
    InvalidAssignment(String),

    #[error("Launcher command cannot be empty.")]
    EmptyLauncher,
}

/// Parses a comma-separated list of 1-based residue positions.
///
/// Whitespace around entries is ignored; empty entries (e.g. a trailing comma) are
/// skipped. Range checks against the sequence happen later.
pub fn parse_positions(list: &str) -> Result<Vec<usize>, ParseError> {
    let positions = list
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse::<usize>()
                .map_err(|_| ParseError::InvalidPosition(s.to_string()))
        })
        .collect::<Result<Vec<_>, _>>()?;

    if positions.is_empty() {
        return Err(ParseError::EmptyPositions);
    }
    Ok(positions)
}

/// Splits a `KEY=VALUE` override into its parts.
pub fn parse_assignment(pair: &str) -> Result<(&str, &str), ParseError> {
    match pair.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => Ok((key.trim(), value.trim())),
        _ => Err(ParseError::InvalidAssignment(pair.to_string())),
    }
}

/// Splits a launcher prefix such as `"mamba run -n boltz"` into program and arguments.
pub fn parse_launcher(command: &str) -> Result<Vec<String>, ParseError> {
    let parts: Vec<String> = command.split_whitespace().map(str::to_string).collect();
    if parts.is_empty() {
        return Err(ParseError::EmptyLauncher);
    }
    Ok(parts)
}
