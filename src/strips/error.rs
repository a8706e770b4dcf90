use std::fmt;

use super::parser::{self, Position};

/// Failure to load a domain or a problem. Always fatal for the run.
#[derive(Debug)]
pub enum Error {
    Io(String, std::io::Error),
    Parse { path: String, source: String, errors: Vec<parser::Error> },
    Json(String, serde_json::Error),
    Invalid(String, String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(path, e) => write!(f, "{}: {}", path, e),
            Self::Json(path, e) => write!(f, "{}: invalid JSON: {}", path, e),
            Self::Invalid(path, message) => write!(f, "{}: {}", path, message),
            Self::Parse { path, source, errors } => {
                let lines: Vec<&str> = source.lines().collect();
                for e in errors {
                    match e.pos {
                        Position::Span(span) => {
                            writeln!(f, "{}:{} Error:", path, span.line)?;
                            if let Some(eline) = lines.get(span.line.saturating_sub(1)) {
                                let line_number_string = format!("{}", span.line);
                                writeln!(f, "\t{}: {}", line_number_string, eline)?;
                                let debug_str_col_pos = line_number_string.len() + 2 + span.col;
                                writeln!(f, "\t{:->width$} {}", '^', e.message, width = debug_str_col_pos)?;
                            }
                        }
                        Position::EOF => writeln!(f, "{}: unexpected end of input: {}", path, e.message)?,
                    }
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(_, e) => Some(e),
            Self::Json(_, e) => Some(e),
            _ => None,
        }
    }
}
