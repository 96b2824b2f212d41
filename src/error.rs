use thiserror::Error;

/// Fatal parse failures
///
/// Recoverable conditions (a malformed data row, an unsupported `fix`
/// statement) are logged and skipped instead of surfacing here.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("unrecognized statement: `{0}`")]
    UnrecognizedStatement(String),

    #[error("malformed table `{name}`: {detail}")]
    MalformedTable { name: String, detail: String },

    #[error("bad numeric token `{token}` in {context}")]
    BadToken { token: String, context: String },

    #[error("no data rows for `{0}`")]
    EmptyTable(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ParseError {
    pub(crate) fn bad_token(token: &str, context: &str) -> Self {
        ParseError::BadToken {
            token: token.to_string(),
            context: context.to_string(),
        }
    }

    pub(crate) fn malformed(name: &str, detail: &str) -> Self {
        ParseError::MalformedTable {
            name: name.to_string(),
            detail: detail.to_string(),
        }
    }
}
