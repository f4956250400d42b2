use awc::error::SendRequestError as ActixError;
use brownie::Error as BrownieError;
use std::error::Error;
use std::fmt::Display;
use std::fmt::Formatter;
use std::fmt::Result;
use std::io;
use std::num::ParseIntError;
use std::path::PathBuf;
use std::process::ExitStatus;

#[derive(Debug)]
pub enum NodeError {
    FailedToSend(ActixError),
    BadResponse(String),
    /// The node answered with a non success status code
    ApiError {
        status: u16,
        body: String,
    },
    Json(serde_json::Error),
    Config(String),
    Compiler {
        command: String,
        status: ExitStatus,
    },
    Io {
        path: PathBuf,
        source: io::Error,
    },
    TransactionTimeout {
        hash: String,
    },
    TransactionFailed {
        hash: String,
        vm_status: String,
    },
    Brownie(BrownieError),
}

impl From<ParseIntError> for NodeError {
    fn from(error: ParseIntError) -> Self {
        NodeError::BadResponse(format!("{error}"))
    }
}

impl From<serde_json::Error> for NodeError {
    fn from(error: serde_json::Error) -> Self {
        NodeError::Json(error)
    }
}

impl From<BrownieError> for NodeError {
    fn from(error: BrownieError) -> Self {
        NodeError::Brownie(error)
    }
}

impl Display for NodeError {
    fn fmt(&self, f: &mut Formatter) -> Result {
        match self {
            NodeError::FailedToSend(val) => write!(f, "Node failed to send {val}"),
            NodeError::BadResponse(val) => write!(f, "Node bad response {val}"),
            NodeError::ApiError { status, body } => {
                write!(f, "Node responded with status {status}: {body}")
            }
            NodeError::Json(val) => write!(f, "JSON error {val}"),
            NodeError::Config(val) => write!(f, "Configuration error {val}"),
            NodeError::Compiler { command, status } => {
                write!(f, "`{command}` exited with {status}")
            }
            NodeError::Io { path, source } => {
                write!(f, "Failed to access {}: {source}", path.display())
            }
            NodeError::TransactionTimeout { hash } => {
                write!(f, "Transaction {hash} did not leave the pending state in time")
            }
            NodeError::TransactionFailed { hash, vm_status } => {
                write!(f, "Transaction {hash} failed with {vm_status}")
            }
            NodeError::Brownie(val) => write!(f, "{val}"),
        }
    }
}

impl Error for NodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            NodeError::Json(e) => Some(e),
            NodeError::Io { source, .. } => Some(source),
            NodeError::Brownie(e) => Some(e),
            _ => None,
        }
    }
}
