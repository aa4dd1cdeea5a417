use std::env;
use std::fmt::Debug;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Error {
    pub code: i32,
    pub message: String,
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "error {}: {}", self.code, self.message)
    }
}

impl std::error::Error for Error {}

impl From<env::VarError> for Error {
    fn from(err: env::VarError) -> Self {
        env_var_error(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        service_error(err)
    }
}

pub fn env_var_error(_: env::VarError) -> Error {
    Error {
        code: 1,
        message: "environment variable error".into(),
    }
}

// transport failure, timeout, non-2xx status or malformed payload
pub fn service_error<T: Debug>(err: T) -> Error {
    tracing::warn!(?err, "upstream service error");

    Error {
        code: 3,
        message: "service error".into(),
    }
}

pub fn invalid_invocation_error() -> Error {
    Error {
        code: 100,
        message: "invalid invocation".into(),
    }
}

pub fn blank_input_error() -> Error {
    Error {
        code: 101,
        message: "blank input".into(),
    }
}

pub fn invalid_input_error() -> Error {
    Error {
        code: 102,
        message: "invalid input".into(),
    }
}

pub fn permission_denied_error() -> Error {
    Error {
        code: 103,
        message: "location permission denied".into(),
    }
}
