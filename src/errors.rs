use axum::http::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("week index {0} is out of range")]
    WeekOutOfRange(usize),
    #[error("day index {0} is out of range")]
    DayOutOfRange(usize),
    #[error("week {week} has day labels out of order")]
    LabelOrder { week: usize },
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("document io failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("document encoding failed: {0}")]
    Encoding(#[from] serde_json::Error),
    #[error("invalid document key {0:?}")]
    InvalidKey(String),
    #[error("malformed document: {0}")]
    Malformed(#[from] TrackerError),
}

#[derive(Debug, Error)]
pub enum AuthError {
    #[error("sign-in rejected: {0}")]
    Rejected(String),
    #[error("session for {0} did not load in time")]
    LoadTimeout(String),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("not signed in")]
    NotSignedIn,
    #[error(transparent)]
    Auth(#[from] AuthError),
    #[error("failed to load tracker: {0}")]
    Load(StoreError),
    #[error("failed to save tracker: {0}")]
    Save(StoreError),
    #[error(transparent)]
    Tracker(#[from] TrackerError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value {value:?} for {key}")]
    Invalid { key: &'static str, value: String },
}

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<SessionError> for AppError {
    fn from(err: SessionError) -> Self {
        let status = match &err {
            SessionError::NotSignedIn | SessionError::Auth(_) => StatusCode::UNAUTHORIZED,
            SessionError::Tracker(_) => StatusCode::BAD_REQUEST,
            SessionError::Load(_) | SessionError::Save(_) => StatusCode::SERVICE_UNAVAILABLE,
        };
        Self {
            status,
            message: err.to_string(),
        }
    }
}

impl axum::response::IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        (self.status, self.message).into_response()
    }
}
