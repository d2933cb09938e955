use crate::views::{AlertView, NotFoundView};
use askama::Template;
use axum::{
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Name can't be blank.")]
    BlankPollName,
    #[error("Choice can't be blank.")]
    BlankChoiceName,
    #[error("Need a poll ID!")]
    MissingPollId,
    #[error("That name is already taken.")]
    DuplicateChoiceName,
}

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Corrupt record: {0}")]
    Corrupt(#[from] serde_json::Error),
}

#[derive(Error, Debug)]
pub enum PollError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("Poll not found")]
    PollNotFound,
    #[error("Choice not found")]
    ChoiceNotFound,
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error("Render error: {0}")]
    Render(#[from] askama::Error),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

impl IntoResponse for PollError {
    fn into_response(self) -> Response {
        let status = match &self {
            PollError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            PollError::PollNotFound | PollError::ChoiceNotFound => StatusCode::NOT_FOUND,
            PollError::Storage(_) | PollError::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let page = match &self {
            PollError::PollNotFound | PollError::ChoiceNotFound => NotFoundView.render(),
            PollError::Validation(e) => AlertView::new(e.to_string()).render(),
            PollError::Storage(e) => {
                error!("storage failure: {e}");
                AlertView::generic().render()
            }
            PollError::Render(e) => {
                error!("template failure: {e}");
                AlertView::generic().render()
            }
        };

        match page {
            Ok(body) => (status, Html(body)).into_response(),
            Err(e) => {
                error!("failed to render error page: {e}");
                (status, self.to_string()).into_response()
            }
        }
    }
}
