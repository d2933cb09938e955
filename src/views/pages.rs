use askama::Template;

#[derive(Template)]
#[template(path = "not_found.html")]
pub struct NotFoundView;

/// A blocking message for failures the user cannot fix from the form.
#[derive(Template)]
#[template(path = "alert.html")]
pub struct AlertView {
    message: String,
}

impl AlertView {
    pub fn new(message: impl Into<String>) -> Self {
        AlertView {
            message: message.into(),
        }
    }

    pub fn generic() -> Self {
        Self::new("Something went wrong!")
    }
}
