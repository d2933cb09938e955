use crate::db::models::NewChoice;
use askama::Template;

#[derive(Template)]
#[template(path = "choice_add.html")]
struct ChoiceAddTemplate<'a> {
    action: &'a str,
    error: Option<&'a str>,
}

/// The add-choice form on a poll's page.
pub struct ChoiceAddView {
    action: String,
    error: Option<String>,
}

impl ChoiceAddView {
    pub fn new(action: String) -> Self {
        ChoiceAddView {
            action,
            error: None,
        }
    }

    /// Turns a form submission into an unsaved candidate and clears the form.
    /// The candidate has no poll yet; the owning page assigns it.
    pub fn submit(&mut self, raw_name: &str) -> NewChoice {
        self.error = None;
        NewChoice {
            poll_id: None,
            name: raw_name.trim().to_string(),
        }
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.error = Some(message.into());
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn render(&self) -> askama::Result<String> {
        ChoiceAddTemplate {
            action: &self.action,
            error: self.error(),
        }
        .render()
    }
}
