use crate::db::models::Choice;
use askama::Template;

/// One entry of a poll's choice list.
#[derive(Template)]
#[template(path = "choice_item.html")]
pub struct ChoiceItemView<'a> {
    choice: &'a Choice,
    base: String,
}

impl<'a> ChoiceItemView<'a> {
    pub fn new(poll_url: &str, choice: &'a Choice) -> Self {
        ChoiceItemView {
            choice,
            base: format!("{}/choices/{}", poll_url, choice.id),
        }
    }
}
