use crate::db::models::Choice;
use crate::projection::{ChoiceCollection, RankedChoices};
use askama::Template;

#[derive(Template)]
#[template(path = "top_choices.html")]
struct TopChoicesTemplate<'a> {
    choices: Vec<&'a Choice>,
}

/// Renders the ranked projection, re-rendering only after the projection
/// reports a change.
pub struct TopChoicesView {
    ranked: RankedChoices,
    rendered: Option<String>,
}

impl TopChoicesView {
    pub fn new(source: &ChoiceCollection) -> Self {
        TopChoicesView {
            ranked: RankedChoices::new(source),
            rendered: None,
        }
    }

    pub fn refresh(&mut self, source: &ChoiceCollection) -> bool {
        let changed = self.ranked.sync(source);
        if changed {
            self.rendered = None;
        }
        changed
    }

    pub fn ranked(&self) -> &RankedChoices {
        &self.ranked
    }

    pub fn render(&mut self, source: &ChoiceCollection) -> askama::Result<String> {
        self.refresh(source);
        if let Some(html) = &self.rendered {
            return Ok(html.clone());
        }

        let html = TopChoicesTemplate {
            choices: self.ranked.iter().collect(),
        }
        .render()?;
        self.rendered = Some(html.clone());
        Ok(html)
    }
}
