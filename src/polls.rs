use crate::error::PollError;
use crate::startup::AppState;
use crate::views::{NotFoundView, PollAddView, PollDetailView};
use askama::Template;
use axum::{
    extract::{Extension, Form, Path},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
};
use serde::Deserialize;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreatePollForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct AddChoiceForm {
    #[serde(default)]
    pub choice: String,
}

/// Front page: existing polls and the creation form
pub async fn poll_add(
    Extension(app_state): Extension<AppState>,
) -> Result<impl IntoResponse, PollError> {
    let view = PollAddView::load(&app_state.polls).await?;
    debug!(polls = view.polls().len(), "rendering front page");
    Ok(Html(view.render()?))
}

/// Create a poll and navigate to it
pub async fn create_poll(
    Extension(app_state): Extension<AppState>,
    Form(payload): Form<CreatePollForm>,
) -> Result<Response, PollError> {
    let _writes = app_state.writes.lock().await;

    let mut view = PollAddView::load(&app_state.polls).await?;
    match view.add_poll(&app_state.polls, &payload.name).await? {
        Some(poll) => Ok(Redirect::to(&poll.url()).into_response()),
        None => {
            debug!(error = view.error(), "poll form rejected");
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(view.render()?)).into_response())
        }
    }
}

/// Show a poll with its choices and the ranked list
pub async fn poll_show(
    Extension(app_state): Extension<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse, PollError> {
    let poll = app_state.polls.find_by_slug(&slug).await?;
    let mut view = PollDetailView::load(poll, &app_state.choices).await?;
    debug!(slug = %slug, choices = view.choices().len(), "rendering poll");
    Ok(Html(view.render()?))
}

/// Add a choice to a poll
pub async fn add_choice(
    Extension(app_state): Extension<AppState>,
    Path(slug): Path<String>,
    Form(payload): Form<AddChoiceForm>,
) -> Result<Response, PollError> {
    let _writes = app_state.writes.lock().await;

    let poll = app_state.polls.find_by_slug(&slug).await?;
    let mut view = PollDetailView::load(poll, &app_state.choices).await?;
    match view.add_choice(&app_state.choices, &payload.choice).await? {
        Some(_) => Ok(Redirect::to(&view.poll().url()).into_response()),
        None => {
            debug!(error = view.form_error(), "choice form rejected");
            Ok((StatusCode::UNPROCESSABLE_ENTITY, Html(view.render()?)).into_response())
        }
    }
}

/// Path ids that are not UUIDs name no choice.
fn parse_choice_id(raw: &str) -> Result<Uuid, PollError> {
    Uuid::parse_str(raw).map_err(|_| PollError::ChoiceNotFound)
}

/// Add one vote to a choice
pub async fn vote_choice(
    Extension(app_state): Extension<AppState>,
    Path((slug, choice_id)): Path<(String, String)>,
) -> Result<Response, PollError> {
    let choice_id = parse_choice_id(&choice_id)?;
    let _writes = app_state.writes.lock().await;

    let poll = app_state.polls.find_by_slug(&slug).await?;
    let mut view = PollDetailView::load(poll, &app_state.choices).await?;
    view.vote(&app_state.choices, choice_id).await?;
    if let Some(leader) = view.ranked().iter().next() {
        debug!(leader = %leader.name, votes = leader.votes, "ranking updated");
    }
    Ok(Redirect::to(&view.poll().url()).into_response())
}

/// Remove a choice from a poll
pub async fn remove_choice(
    Extension(app_state): Extension<AppState>,
    Path((slug, choice_id)): Path<(String, String)>,
) -> Result<Response, PollError> {
    let choice_id = parse_choice_id(&choice_id)?;
    let _writes = app_state.writes.lock().await;

    let poll = app_state.polls.find_by_slug(&slug).await?;
    let mut view = PollDetailView::load(poll, &app_state.choices).await?;
    view.remove_choice(&app_state.choices, choice_id).await?;
    Ok(Redirect::to(&view.poll().url()).into_response())
}

pub async fn handler_404() -> Response {
    match NotFoundView.render() {
        Ok(body) => (StatusCode::NOT_FOUND, Html(body)).into_response(),
        Err(e) => PollError::from(e).into_response(),
    }
}

#[cfg(test)]
mod tests {
    use crate::db::connection::{DbPool, test_pool};
    use crate::db::models::{Choice, Poll};
    use crate::db::repositories::{ChoiceStore, RecordStore};
    use crate::startup::{AppState, build_router};
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode, header},
    };
    use tower::ServiceExt;

    struct TestApp {
        router: Router,
        records: RecordStore,
        pool: DbPool,
    }

    impl TestApp {
        async fn new() -> Self {
            let pool = test_pool().await;
            let records = RecordStore::new(pool.clone());
            let state = AppState::new(pool.clone()).await.unwrap();
            TestApp {
                router: build_router(state),
                records,
                pool,
            }
        }

        async fn send(&self, request: Request<Body>) -> (StatusCode, Option<String>, String) {
            let response = self.router.clone().oneshot(request).await.unwrap();
            let status = response.status();
            let location = response
                .headers()
                .get(header::LOCATION)
                .map(|v| v.to_str().unwrap().to_string());
            let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
                .await
                .unwrap();
            (status, location, String::from_utf8(bytes.to_vec()).unwrap())
        }

        async fn get(&self, uri: &str) -> (StatusCode, Option<String>, String) {
            self.send(Request::get(uri).body(Body::empty()).unwrap())
                .await
        }

        async fn post(&self, uri: &str, body: &str) -> (StatusCode, Option<String>, String) {
            let request = Request::post(uri)
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from(body.to_string()))
                .unwrap();
            self.send(request).await
        }

        async fn record_count(&self) -> i64 {
            self.records.count::<Poll>().await.unwrap() + self.records.count::<Choice>().await.unwrap()
        }
    }

    #[tokio::test]
    async fn create_poll_add_choice_and_see_it_ranked() {
        let app = TestApp::new().await;

        let (status, location, _) = app.post("/polls", "name=My+Poll").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/poll/my-poll"));

        let (status, _, body) = app.get("/poll/my-poll").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("<h1>My Poll</h1>"));

        let (status, location, _) = app.post("/poll/my-poll/choices", "choice=Red").await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/poll/my-poll"));

        let (_, _, body) = app.get("/poll/my-poll").await;
        assert!(body.contains("<li>Red (0)</li>"));
    }

    #[tokio::test]
    async fn front_page_lists_created_polls() {
        let app = TestApp::new().await;
        app.post("/polls", "name=Lunch").await;

        let (status, _, body) = app.get("/").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.contains(r#"<a href="/poll/lunch">Lunch</a>"#));
    }

    #[tokio::test]
    async fn blank_poll_name_renders_inline_error() {
        let app = TestApp::new().await;

        let (status, _, body) = app.post("/polls", "name=+++").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains(r#"<div class="error">"#));
        assert!(body.contains("be blank."));
        assert_eq!(app.record_count().await, 0);
    }

    #[tokio::test]
    async fn unknown_slug_is_not_found_and_mutates_nothing() {
        let app = TestApp::new().await;
        app.post("/polls", "name=Lunch").await;
        let before = app.record_count().await;

        let (status, _, body) = app.get("/poll/does-not-exist").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains(r#"Not found. <a href="/">back</a>"#));

        let (status, _, _) = app.post("/poll/does-not-exist/choices", "choice=Red").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(app.record_count().await, before);
    }

    #[tokio::test]
    async fn duplicate_choice_is_rejected() {
        let app = TestApp::new().await;
        app.post("/polls", "name=Colours").await;
        app.post("/poll/colours/choices", "choice=Red").await;

        let (status, _, body) = app.post("/poll/colours/choices", "choice=Red").await;

        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(body.contains("That name is already taken."));
        assert_eq!(app.records.count::<Choice>().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn voting_reorders_the_ranked_list() {
        let app = TestApp::new().await;
        app.post("/polls", "name=Colours").await;
        app.post("/poll/colours/choices", "choice=Red").await;
        app.post("/poll/colours/choices", "choice=Blue").await;
        let choices: Vec<Choice> = app.records.all().await.unwrap();
        let blue = choices.iter().find(|c| c.name == "Blue").unwrap();

        let (status, location, _) = app
            .post(&format!("/poll/colours/choices/{}/vote", blue.id), "")
            .await;
        assert_eq!(status, StatusCode::SEE_OTHER);
        assert_eq!(location.as_deref(), Some("/poll/colours"));

        let (_, _, body) = app.get("/poll/colours").await;
        let blue_at = body.find("<li>Blue (1)</li>").unwrap();
        let red_at = body.find("<li>Red (0)</li>").unwrap();
        assert!(blue_at < red_at);
    }

    #[tokio::test]
    async fn removing_a_choice_deletes_it() {
        let app = TestApp::new().await;
        app.post("/polls", "name=Colours").await;
        app.post("/poll/colours/choices", "choice=Red").await;
        let poll_id = app.records.all::<Poll>().await.unwrap()[0].id;
        let red = ChoiceStore::new(app.records.clone())
            .fetch_for_poll(poll_id)
            .await
            .unwrap()
            .remove(0);

        let (status, _, _) = app
            .post(&format!("/poll/colours/choices/{}/delete", red.id), "")
            .await;
        assert_eq!(status, StatusCode::SEE_OTHER);

        let (_, _, body) = app.get("/poll/colours").await;
        assert!(!body.contains("Red"));
        assert_eq!(app.records.count::<Choice>().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn voting_on_an_unknown_choice_is_not_found() {
        let app = TestApp::new().await;
        app.post("/polls", "name=Colours").await;

        let uri = format!("/poll/colours/choices/{}/vote", uuid::Uuid::new_v4());
        let (status, _, _) = app.post(&uri, "").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn malformed_choice_id_renders_the_not_found_page() {
        let app = TestApp::new().await;
        app.post("/polls", "name=Colours").await;

        for action in ["vote", "delete"] {
            let uri = format!("/poll/colours/choices/not-a-uuid/{action}");
            let (status, _, body) = app.post(&uri, "").await;
            assert_eq!(status, StatusCode::NOT_FOUND);
            assert!(body.contains("Not found."));
        }
    }

    #[tokio::test]
    async fn storage_failure_renders_the_alert_page() {
        let app = TestApp::new().await;
        sqlx::query("INSERT INTO records (collection, id, data) VALUES ('Polls', 'x', 'not json')")
            .execute(&app.pool)
            .await
            .unwrap();

        let (status, _, body) = app.get("/").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.contains(r#"<div class="alert" role="alert">Something went wrong!</div>"#));
    }

    #[tokio::test]
    async fn unmatched_routes_fall_back_to_not_found() {
        let app = TestApp::new().await;

        let (status, _, body) = app.get("/nothing/here").await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.contains("Not found."));
    }
}
