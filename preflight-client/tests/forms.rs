mod common;

use preflight_client::{ClientError, StatusCode};
use preflight_form_types::{
    FieldValue, FormBlock, PageAnswers, RunId, RunStatus, answers_to_form_answers,
};

#[tokio::test]
async fn fetches_form_definition() {
    let (api, state) = common::spawn().await;

    let form = api
        .forms()
        .get_form_definition("ai-readiness", None)
        .await
        .unwrap();
    assert_eq!(form.id, "ai-readiness");
    assert_eq!(form.meta.version, "1.0.0");
    assert_eq!(form.pages.len(), 2);
    assert!(matches!(form.pages[0].blocks[0], FormBlock::Text(_)));

    let auth = state.lock().unwrap().seen_auth.clone();
    assert_eq!(auth, vec![Some(format!("Bearer {}", common::TOKEN))]);
}

#[tokio::test]
async fn unknown_form_is_a_404_with_nested_detail() {
    let (api, _) = common::spawn().await;

    let err = api
        .forms()
        .get_form_definition("missing", Some("2.0.0"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));

    let ClientError::Api(api_err) = err else {
        panic!("expected an API error");
    };
    assert_eq!(api_err.detail().as_deref(), Some("Form 'missing' not found"));
    assert!(api_err.to_string().starts_with("API request failed: 404 Not Found"));
}

#[tokio::test]
async fn saving_a_page_twice_keeps_the_second_answers() {
    let (api, _) = common::spawn().await;
    let forms = api.forms();

    let run = forms.create_run("ai-readiness", None).await.unwrap();
    assert_eq!(run.form_version, "1.0.0");

    let first = PageAnswers::new()
        .with("role", "engineer")
        .with("size", FieldValue::from(50i64));
    let second = PageAnswers::new()
        .with("role", "manager")
        .with("size", "small");

    forms.save_answers(run.run_id, "intro", &first).await.unwrap();
    forms.save_answers(run.run_id, "intro", &second).await.unwrap();

    let summary = forms.get_run(run.run_id).await.unwrap();
    assert_eq!(summary.status, RunStatus::InProgress);
    assert_eq!(summary.last_page.as_deref(), Some("intro"));

    let answers = answers_to_form_answers(&summary.answers);
    let intro = answers.page("intro").unwrap();
    assert_eq!(intro.get("role"), Some(&FieldValue::from("manager")));
    assert_eq!(intro.get("size"), Some(&FieldValue::from("small")));
    assert_eq!(intro.len(), 2);
}

#[tokio::test]
async fn list_answers_round_trip_through_the_server() {
    let (api, _) = common::spawn().await;
    let forms = api.forms();
    let run = forms.create_run("ai-readiness", None).await.unwrap();

    let tools = PageAnswers::new().with(
        "used",
        FieldValue::List(vec!["git".into(), 3i64.into()]),
    );
    forms.save_answers(run.run_id, "tools", &tools).await.unwrap();

    let summary = forms.get_run(run.run_id).await.unwrap();
    let answers = answers_to_form_answers(&summary.answers);
    assert_eq!(answers.page("tools"), Some(&tools));
}

#[tokio::test]
async fn completing_a_run() {
    let (api, _) = common::spawn().await;
    let forms = api.forms();
    let run = forms.create_run("ai-readiness", None).await.unwrap();

    let completed = forms.complete_run(run.run_id).await.unwrap();
    assert_eq!(completed.status, RunStatus::Completed);

    let summary = forms.get_run(run.run_id).await.unwrap();
    assert!(summary.status.is_completed());
    assert!(summary.completed_at.is_some());

    let err = forms
        .save_answers(run.run_id, "intro", &PageAnswers::new().with("role", "late"))
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::UNPROCESSABLE_ENTITY));

    let err = forms.complete_run(run.run_id).await.unwrap_err();
    let ClientError::Api(api_err) = err else {
        panic!("expected an API error");
    };
    assert_eq!(api_err.detail().as_deref(), Some("Run has already been completed"));
}

#[tokio::test]
async fn unknown_run() {
    let (api, _) = common::spawn().await;
    let run_id: RunId = "00000000-0000-4000-8000-00000000dead".parse().unwrap();

    let err = api.forms().get_run(run_id).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
}

#[tokio::test]
async fn server_errors_surface_as_api_errors() {
    let (api, state) = common::spawn().await;
    state.lock().unwrap().next_error = Some((
        StatusCode::INTERNAL_SERVER_ERROR,
        serde_json::json!({"message": "database unavailable"}),
        None,
    ));

    let err = api.forms().create_run("ai-readiness", None).await.unwrap_err();
    assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
    assert!(err.to_string().contains("database unavailable"));
}
