//! Tests for the read-side handlers and comment voting.

use actix_web::http::{header, StatusCode};
use actix_web::{test, web, App};
use rf_api::configure_routes;
use rf_api::handlers::AppState;
use rf_api::session::SessionStore;
use rf_auth_simple::SimpleAuthProvider;
use rf_core::models::{NewComment, NewTopic};
use rf_core::traits::ForumRepo;
use rf_db_sqlite::SqliteForumRepo;
use rf_storage_local::LocalMediaStore;

async fn seeded_state() -> web::Data<AppState> {
    let repo = SqliteForumRepo::new("sqlite::memory:").await.unwrap();
    let tech = repo.create_category("Tech", "tech").await.unwrap();
    for i in 0..6 {
        repo.create_topic(NewTopic {
            title: format!("Topic {i}"),
            message: "body".to_string(),
            category_id: tech.id,
            user_id: None,
            user_name: "Alice".to_string(),
        })
        .await
        .unwrap();
    }
    web::Data::new(AppState {
        repo: Box::new(repo),
        store: Box::new(LocalMediaStore::new(
            std::env::temp_dir().join("rf-browse-tests"),
            "/static/uploads".to_string(),
        )),
        auth: Box::new(SimpleAuthProvider::new()),
        sessions: SessionStore::new(),
    })
}

#[actix_web::test]
async fn top_page_lists_topics() {
    let state = seeded_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("Topic 0"));
    assert!(body.contains("Topic 5"));
}

#[actix_web::test]
async fn thread_detail_renders_comments_in_order() {
    let state = seeded_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let topics = state.repo.list_topics().await.unwrap();
    let topic = &topics[0];
    for text in ["first reply", "second reply"] {
        state
            .repo
            .create_comment(NewComment {
                topic_id: topic.id,
                message: text.to_string(),
                image: None,
                user_id: None,
                user_name: "No Name".to_string(),
            })
            .await
            .unwrap();
    }

    let req = test::TestRequest::get().uri(&format!("/thread/{}", topic.id)).to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    let first = body.find("first reply").unwrap();
    let second = body.find("second reply").unwrap();
    assert!(first < second);
}

#[actix_web::test]
async fn unknown_thread_is_404() {
    let state = seeded_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let resp =
        test::call_service(&app, test::TestRequest::get().uri("/thread/999").to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn category_view_pages_by_five() {
    let state = seeded_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/category/tech?p=2").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    // Six topics, newest first: page 2 holds only the oldest.
    assert!(body.contains("Topic 0"));
    assert!(!body.contains("Topic 5"));
    assert!(body.contains("Page 2 of 2"));
}

#[actix_web::test]
async fn unknown_category_is_404() {
    let state = seeded_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/category/nope").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn voting_increments_the_comment_count() {
    let state = seeded_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let topics = state.repo.list_topics().await.unwrap();
    let topic = &topics[0];
    state
        .repo
        .create_comment(NewComment {
            topic_id: topic.id,
            message: "vote for me".to_string(),
            image: None,
            user_id: None,
            user_name: "No Name".to_string(),
        })
        .await
        .unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/thread/{}/comment/1/vote", topic.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::SEE_OTHER);
    assert_eq!(
        resp.headers().get(header::LOCATION).unwrap().to_str().unwrap(),
        format!("/thread/{}", topic.id)
    );

    let comments = state.repo.list_comments(topic.id).await.unwrap();
    assert_eq!(comments[0].vote_count, 1);
}

#[actix_web::test]
async fn voting_on_a_missing_comment_is_404() {
    let state = seeded_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let topics = state.repo.list_topics().await.unwrap();
    let topic = &topics[0];
    let req = test::TestRequest::post()
        .uri(&format!("/thread/{}/comment/42/vote", topic.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn search_matches_titles() {
    let state = seeded_state().await;
    let app =
        test::init_service(App::new().app_data(state.clone()).configure(configure_routes)).await;

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/search?q=Topic%203").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = test::read_body(resp).await;
    let body = String::from_utf8_lossy(&body);
    assert!(body.contains("Topic 3"));
    assert!(!body.contains("Topic 4"));
}
