//! # rf-api Handlers
//!
//! Coordinates the flow between HTTP requests and the core ports. Schema
//! selection (guest vs. authenticated field set) happens once per request,
//! right after the session is resolved; everything below that point works
//! with the explicit `Schema` value.

use actix_web::cookie::{time::Duration as CookieDuration, Cookie};
use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse};
use actix_multipart::Multipart;
use askama::Template;
use chrono::Utc;
use futures_util::TryStreamExt;
use rf_core::error::AppError;
use rf_core::forms::{self, CommentFormInput, FieldErrors, Schema, TopicFormInput};
use rf_core::models::{NewComment, NewTopic, SessionUser};
use rf_core::traits::{AuthProvider, ForumRepo, MediaStore};
use rf_core::workflow::{self, Outcome, Step};
use rf_ui::{
    CategoryTemplate, CommentRow, ConfirmTopicTemplate, CreateTopicTemplate, LoginTemplate,
    SearchTemplate, ThreadTemplate, TopTemplate, TopicRow,
};
use serde::Deserialize;

use crate::error::{ApiError, ApiResult};
use crate::session::{session_id, SessionStore};

/// Topics per page on the category view.
pub const PAGE_SIZE: i64 = 5;

/// Non-session cookie remembering the last-chosen category.
pub const CATEGORY_COOKIE: &str = "categ_id";

/// State shared across all actix workers.
pub struct AppState {
    pub repo: Box<dyn ForumRepo>,
    pub store: Box<dyn MediaStore>,
    pub auth: Box<dyn AuthProvider>,
    pub sessions: SessionStore,
}

fn html<T: Template>(template: &T, session_cookie: Option<Cookie<'static>>) -> ApiResult<HttpResponse> {
    let body = template.render()?;
    let mut builder = HttpResponse::Ok();
    builder.content_type("text/html; charset=utf-8");
    if let Some(cookie) = session_cookie {
        builder.cookie(cookie);
    }
    Ok(builder.body(body))
}

fn see_other(location: &str, cookies: Vec<Cookie<'static>>) -> HttpResponse {
    let mut builder = HttpResponse::SeeOther();
    builder.insert_header((header::LOCATION, location.to_string()));
    for cookie in cookies {
        builder.cookie(cookie);
    }
    builder.finish()
}

/// GET / — topic listing, newest first, with "new" markers.
pub async fn top(data: web::Data<AppState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let (sid, cookie) = session_id(&req);
    let topics = data.repo.list_topics().await?;
    let rows = TopicRow::build(topics, Utc::now());
    let user = data.sessions.user(sid);
    let template = TopTemplate {
        topics: &rows,
        username: user.as_ref().map(|u| u.username.as_str()),
    };
    html(&template, cookie)
}

async fn render_thread(
    data: &web::Data<AppState>,
    topic_id: i64,
    input: &CommentFormInput,
    errors: &FieldErrors,
    is_authenticated: bool,
    session_cookie: Option<Cookie<'static>>,
) -> ApiResult<HttpResponse> {
    let topic = data
        .repo
        .get_topic(topic_id)
        .await?
        .ok_or_else(|| AppError::NotFound("Topic".into(), topic_id.to_string()))?;
    let comments = data
        .repo
        .list_comments(topic_id)
        .await?
        .into_iter()
        .map(|comment| {
            let image_url = comment.image.as_deref().map(|id| data.store.url(id));
            let thumbnail_url = comment.image.as_deref().map(|id| data.store.thumbnail_url(id));
            CommentRow { comment, image_url, thumbnail_url }
        })
        .collect::<Vec<_>>();

    let template = ThreadTemplate {
        topic: &topic,
        comments: &comments,
        input,
        errors,
        is_authenticated,
    };
    html(&template, session_cookie)
}

/// GET /thread/{id} — topic detail with comments and the comment form.
pub async fn thread_detail(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let topic_id = path.into_inner();
    let (sid, cookie) = session_id(&req);
    let schema = Schema::for_user(data.sessions.user(sid));
    let input = match &schema {
        Schema::Guest => CommentFormInput::prefill(),
        Schema::Authenticated(_) => CommentFormInput::default(),
    };
    render_thread(&data, topic_id, &input, &FieldErrors::default(), schema.is_authenticated(), cookie)
        .await
}

struct CommentParts {
    input: CommentFormInput,
    image: Option<(Vec<u8>, String)>,
}

async fn read_comment_form(mut payload: Multipart) -> ApiResult<CommentParts> {
    let bad_payload =
        |e: actix_multipart::MultipartError| AppError::Validation(format!("malformed payload: {e}"));

    let mut parts = CommentParts { input: CommentFormInput::default(), image: None };
    while let Some(mut field) = payload.try_next().await.map_err(bad_payload)? {
        let name = field.name().to_string();
        let content_type = field.content_type().map(|m| m.to_string());
        let mut bytes = Vec::new();
        while let Some(chunk) = field.try_next().await.map_err(bad_payload)? {
            bytes.extend_from_slice(&chunk);
        }
        match name.as_str() {
            "user_name" => parts.input.user_name = String::from_utf8_lossy(&bytes).into_owned(),
            "message" => parts.input.message = String::from_utf8_lossy(&bytes).into_owned(),
            "image" if !bytes.is_empty() => {
                let content_type =
                    content_type.unwrap_or_else(|| "application/octet-stream".to_string());
                parts.image = Some((bytes, content_type));
            }
            _ => {}
        }
    }
    Ok(parts)
}

/// POST /thread/{id} — add a comment. Multipart because of the optional
/// image attachment.
pub async fn post_comment(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<i64>,
    payload: Multipart,
) -> ApiResult<HttpResponse> {
    let topic_id = path.into_inner();
    let (sid, cookie) = session_id(&req);
    let schema = Schema::for_user(data.sessions.user(sid));
    let parts = read_comment_form(payload).await?;

    let draft = match forms::validate_comment(&schema, &parts.input) {
        Ok(draft) => draft,
        Err(errors) => {
            return render_thread(
                &data,
                topic_id,
                &parts.input,
                &errors,
                schema.is_authenticated(),
                cookie,
            )
            .await;
        }
    };

    // The topic must exist before we accept an upload for it.
    if data.repo.get_topic(topic_id).await?.is_none() {
        return Err(AppError::NotFound("Topic".into(), topic_id.to_string()).into());
    }

    let image = match parts.image {
        Some((bytes, content_type)) => {
            Some(data.store.save_upload(bytes, &content_type).await?)
        }
        None => None,
    };

    let comment = data
        .repo
        .create_comment(NewComment {
            topic_id,
            message: draft.message,
            image,
            user_id: draft.user_id,
            user_name: draft.user_name,
        })
        .await?;
    log::info!("comment {} added to topic {} as no {}", comment.id, topic_id, comment.no);

    let mut cookies = Vec::new();
    if let Some(c) = cookie {
        cookies.push(c);
    }
    Ok(see_other(&format!("/thread/{topic_id}"), cookies))
}

/// GET /thread/create — the editable topic form, category pre-selected
/// from the `categ_id` cookie when present.
pub async fn create_topic_form(
    data: web::Data<AppState>,
    req: HttpRequest,
) -> ApiResult<HttpResponse> {
    let (_sid, cookie) = session_id(&req);
    let categ_id = req
        .cookie(CATEGORY_COOKIE)
        .and_then(|c| c.value().parse::<i64>().ok());
    let categories = data.repo.list_categories().await?;
    let input = TopicFormInput::prefill(categ_id);
    let template = CreateTopicTemplate {
        input: &input,
        errors: &FieldErrors::default(),
        categories: &categories,
    };
    html(&template, cookie)
}

/// The topic creation POST body. Every field defaults so a partial
/// submission still deserializes and fails validation instead of 400ing
/// at the framework layer.
#[derive(Debug, Deserialize)]
pub struct TopicPostForm {
    #[serde(default)]
    pub next: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub message: String,
}

impl TopicPostForm {
    fn input(&self) -> TopicFormInput {
        TopicFormInput {
            title: self.title.clone(),
            user_name: self.user_name.clone(),
            category: self.category.clone(),
            message: self.message.clone(),
        }
    }
}

/// POST /thread/create — one workflow transition per request, driven by
/// the `next` discriminator.
pub async fn create_topic_post(
    data: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<TopicPostForm>,
) -> ApiResult<HttpResponse> {
    let (sid, session_cookie) = session_id(&req);

    let step = match Step::parse(&form.next) {
        Some(step) => step,
        None => {
            log::warn!("rejected topic submission with unknown step {:?}", form.next);
            return Err(AppError::Validation(format!("unknown workflow step: {:?}", form.next)).into());
        }
    };

    let categories = data.repo.list_categories().await?;
    let schema = Schema::for_user(data.sessions.user(sid));
    let staged = data.sessions.staged_draft(sid);

    match workflow::advance(step, staged, &schema, &form.input(), &categories) {
        Outcome::Stage(draft) => {
            let category = categories
                .iter()
                .find(|c| c.id == draft.category)
                .ok_or_else(|| AppError::Internal("validated category disappeared".into()))?;
            data.sessions.stage_draft(sid, draft.clone());
            let template = ConfirmTopicTemplate { draft: &draft, category };
            html(&template, session_cookie)
        }
        Outcome::Reject { input, errors } => {
            let template =
                CreateTopicTemplate { input: &input, errors: &errors, categories: &categories };
            html(&template, session_cookie)
        }
        Outcome::Rehydrate(draft) => {
            let input = draft.to_input();
            let template = CreateTopicTemplate {
                input: &input,
                errors: &FieldErrors::default(),
                categories: &categories,
            };
            html(&template, session_cookie)
        }
        Outcome::StartOver => {
            let input = TopicFormInput::prefill(None);
            let template = CreateTopicTemplate {
                input: &input,
                errors: &FieldErrors::default(),
                categories: &categories,
            };
            html(&template, session_cookie)
        }
        Outcome::Commit(draft) => {
            let user = data.sessions.user(sid);
            let topic = data
                .repo
                .create_topic(NewTopic {
                    title: draft.title.clone(),
                    message: draft.message.clone(),
                    category_id: draft.category,
                    user_id: user.map(|u| u.id),
                    user_name: draft.user_name.clone(),
                })
                .await?;
            data.sessions.remove_draft(sid);
            log::info!("topic {} created in category {}", topic.id, draft.category);

            let mut cookies = vec![Cookie::build(CATEGORY_COOKIE, draft.category.to_string())
                .path("/")
                .max_age(CookieDuration::days(365))
                .finish()];
            if let Some(c) = session_cookie {
                cookies.push(c);
            }
            Ok(see_other("/", cookies))
        }
        Outcome::NothingToCommit => {
            log::warn!("create requested with nothing staged; no topic committed");
            let cookies = session_cookie.into_iter().collect();
            Ok(see_other("/", cookies))
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct PageQuery {
    /// 1-based page number.
    #[serde(default)]
    pub p: Option<i64>,
}

/// GET /category/{url_code} — topics of one category, five per page.
pub async fn category_view(
    data: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<PageQuery>,
) -> ApiResult<HttpResponse> {
    let url_code = path.into_inner();
    let (_sid, cookie) = session_id(&req);
    let category = data
        .repo
        .get_category_by_code(&url_code)
        .await?
        .ok_or_else(|| AppError::NotFound("Category".into(), url_code.clone()))?;

    let page = query.p.unwrap_or(1).max(1);
    let total = data.repo.count_topics_by_category(category.id).await?;
    let total_pages = ((total + PAGE_SIZE - 1) / PAGE_SIZE).max(1);
    let topics = data
        .repo
        .list_topics_by_category(category.id, PAGE_SIZE, (page - 1) * PAGE_SIZE)
        .await?;
    let rows = TopicRow::build(topics, Utc::now());

    let template =
        CategoryTemplate { category: &category, topics: &rows, page, total_pages };
    html(&template, cookie)
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// GET /search?q=… — substring search over topic titles and bodies.
pub async fn search(
    data: web::Data<AppState>,
    req: HttpRequest,
    query: web::Query<SearchQuery>,
) -> ApiResult<HttpResponse> {
    let (_sid, cookie) = session_id(&req);
    let q = query.q.trim();
    let topics = if q.is_empty() { Vec::new() } else { data.repo.search_topics(q).await? };
    let rows = TopicRow::build(topics, Utc::now());
    let template = SearchTemplate { query: q, topics: &rows };
    html(&template, cookie)
}

/// POST /thread/{id}/comment/{no}/vote — endorse a comment.
pub async fn vote(
    data: web::Data<AppState>,
    path: web::Path<(i64, i64)>,
) -> ApiResult<HttpResponse> {
    let (topic_id, no) = path.into_inner();
    let comment = data
        .repo
        .get_comment(topic_id, no)
        .await?
        .ok_or_else(|| AppError::NotFound("Comment".into(), format!("{topic_id}#{no}")))?;
    data.repo.add_vote(comment.id).await?;
    Ok(see_other(&format!("/thread/{topic_id}"), Vec::new()))
}

/// GET /login
pub async fn login_form(req: HttpRequest) -> ApiResult<HttpResponse> {
    let (_sid, cookie) = session_id(&req);
    html(&LoginTemplate { error: None }, cookie)
}

#[derive(Debug, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
}

/// POST /login — verify credentials and attach the user to the session.
pub async fn login(
    data: web::Data<AppState>,
    req: HttpRequest,
    form: web::Form<LoginForm>,
) -> ApiResult<HttpResponse> {
    let (sid, cookie) = session_id(&req);

    let user = data.repo.get_user_by_name(&form.username).await?;
    let verified = user
        .filter(|u| data.auth.verify_password(&form.password, &u.password_hash));

    match verified {
        Some(user) => {
            data.sessions
                .set_user(sid, SessionUser { id: user.id, username: user.username });
            let cookies = cookie.into_iter().collect();
            Ok(see_other("/", cookies))
        }
        None => {
            log::info!("failed login attempt for {:?}", form.username);
            html(&LoginTemplate { error: Some("Invalid username or password.") }, cookie)
        }
    }
}

/// POST /logout
pub async fn logout(data: web::Data<AppState>, req: HttpRequest) -> ApiResult<HttpResponse> {
    let (sid, cookie) = session_id(&req);
    data.sessions.clear_user(sid);
    let cookies = cookie.into_iter().collect();
    Ok(see_other("/", cookies))
}
