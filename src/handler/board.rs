//! Board handlers
//!
//! Bridge the page and form routes to the feed store and the upload
//! boundary. Rejected text/delete/update requests still redirect to the
//! feed; only a failed upload re-renders the page with a message.

use http_body_util::{BodyExt, Full};
use hyper::body::{Body, Bytes};
use hyper::header::CONTENT_TYPE;
use hyper::{Request, Response};

use super::form::{read_form, DeleteForm, FormError, SubmitForm, UpdateForm};
use crate::config::AppState;
use crate::feed::{FeedError, PostId};
use crate::http;
use crate::logger;
use crate::upload::{self, UploadError};
use crate::view;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// `GET /`
pub async fn show_feed(state: &AppState, is_head: bool) -> Response<Full<Bytes>> {
    render_page(state, None, is_head).await
}

/// `POST /submit`
pub async fn submit_text<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let limit = state.config.http.max_body_size;
    let form: SubmitForm = match read_form(req.into_body(), limit).await {
        Ok(f) => f,
        Err(e) => return form_error_response(&e),
    };

    let text = form.post.unwrap_or_default();
    let mut feed = state.feed.write().await;
    match feed.append_text(&text) {
        Ok(id) => logger::log_feed(&format!("Added text post {id} ({} posts)", feed.len())),
        Err(e) => logger::log_rejected("Text post", &e),
    }
    drop(feed);
    http::build_redirect_response("/")
}

/// `POST /upload`
pub async fn upload_image<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError> + 'static,
{
    match receive_upload(req, state).await {
        Ok(url) => {
            let id = state.feed.write().await.append_image(url.as_str());
            logger::log_feed(&format!("Added image post {id} ({url})"));
            http::build_redirect_response("/")
        }
        Err(e) => {
            logger::log_rejected("Upload", &e);
            render_page(state, Some(&e.to_string()), false).await
        }
    }
}

/// `POST /delete`
pub async fn delete_post<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let limit = state.config.http.max_body_size;
    let form: DeleteForm = match read_form(req.into_body(), limit).await {
        Ok(f) => f,
        Err(e) => return form_error_response(&e),
    };

    let result = match parse_item_id(form.item_id.as_deref()) {
        Ok(id) => state.feed.write().await.delete(id),
        Err(e) => Err(e),
    };
    match result {
        Ok(post) => logger::log_feed(&format!("Deleted {} post {}", post.kind, post.id)),
        Err(e) => logger::log_rejected("Delete", &e),
    }
    http::build_redirect_response("/")
}

/// `POST /update`
pub async fn update_post<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: Body<Data = Bytes>,
    B::Error: Into<BoxError>,
{
    let limit = state.config.http.max_body_size;
    let form: UpdateForm = match read_form(req.into_body(), limit).await {
        Ok(f) => f,
        Err(e) => return form_error_response(&e),
    };
    logger::log_debug(&format!(
        "Update request: itemId={:?} updatedContent={:?}",
        form.item_id, form.updated_content
    ));

    let content = form.updated_content.unwrap_or_default();
    let id = match parse_item_id(form.item_id.as_deref()) {
        Ok(id) => id,
        Err(e) => {
            logger::log_rejected("Update", &e);
            return http::build_redirect_response("/");
        }
    };

    let mut feed = state.feed.write().await;
    match feed.update(id, &content) {
        Ok(()) => {
            if let Some(post) = feed.get(id) {
                logger::log_feed(&format!("Updated {} post {id}", post.kind));
            }
        }
        Err(e) => logger::log_rejected("Update", &e),
    }
    drop(feed);
    http::build_redirect_response("/")
}

async fn render_page(
    state: &AppState,
    message: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let html = {
        let feed = state.feed.read().await;
        view::render_feed_page(&state.config.board.title, &feed, message)
    };
    http::build_html_response(html, is_head)
}

/// Extract, validate and store the uploaded image, returning its public URL
async fn receive_upload<B>(req: Request<B>, state: &AppState) -> Result<String, UploadError>
where
    B: Body<Data = Bytes> + Send + 'static,
    B::Error: Into<BoxError> + 'static,
{
    // Anything that is not multipart cannot carry a file
    let boundary = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .and_then(|ct| multer::parse_boundary(ct).ok())
        .ok_or(UploadError::NoFile)?;

    let stream = req.into_body().into_data_stream();
    let file = upload::read_upload(
        stream,
        &boundary,
        &state.upload_policy,
        state.config.http.max_body_size,
    )
    .await?;

    logger::log_debug(&format!("Storing upload {file}"));
    state.uploads.save(&file).await
}

fn parse_item_id(raw: Option<&str>) -> Result<PostId, FeedError> {
    raw.unwrap_or_default().parse()
}

fn form_error_response(err: &FormError) -> Response<Full<Bytes>> {
    logger::log_warning(&err.to_string());
    match err {
        FormError::TooLarge(_) => http::build_413_response(),
        FormError::Read(_) | FormError::Decode(_) => http::build_400_response(&err.to_string()),
    }
}
