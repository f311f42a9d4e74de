//! Annotation API routes

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::annotations::{AnnotationKey, AnnotationSet, Item};
use crate::epub::{ChapterSource, EpubBook, InMemoryBook};
use crate::error::{AppError, Result};
use crate::html::{context_phrases, discover_markers, insert_annotations, strip_annotations, InsertionResult};
use crate::state::AppState;

/// Annotate already-rendered chapters
#[derive(Debug, Deserialize)]
pub struct AnnotateRequest {
    pub set: AnnotationSet,
    /// HTML of every chapter of the book, in reading order
    pub chapters: Vec<String>,
    /// Chapter to annotate
    pub chapter: usize,
}

#[derive(Debug, Deserialize)]
pub struct ResolveRequest {
    pub set: AnnotationSet,
    /// Key carried by the clicked element
    pub key: String,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct HtmlBody {
    pub html: String,
}

/// Router for stateless annotation endpoints
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(annotate))
        .route("/resolve", post(resolve))
        .route("/strip", post(strip))
}

/// Router for annotating books from the library
pub fn books_router() -> Router<AppState> {
    Router::new()
        .route("/:book_id/chapters/:index/annotate", post(annotate_book_chapter))
        .route("/:book_id/markers", delete(invalidate_markers))
}

async fn annotate(
    State(state): State<AppState>,
    Json(request): Json<AnnotateRequest>,
) -> Result<Json<InsertionResult>> {
    let AnnotateRequest {
        set,
        chapters,
        chapter,
    } = request;

    if chapter >= chapters.len() {
        return Err(AppError::BadRequest(format!(
            "Chapter {} out of range ({} chapters)",
            chapter,
            chapters.len()
        )));
    }

    let book = InMemoryBook::new(chapters).with_current_chapter(chapter);
    let markers = discover_markers(&book, &set.items).await;
    let html = book.chapter_html(chapter).await?;

    let result = insert_annotations(&set, &html, chapter, &markers, &state.config().highlight);
    Ok(Json(result))
}

async fn annotate_book_chapter(
    State(state): State<AppState>,
    Path((book_id, index)): Path<(String, usize)>,
    Json(set): Json<AnnotationSet>,
) -> Result<Json<InsertionResult>> {
    if book_id.is_empty() || book_id.contains(['/', '\\']) || book_id.contains("..") {
        return Err(AppError::BadRequest(format!("Invalid book ID: {}", book_id)));
    }

    let path = state.config().library.path.join(format!("{}.epub", book_id));
    if !path.is_file() {
        return Err(AppError::NotFound(format!("Book not found: {}", book_id)));
    }

    let mut book = EpubBook::from_path(&path)?;
    book.set_current_chapter(index);

    let phrases = context_phrases(&set.items);
    let markers = match state.cached_markers(&book_id, set.id, &phrases).await {
        Some(markers) => markers,
        None => {
            let markers = discover_markers(&book, &set.items).await;
            state
                .cache_markers(&book_id, set.id, phrases, markers.clone())
                .await;
            markers
        }
    };

    let html = book.chapter_html(index).await?;
    let result = insert_annotations(&set, &html, index, &markers, &state.config().highlight);

    tracing::info!(
        "Annotated chapter {} of {} with set {}: {} highlights",
        index,
        book_id,
        set.id,
        result.wrapped_count
    );

    Ok(Json(result))
}

async fn invalidate_markers(
    State(state): State<AppState>,
    Path(book_id): Path<String>,
) -> StatusCode {
    state.invalidate_book(&book_id).await;
    StatusCode::NO_CONTENT
}

/// Find the item behind a clicked highlight
async fn resolve(Json(request): Json<ResolveRequest>) -> Result<Json<Item>> {
    let key: AnnotationKey = request
        .key
        .parse()
        .map_err(|e: crate::annotations::KeyParseError| AppError::BadRequest(e.to_string()))?;

    request
        .set
        .resolve(&key)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("No item for key: {}", key)))
}

async fn strip(State(state): State<AppState>, Json(body): Json<HtmlBody>) -> Result<Json<HtmlBody>> {
    let html = strip_annotations(&body.html, &state.config().highlight)?;
    Ok(Json(HtmlBody { html }))
}
