use std::sync::Arc;

use chrono::Utc;

use crate::{
    dto::{CreateNoteRequest, NoteResponse, UpdateNoteRequest},
    error::ServiceError,
    repository::Repository,
};

/// Maximum title length in characters, counted after trimming.
pub const TITLE_MAX_CHARS: usize = 200;

/// Domain layer over [`Repository`]: validates input, assigns timestamps in
/// application code and maps rows to response DTOs. SQLite calls run on the
/// blocking pool so handler futures never stall a runtime worker.
#[derive(Clone)]
pub struct NoteService {
    repo: Arc<Repository>,
}

impl NoteService {
    pub const fn new(repo: Arc<Repository>) -> Self {
        Self { repo }
    }

    pub async fn create_note(
        &self,
        request: CreateNoteRequest,
    ) -> Result<NoteResponse, ServiceError> {
        let title = normalize_title(&request.title)?;

        let repo = self.repo.clone();
        let note = tokio::task::spawn_blocking(move || {
            repo.create_note(&title, &request.content, Utc::now())
        })
        .await??;

        Ok(note.into())
    }

    pub async fn update_note(
        &self,
        id: i64,
        request: UpdateNoteRequest,
    ) -> Result<NoteResponse, ServiceError> {
        let title = normalize_title(&request.title)?;

        let repo = self.repo.clone();
        let note = tokio::task::spawn_blocking(move || {
            repo.update_note(id, &title, &request.content, Utc::now())
        })
        .await??;

        note.map(Into::into).ok_or(ServiceError::NotFound(id))
    }

    pub async fn delete_note(&self, id: i64) -> Result<(), ServiceError> {
        let repo = self.repo.clone();
        let removed = tokio::task::spawn_blocking(move || repo.delete_note(id)).await??;

        if removed {
            Ok(())
        } else {
            Err(ServiceError::NotFound(id))
        }
    }

    pub async fn get_one_note(&self, id: i64) -> Result<NoteResponse, ServiceError> {
        let repo = self.repo.clone();
        let note = tokio::task::spawn_blocking(move || repo.get_one_note(id)).await??;

        note.map(Into::into).ok_or(ServiceError::NotFound(id))
    }

    pub async fn get_all_notes(&self) -> Result<Vec<NoteResponse>, ServiceError> {
        let repo = self.repo.clone();
        let notes = tokio::task::spawn_blocking(move || repo.get_all_notes()).await??;

        Ok(notes.into_iter().map(Into::into).collect())
    }
}

/// Trims the title and enforces the 1-200 character bound before any storage
/// access happens.
fn normalize_title(raw: &str) -> Result<String, ServiceError> {
    let title = raw.trim();

    if title.is_empty() {
        return Err(ServiceError::InvalidInput(
            "title must not be empty".to_string(),
        ));
    }
    if title.chars().count() > TITLE_MAX_CHARS {
        return Err(ServiceError::InvalidInput(format!(
            "title must be at most {TITLE_MAX_CHARS} characters"
        )));
    }

    Ok(title.to_string())
}
