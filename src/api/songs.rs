use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{debug, info};

use super::{error::AppError, extract::EntityId, flash, views, AppState};
use crate::form::{FieldErrors, SongForm};

pub(super) async fn list(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let songs = state.db.songs().await?;
    let (jar, message) = flash::take(jar);
    Ok((jar, Html(views::songs(&songs, message.as_deref()))))
}

pub(super) async fn detail(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Html<String>, AppError> {
    let song = state
        .db
        .song(id)
        .await?
        .ok_or_else(|| AppError::not_found("song", id))?;
    let playlists = state.db.playlists_with_song(&song).await?;
    Ok(Html(views::song_detail(&song, &playlists)))
}

pub(super) async fn add_form() -> Html<String> {
    Html(views::song_form(&SongForm::default(), &FieldErrors::default()))
}

pub(super) async fn add(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<SongForm>,
) -> Result<Response, AppError> {
    let new = match form.validate() {
        Ok(new) => new,
        Err(errors) => {
            debug!("song form rejected: {errors:?}");
            return Ok(Html(views::song_form(&form, &errors)).into_response());
        }
    };
    let song = state.db.add_song(new).await?;
    info!("created song {} ({} - {})", song.id, song.artist, song.title);
    let jar = flash::set(jar, "Song added successfully!");
    Ok((jar, Redirect::to("/songs")).into_response())
}
