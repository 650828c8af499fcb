use axum::{
    extract::State,
    response::{Html, IntoResponse, Redirect, Response},
    Form,
};
use axum_extra::extract::cookie::SignedCookieJar;
use tracing::{debug, info};

use super::{error::AppError, extract::EntityId, flash, views, AppState};
use crate::{
    db,
    entity::playlist,
    form::{AddSongForm, FieldErrors, PlaylistForm},
};

async fn find(state: &AppState, id: i32) -> Result<playlist::Model, AppError> {
    state
        .db
        .playlist(id)
        .await?
        .ok_or_else(|| AppError::not_found("playlist", id))
}

pub(super) async fn list(
    State(state): State<AppState>,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let playlists = state.db.playlists().await?;
    let (jar, message) = flash::take(jar);
    Ok((jar, Html(views::playlists(&playlists, message.as_deref()))))
}

pub(super) async fn detail(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    jar: SignedCookieJar,
) -> Result<impl IntoResponse, AppError> {
    let playlist = find(&state, id).await?;
    let songs = state.db.songs_in_playlist(&playlist).await?;
    let (jar, message) = flash::take(jar);
    Ok((
        jar,
        Html(views::playlist_detail(&playlist, &songs, message.as_deref())),
    ))
}

pub(super) async fn add_form() -> Html<String> {
    Html(views::playlist_form(
        &PlaylistForm::default(),
        &FieldErrors::default(),
    ))
}

pub(super) async fn add(
    State(state): State<AppState>,
    jar: SignedCookieJar,
    Form(form): Form<PlaylistForm>,
) -> Result<Response, AppError> {
    let new = match form.validate() {
        Ok(new) => new,
        Err(errors) => {
            debug!("playlist form rejected: {errors:?}");
            return Ok(Html(views::playlist_form(&form, &errors)).into_response());
        }
    };
    let playlist = state.db.add_playlist(new).await?;
    info!("created playlist {} ({})", playlist.id, playlist.name);
    let jar = flash::set(jar, "Playlist added successfully!");
    Ok((jar, Redirect::to("/playlists")).into_response())
}

pub(super) async fn add_song_form(
    State(state): State<AppState>,
    EntityId(id): EntityId,
) -> Result<Html<String>, AppError> {
    let playlist = find(&state, id).await?;
    let choices = state.db.candidate_songs(&playlist).await?;
    Ok(Html(views::add_song_to_playlist(
        &playlist,
        &choices,
        &AddSongForm::default(),
        &FieldErrors::default(),
    )))
}

pub(super) async fn add_song(
    State(state): State<AppState>,
    EntityId(id): EntityId,
    jar: SignedCookieJar,
    Form(form): Form<AddSongForm>,
) -> Result<Response, AppError> {
    let playlist = find(&state, id).await?;
    let choices = state.db.candidate_songs(&playlist).await?;

    let rejected = |errors: FieldErrors| {
        debug!("add-song form for playlist {id} rejected: {errors:?}");
        Html(views::add_song_to_playlist(&playlist, &choices, &form, &errors)).into_response()
    };

    let song_id = match form.validate(&choices) {
        Ok(song_id) => song_id,
        Err(errors) => return Ok(rejected(errors)),
    };
    // validated against the candidates, so the song exists
    let Some(song) = choices.iter().find(|s| s.id == song_id) else {
        return Err(AppError::not_found("song", song_id));
    };

    let outcome = state.db.add_song_to_playlist(playlist.id, song.id).await;
    if let Some(errors) = membership_outcome(outcome)? {
        return Ok(rejected(errors));
    }

    info!("added song {} to playlist {}", song.id, playlist.id);
    let jar = flash::set(
        jar,
        format!("Song '{}' added to playlist '{}'!", song.title, playlist.name),
    );
    Ok((jar, Redirect::to(&format!("/playlists/{}", playlist.id))).into_response())
}

/// Field errors for a membership the storage layer refused, e.g. after losing a
/// race with a concurrent submission or deletion. Other failures propagate.
fn membership_outcome(outcome: Result<(), db::Error>) -> Result<Option<FieldErrors>, AppError> {
    match outcome {
        Ok(()) => Ok(None),
        Err(db::Error::Constraint(_)) => {
            let mut errors = FieldErrors::default();
            errors.add("song", "This song could not be added to the playlist.");
            Ok(Some(errors))
        }
        Err(err) => Err(err.into()),
    }
}
