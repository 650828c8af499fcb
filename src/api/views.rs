//! Server-rendered pages. User supplied text always goes through [`escape_html`].

use std::fmt::Write;

use crate::{
    entity::{playlist, song},
    form::{AddSongForm, FieldErrors, PlaylistForm, SongForm},
    util::escape_html as esc,
};

fn page(title: &str, flash: Option<&str>, body: &str) -> String {
    let flash = flash
        .map(|msg| format!(r#"<p class="flash">{}</p>"#, esc(msg)))
        .unwrap_or_default();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <title>{title} | Playlist App</title>
</head>
<body>
    <nav><a href="/playlists">Playlists</a> | <a href="/songs">Songs</a></nav>
    {flash}
    <h1>{title}</h1>
    {body}
</body>
</html>
"#,
        title = esc(title),
    )
}

fn errors_for(errors: &FieldErrors, field: &str) -> String {
    errors
        .get(field)
        .iter()
        .fold(String::new(), |mut out, msg| {
            let _ = write!(out, r#"<span class="error">{}</span>"#, esc(msg));
            out
        })
}

fn text_field(name: &str, label: &str, value: &str, errors: &FieldErrors) -> String {
    format!(
        r#"<p><label for="{name}">{label}</label> <input type="text" id="{name}" name="{name}" value="{value}"> {errors}</p>"#,
        value = esc(value),
        errors = errors_for(errors, name),
    )
}

fn list<T>(items: &[T], empty: &str, item: impl Fn(&T) -> String) -> String {
    if items.is_empty() {
        return format!("<p>{empty}</p>");
    }
    let items: String = items.iter().map(|i| format!("<li>{}</li>", item(i))).collect();
    format!("<ul>{items}</ul>")
}

fn playlist_link(p: &playlist::Model) -> String {
    format!(r#"<a href="/playlists/{}">{}</a>"#, p.id, esc(&p.name))
}

fn song_link(s: &song::Model) -> String {
    format!(
        r#"<a href="/songs/{}">{}</a> by {}"#,
        s.id,
        esc(&s.title),
        esc(&s.artist)
    )
}

pub(super) fn playlists(playlists: &[playlist::Model], flash: Option<&str>) -> String {
    let body = format!(
        r#"{}<p><a href="/playlists/add">Add Playlist</a></p>"#,
        list(playlists, "No playlists yet.", playlist_link)
    );
    page("Playlists", flash, &body)
}

pub(super) fn playlist_detail(
    playlist: &playlist::Model,
    songs: &[song::Model],
    flash: Option<&str>,
) -> String {
    let description = playlist
        .description
        .as_deref()
        .map(|d| format!("<p>{}</p>", esc(d)))
        .unwrap_or_default();
    let body = format!(
        r#"{description}<h2>Songs</h2>{}<p><a href="/playlists/{}/add-song">Add Song</a></p>"#,
        list(songs, "No songs on this playlist.", song_link),
        playlist.id,
    );
    page(&playlist.name, flash, &body)
}

pub(super) fn playlist_form(form: &PlaylistForm, errors: &FieldErrors) -> String {
    let body = format!(
        r#"<form method="POST" action="/playlists/add">{}{}<button type="submit">Add Playlist</button></form>"#,
        text_field("name", "Playlist Name", &form.name, errors),
        text_field("description", "Description", &form.description, errors),
    );
    page("Add Playlist", None, &body)
}

pub(super) fn songs(songs: &[song::Model], flash: Option<&str>) -> String {
    let body = format!(
        r#"{}<p><a href="/songs/add">Add Song</a></p>"#,
        list(songs, "No songs yet.", song_link)
    );
    page("Songs", flash, &body)
}

pub(super) fn song_detail(song: &song::Model, playlists: &[playlist::Model]) -> String {
    let body = format!(
        "<p>Artist: {}</p><h2>Playlists</h2>{}",
        esc(&song.artist),
        list(playlists, "Not on any playlist.", playlist_link),
    );
    page(&song.title, None, &body)
}

pub(super) fn song_form(form: &SongForm, errors: &FieldErrors) -> String {
    let body = format!(
        r#"<form method="POST" action="/songs/add">{}{}<button type="submit">Add Song</button></form>"#,
        text_field("title", "Song Title", &form.title, errors),
        text_field("artist", "Artist", &form.artist, errors),
    );
    page("Add Song", None, &body)
}

pub(super) fn add_song_to_playlist(
    playlist: &playlist::Model,
    choices: &[song::Model],
    form: &AddSongForm,
    errors: &FieldErrors,
) -> String {
    let options: String = choices
        .iter()
        .map(|s| {
            let selected = if form.song.trim() == s.id.to_string() {
                " selected"
            } else {
                ""
            };
            format!(
                r#"<option value="{}"{selected}>{}</option>"#,
                s.id,
                esc(&s.title)
            )
        })
        .collect();
    let picker = if choices.is_empty() {
        "<p>Every song is already on this playlist.</p>".to_string()
    } else {
        format!(
            r#"<p><label for="song">Song To Add</label> <select id="song" name="song">{options}</select> {}</p>"#,
            errors_for(errors, "song")
        )
    };
    // a rejected submission must stay visible even when nothing is left to pick
    let rejected = if choices.is_empty() {
        errors_for(errors, "song")
    } else {
        String::new()
    };
    let body = format!(
        r#"<p>Playlist: {}</p><form method="POST" action="/playlists/{}/add-song">{picker}{rejected}<button type="submit">Add</button></form>"#,
        playlist_link(playlist),
        playlist.id,
    );
    page("Add Song To Playlist", None, &body)
}

pub(super) fn not_found(kind: &str, id: &str) -> String {
    page(
        "Not Found",
        None,
        &format!("<p>No {} with id {}.</p>", esc(kind), esc(id)),
    )
}
