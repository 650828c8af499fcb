//! Drives the full router against an in-memory database.

use std::sync::Arc;

use axum::{
    body::Body,
    http::{
        header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE},
        Request, Response, StatusCode,
    },
    Router,
};
use playlist_app::{
    api::{router, AppState},
    db::DB,
    form::{NewPlaylist, NewSong},
};
use tower::util::ServiceExt; // for `oneshot`

const SECRET: &[u8] = b"I'LL NEVER TELL!! I'LL NEVER TELL!! I'LL NEVER TELL!!";

/// Test helper: app plus a handle on its database
async fn setup() -> (Router, Arc<DB>) {
    let db = Arc::new(
        DB::connect("sqlite::memory:")
            .await
            .expect("Should open in-memory database"),
    );
    let app = router(AppState::new(db.clone(), SECRET));
    (app, db)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn post(uri: &str, form: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(form.to_owned()))
        .unwrap()
}

async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Should read body");
    String::from_utf8(bytes.to_vec()).expect("Should be UTF-8")
}

fn location(response: &Response<Body>) -> &str {
    response
        .headers()
        .get(LOCATION)
        .expect("redirect without location")
        .to_str()
        .unwrap()
}

async fn rock_classics(db: &DB) -> i32 {
    db.add_playlist(NewPlaylist {
        name: "Rock Classics".into(),
        description: "Best of rock music".into(),
    })
    .await
    .unwrap()
    .id
}

async fn we_will_rock_you(db: &DB) -> i32 {
    db.add_song(NewSong {
        title: "We Will Rock You".into(),
        artist: "Queen".into(),
    })
    .await
    .unwrap()
    .id
}

// =============================================================================
// Home
// =============================================================================

#[tokio::test]
async fn home_redirects_to_playlists() {
    let (app, _db) = setup().await;
    let response = app.oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/playlists");
}

// =============================================================================
// Playlists
// =============================================================================

#[tokio::test]
async fn lists_all_playlists() {
    let (app, db) = setup().await;
    rock_classics(&db).await;
    db.add_playlist(NewPlaylist {
        name: "Pop Hits".into(),
        description: "Top pop songs".into(),
    })
    .await
    .unwrap();

    let response = app.oneshot(get("/playlists")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Rock Classics"));
    assert!(body.contains("Pop Hits"));
}

#[tokio::test]
async fn add_playlist_persists_and_redirects() {
    let (app, db) = setup().await;

    let response = app.clone().oneshot(get("/playlists/add")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains(r#"name="description""#));

    let response = app
        .clone()
        .oneshot(post(
            "/playlists/add",
            "name=Indie+Vibes&description=Best+indie+music",
        ))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/playlists");
    assert!(response.headers().contains_key(SET_COOKIE));

    let playlists = db.playlists().await.unwrap();
    assert_eq!(playlists.len(), 1);
    assert_eq!(playlists[0].name, "Indie Vibes");
    assert_eq!(playlists[0].description.as_deref(), Some("Best indie music"));

    let body = body_text(app.oneshot(get("/playlists")).await.unwrap()).await;
    assert!(body.contains("Indie Vibes"));
}

/// Test helper: submit `form`, then follow the redirect carrying the flash cookie
async fn flash_after(app: &Router, uri: &str, form: &str) -> String {
    let response = app.clone().oneshot(post(uri, form)).await.unwrap();
    assert!(response.status().is_redirection(), "{uri}");
    let set_cookie = response.headers()[SET_COOKIE].to_str().unwrap();
    let cookie = set_cookie.split(';').next().unwrap().to_owned();

    let request = Request::builder()
        .uri(location(&response))
        .header(COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    // consumed: the cookie is cleared on the page that shows it
    assert!(response.headers().contains_key(SET_COOKIE));
    body_text(response).await
}

#[tokio::test]
async fn flash_is_shown_once_after_redirect() {
    let (app, _db) = setup().await;

    let body = flash_after(&app, "/playlists/add", "name=Jazz&description=Smooth").await;
    assert!(body.contains("Playlist added successfully!"));

    let body = flash_after(&app, "/songs/add", "title=Imagine&artist=John+Lennon").await;
    assert!(body.contains("Song added successfully!"));

    // fresh database: both rows got id 1
    let body = flash_after(&app, "/playlists/1/add-song", "song=1").await;
    assert!(body.contains("Song &#39;Imagine&#39; added to playlist &#39;Jazz&#39;!"));

    // without the cookie there is nothing left to show
    let body = body_text(app.oneshot(get("/playlists/1")).await.unwrap()).await;
    assert!(!body.contains(r#"class="flash""#));
}

#[tokio::test]
async fn invalid_playlist_rerenders_form() {
    let (app, db) = setup().await;

    let response = app
        .oneshot(post("/playlists/add", "name=&description=Still+here"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("This field is required."));
    assert!(body.contains("Still here"));
    assert!(db.playlists().await.unwrap().is_empty());
}

#[tokio::test]
async fn playlist_without_description_is_rejected() {
    let (app, db) = setup().await;

    let response = app
        .oneshot(post("/playlists/add", "name=Lonely"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(body_text(response).await.contains("This field is required."));
    assert!(db.playlists().await.unwrap().is_empty());
}

#[tokio::test]
async fn playlist_detail_shows_name_and_description() {
    let (app, db) = setup().await;
    db.add_playlist(NewPlaylist {
        name: "Jazz Essentials".into(),
        description: "Smooth jazz classics".into(),
    })
    .await
    .unwrap();
    let id = db.playlists().await.unwrap()[0].id;

    let response = app.oneshot(get(&format!("/playlists/{id}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Jazz Essentials"));
    assert!(body.contains("Smooth jazz classics"));
}

#[tokio::test]
async fn missing_ids_are_not_found() {
    let (app, db) = setup().await;
    rock_classics(&db).await;
    we_will_rock_you(&db).await;

    for uri in [
        "/playlists/999",
        "/songs/999",
        "/playlists/999/add-song",
        "/playlists/-1",
        "/playlists/+1",
        "/songs/+1",
        "/songs/not-a-number",
    ] {
        let response = app.clone().oneshot(get(uri)).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND, "{uri}");
    }

    let response = app
        .oneshot(post("/playlists/999/add-song", "song=1"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// =============================================================================
// Songs
// =============================================================================

#[tokio::test]
async fn add_song_persists_and_redirects() {
    let (app, db) = setup().await;

    let response = app
        .clone()
        .oneshot(post(
            "/songs/add",
            "title=Beethoven+Symphony+No.+5&artist=Ludwig+van+Beethoven",
        ))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/songs");
    assert_eq!(db.songs().await.unwrap().len(), 1);

    let body = body_text(app.oneshot(get("/songs")).await.unwrap()).await;
    assert!(body.contains("Beethoven Symphony No. 5"));
}

#[tokio::test]
async fn invalid_song_leaves_count_unchanged() {
    let (app, db) = setup().await;
    we_will_rock_you(&db).await;

    let too_long = "x".repeat(101);
    for form in [
        "title=&artist=Queen".to_string(),
        format!("title=Ok&artist={too_long}"),
    ] {
        let response = app.clone().oneshot(post("/songs/add", &form)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        let body = body_text(response).await;
        assert!(body.contains(r#"class="error""#), "{form}");
    }
    assert_eq!(db.songs().await.unwrap().len(), 1);
}

#[tokio::test]
async fn song_detail_shows_title_artist_and_playlists() {
    let (app, db) = setup().await;
    let playlist = rock_classics(&db).await;
    let song = db
        .add_song(NewSong {
            title: "Imagine".into(),
            artist: "John Lennon".into(),
        })
        .await
        .unwrap()
        .id;
    db.add_song_to_playlist(playlist, song).await.unwrap();

    let response = app.oneshot(get(&format!("/songs/{song}"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Imagine"));
    assert!(body.contains("John Lennon"));
    assert!(body.contains("Rock Classics"));
}

// =============================================================================
// Playlist membership
// =============================================================================

#[tokio::test]
async fn add_song_form_offers_only_unlinked_songs() {
    let (app, db) = setup().await;
    let playlist = rock_classics(&db).await;
    let linked = we_will_rock_you(&db).await;
    let free = db
        .add_song(NewSong {
            title: "Bohemian Rhapsody".into(),
            artist: "Queen".into(),
        })
        .await
        .unwrap()
        .id;
    db.add_song_to_playlist(playlist, linked).await.unwrap();

    let response = app
        .oneshot(get(&format!("/playlists/{playlist}/add-song")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains(&format!(r#"<option value="{free}">"#)));
    assert!(!body.contains(&format!(r#"<option value="{linked}">"#)));
}

#[tokio::test]
async fn rock_classics_scenario() {
    let (app, _db) = setup().await;

    let response = app
        .clone()
        .oneshot(post(
            "/playlists/add",
            "name=Rock+Classics&description=Best+of+rock+music",
        ))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    let response = app
        .clone()
        .oneshot(post("/songs/add", "title=We+Will+Rock+You&artist=Queen"))
        .await
        .unwrap();
    assert!(response.status().is_redirection());

    // fresh database: both rows got id 1
    let response = app
        .clone()
        .oneshot(post("/playlists/1/add-song", "song=1"))
        .await
        .unwrap();
    assert!(response.status().is_redirection());
    assert_eq!(location(&response), "/playlists/1");

    let response = app.oneshot(get("/playlists/1")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = body_text(response).await;
    assert!(body.contains("Rock Classics"));
    assert!(body.contains("We Will Rock You"));
}

#[tokio::test]
async fn repeat_membership_creates_no_duplicate() {
    let (app, db) = setup().await;
    let playlist = rock_classics(&db).await;
    let song = we_will_rock_you(&db).await;
    let uri = format!("/playlists/{playlist}/add-song");
    let form = format!("song={song}");

    let first = app.clone().oneshot(post(&uri, &form)).await.unwrap();
    assert!(first.status().is_redirection());

    let second = app.clone().oneshot(post(&uri, &form)).await.unwrap();
    assert_eq!(second.status(), StatusCode::OK);
    assert!(body_text(second).await.contains("Not a valid choice."));

    let model = db.playlist(playlist).await.unwrap().unwrap();
    assert_eq!(db.songs_in_playlist(&model).await.unwrap().len(), 1);

    let body = body_text(app.oneshot(get(&format!("/playlists/{playlist}"))).await.unwrap()).await;
    assert_eq!(body.matches("We Will Rock You").count(), 1);
}

#[tokio::test]
async fn add_song_rejects_bad_selection() {
    let (app, db) = setup().await;
    let playlist = rock_classics(&db).await;
    we_will_rock_you(&db).await;
    let uri = format!("/playlists/{playlist}/add-song");

    for (form, message) in [
        ("song=", "This field is required."),
        ("song=abc", "Not a valid integer value."),
        ("song=4242", "Not a valid choice."),
    ] {
        let response = app.clone().oneshot(post(&uri, form)).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK, "{form}");
        assert!(body_text(response).await.contains(message), "{form}");
    }

    let model = db.playlist(playlist).await.unwrap().unwrap();
    assert!(db.songs_in_playlist(&model).await.unwrap().is_empty());
}
