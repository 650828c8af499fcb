//! One-shot notifications carried in a signed cookie across a redirect.

use axum_extra::extract::cookie::{Cookie, SignedCookieJar};

const FLASH: &str = "flash";

pub(super) fn set(jar: SignedCookieJar, message: impl Into<String>) -> SignedCookieJar {
    jar.add(
        Cookie::build((FLASH, message.into()))
            .path("/")
            .http_only(true),
    )
}

/// Reads the pending message, if any, and schedules its removal.
pub(super) fn take(jar: SignedCookieJar) -> (SignedCookieJar, Option<String>) {
    let Some(message) = jar.get(FLASH).map(|c| c.value().to_owned()) else {
        return (jar, None);
    };
    (jar.remove(Cookie::build(FLASH).path("/")), Some(message))
}
