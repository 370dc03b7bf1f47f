use super::*;

fn some_instant() -> OffsetDateTime {
    OffsetDateTime::from_unix_timestamp(1_735_689_600).unwrap()
}

// =============================================================================
// session_cookie — attributes per the session contract.
// =============================================================================

#[test]
fn session_cookie_is_http_only() {
    let cookie = session_cookie(ACCESS_TOKEN_COOKIE, "tok".into(), some_instant(), true);
    assert_eq!(cookie.http_only(), Some(true));
}

#[test]
fn session_cookie_is_same_site_lax_on_root_path() {
    let cookie = session_cookie(ACCESS_TOKEN_COOKIE, "tok".into(), some_instant(), true);
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    assert_eq!(cookie.path(), Some("/"));
}

#[test]
fn session_cookie_secure_flag_follows_config() {
    assert_eq!(session_cookie(ACCESS_TOKEN_COOKIE, "t".into(), some_instant(), true).secure(), Some(true));
    assert_eq!(session_cookie(ACCESS_TOKEN_COOKIE, "t".into(), some_instant(), false).secure(), Some(false));
}

#[test]
fn session_cookie_expires_at_token_expiry() {
    let cookie = session_cookie(REFRESH_TOKEN_COOKIE, "tok".into(), some_instant(), true);
    let expires = cookie.expires_datetime().expect("expiry must be set");
    assert_eq!(expires.unix_timestamp(), 1_735_689_600);
}

#[test]
fn session_cookie_carries_value_verbatim() {
    let cookie = session_cookie(ACCESS_TOKEN_COOKIE, "a.b.c".into(), some_instant(), true);
    assert_eq!(cookie.name(), "access_token");
    assert_eq!(cookie.value(), "a.b.c");
}

// =============================================================================
// expired_cookie — clearing shape.
// =============================================================================

#[test]
fn expired_cookie_has_empty_value_and_zero_age() {
    let cookie = expired_cookie(ACCESS_TOKEN_COOKIE, true);
    assert_eq!(cookie.value(), "");
    assert_eq!(cookie.max_age(), Some(Duration::ZERO));
}

#[test]
fn expired_cookie_matches_session_cookie_scope() {
    // Same path and flags, or the browser will not replace the original.
    let cookie = expired_cookie(REFRESH_TOKEN_COOKIE, true);
    assert_eq!(cookie.path(), Some("/"));
    assert_eq!(cookie.http_only(), Some(true));
    assert_eq!(cookie.same_site(), Some(SameSite::Lax));
}

// =============================================================================
// cookie names — fixed external contract.
// =============================================================================

#[test]
fn cookie_names_are_stable() {
    assert_eq!(ACCESS_TOKEN_COOKIE, "access_token");
    assert_eq!(REFRESH_TOKEN_COOKIE, "refresh_token");
}
