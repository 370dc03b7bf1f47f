use super::*;

// =============================================================================
// bearer_from_jar — the cookie is the sole authentication signal.
// =============================================================================

#[test]
fn bearer_absent_without_cookie() {
    let jar = CookieJar::new();
    assert_eq!(bearer_from_jar(&jar), None);
}

#[test]
fn bearer_reads_access_cookie() {
    let jar = CookieJar::new().add(Cookie::new(ACCESS_TOKEN_COOKIE, "tok-123"));
    assert_eq!(bearer_from_jar(&jar), Some("tok-123".to_owned()));
}

#[test]
fn bearer_ignores_empty_cookie() {
    let jar = CookieJar::new().add(Cookie::new(ACCESS_TOKEN_COOKIE, ""));
    assert_eq!(bearer_from_jar(&jar), None);
}

#[test]
fn bearer_ignores_other_cookies() {
    let jar = CookieJar::new().add(Cookie::new("theme", "dark"));
    assert_eq!(bearer_from_jar(&jar), None);
}

#[test]
fn bearer_prefers_exact_cookie_name() {
    let jar = CookieJar::new()
        .add(Cookie::new("access_token_old", "stale"))
        .add(Cookie::new(ACCESS_TOKEN_COOKIE, "fresh"));
    assert_eq!(bearer_from_jar(&jar), Some("fresh".to_owned()));
}

// =============================================================================
// redirect target — fixed external contract.
// =============================================================================

#[test]
fn register_redirect_is_stable() {
    assert_eq!(REGISTER_REDIRECT, "/register");
}
