use axum::http::{HeaderMap, HeaderValue, header};
use axum_extra::extract::cookie::CookieJar;
use mallang_console::{
    models::TokenPair,
    session::{self, ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE, Session, SessionToken},
};
use time::Duration;

fn jar_with(cookie: &str) -> CookieJar {
    let mut headers = HeaderMap::new();
    headers.insert(header::COOKIE, HeaderValue::from_str(cookie).unwrap());
    CookieJar::from_headers(&headers)
}

fn pair() -> TokenPair {
    TokenPair {
        access_token: "tok-a".to_string(),
        refresh_token: "tok-r".to_string(),
    }
}

#[test]
fn test_reads_tokens_by_exact_name() {
    let session = Session::from_jar(&jar_with(
        "xaccessToken=nope; accessToken=abc123; refreshToken=r1",
    ));
    assert_eq!(session.access.unwrap().as_str(), "abc123");
    assert_eq!(session.refresh.unwrap().as_str(), "r1");
}

#[test]
fn test_empty_cookie_value_is_not_a_token() {
    let session = Session::from_jar(&jar_with("accessToken="));
    assert!(!session.is_authenticated());
    assert!(SessionToken::new("").is_none());
}

#[test]
fn test_token_is_opaque_and_kept_verbatim() {
    // Not a JWT, not base64: the console never looks inside.
    let session = Session::from_jar(&jar_with("accessToken=a.b.c~!"));
    assert_eq!(session.access.unwrap().as_str(), "a.b.c~!");
}

#[test]
fn test_cookie_header_lists_only_present_tokens() {
    let session = Session::from_jar(&jar_with("accessToken=abc123"));
    assert_eq!(session.cookie_header().as_deref(), Some("accessToken=abc123"));
    assert_eq!(Session::default().cookie_header(), None);
}

#[test]
fn test_cookie_header_keeps_encoded_separators_encoded() {
    // `%3B` decodes to `;`; forwarding it raw would split the token into
    // extra cookie pairs on the backend side.
    let session = Session::from_jar(&jar_with("accessToken=a%3Bb%3Dc; refreshToken=r%25"));
    assert_eq!(session.access.as_ref().unwrap().as_str(), "a;b=c");
    assert_eq!(
        session.cookie_header().as_deref(),
        Some("accessToken=a%3Bb%3Dc; refreshToken=r%25")
    );
}

#[test]
fn test_debug_output_never_contains_token() {
    let session = Session::from_jar(&session::establish(CookieJar::new(), &pair(), false));
    let rendered = format!("{:?} {:?}", session, pair());
    assert!(!rendered.contains("tok-a"));
    assert!(!rendered.contains("tok-r"));
}

#[test]
fn test_establish_writes_both_cookies() {
    let jar = session::establish(CookieJar::new(), &pair(), true);

    let access = jar.get(ACCESS_TOKEN_COOKIE).unwrap();
    assert_eq!(access.value(), "tok-a");
    assert_eq!(access.path(), Some("/"));
    assert_eq!(access.secure(), Some(true));
    assert_eq!(access.http_only(), Some(true));
    assert_eq!(jar.get(REFRESH_TOKEN_COOKIE).unwrap().value(), "tok-r");

    // What the guard will see on the next navigation.
    let session = Session::from_jar(&jar);
    assert!(session.is_authenticated());
}

#[test]
fn test_clear_expires_both_cookies() {
    let jar = session::establish(CookieJar::new(), &pair(), false);
    let jar = session::clear(jar, false);

    for name in [ACCESS_TOKEN_COOKIE, REFRESH_TOKEN_COOKIE] {
        let cookie = jar.get(name).unwrap();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(Duration::ZERO));
    }
    assert!(!Session::from_jar(&jar).is_authenticated());
}
