use crate::auth::magic::{MagicLinkConfig, MagicLinkService};
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{
    body_string, form_request, get_request, login, make_db, now_unix,
};

#[test]
fn login_post_shows_check_email_page() {
    let db = make_db("login_post");

    let mut resp = handle(
        form_request("/login", &[("email", "  New@Example.COM ")], None),
        &db,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);

    // Email is normalized before the user row is created.
    let body = body_string(&mut resp);
    assert!(body.contains("new@example.com"));

    db.with_conn(|conn| {
        let count: i64 = conn
            .query_row(
                "select count(*) from users where email = 'new@example.com'",
                [],
                |r| r.get(0),
            )
            .map_err(|e| ServerError::DbError(e.to_string()))?;
        assert_eq!(count, 1);
        Ok(())
    })
    .unwrap();
}

#[test]
fn magic_link_redeems_once_and_sets_session() {
    let db = make_db("magic_redeem");

    let token = db
        .with_conn(|conn| {
            let svc = MagicLinkService::new(MagicLinkConfig::default());
            Ok(svc.request_link(conn, "once@example.com", now_unix())?.token)
        })
        .unwrap();

    let resp = handle(get_request(&format!("/auth/magic?token={token}"), None), &db).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(resp.headers().get("Location").unwrap(), "/dashboard");
    let cookie = resp
        .headers()
        .get("Set-Cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.starts_with("session="));
    assert!(cookie.contains("HttpOnly"));

    // Single use: a second redemption is rejected.
    let again = handle(get_request(&format!("/auth/magic?token={token}"), None), &db);
    assert!(matches!(again, Err(ServerError::Unauthorized(_))));
}

#[test]
fn bogus_magic_token_is_rejected() {
    let db = make_db("magic_bogus");
    let resp = handle(get_request("/auth/magic?token=not-a-real-token", None), &db);
    assert!(matches!(resp, Err(ServerError::Unauthorized(_))));
}

#[test]
fn logout_revokes_the_session() {
    let db = make_db("logout");
    let session = login(&db, "leaver@example.com");

    // Session works before logout.
    let resp = handle(get_request("/dashboard", Some(&session)), &db).unwrap();
    assert_eq!(resp.status(), 200);

    let resp = handle(form_request("/logout", &[], Some(&session)), &db).unwrap();
    assert_eq!(resp.status(), 302);
    let cookie = resp
        .headers()
        .get("Set-Cookie")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(cookie.contains("Max-Age=0"));

    // Revoked session no longer grants access.
    let resp = handle(get_request("/dashboard", Some(&session)), &db).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(resp.headers().get("Location").unwrap(), "/login");
}
