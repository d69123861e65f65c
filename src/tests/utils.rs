use crate::auth::magic::{redeem_magic_link, MagicLinkConfig, MagicLinkService};
use crate::db::connection::init_db;
use crate::db::connection::Database;
use astra::{Body, Request, Response};
use http::Method;
use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

/// Fresh test DB (unique temp file) using the production schema.
pub fn make_db(tag: &str) -> Database {
    let path = std::env::temp_dir().join(format!(
        "propval_test_{tag}_{}.sqlite",
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap()
            .as_nanos()
    ));
    let db = Database::new(path);
    init_db(&db, "sql/schema.sql").expect("Failed to initialize DB");
    db
}

pub fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap()
        .as_secs() as i64
}

/// Sign a user in end to end: request a magic link, redeem it, hand back
/// the raw session token for the cookie.
pub fn login(db: &Database, email: &str) -> String {
    let token = db
        .with_conn(|conn| {
            let svc = MagicLinkService::new(MagicLinkConfig::default());
            let issued = svc.request_link(conn, email, now_unix())?;
            Ok(issued.token)
        })
        .unwrap();

    redeem_magic_link(db, &token, now_unix())
        .unwrap()
        .session_token
}

pub fn get_request(path: &str, session: Option<&str>) -> Request {
    let mut req = Request::new(Body::empty());
    *req.method_mut() = Method::GET;
    *req.uri_mut() = path.parse().unwrap();
    if let Some(token) = session {
        req.headers_mut()
            .insert("Cookie", format!("session={token}").parse().unwrap());
    }
    req
}

pub fn form_request(path: &str, pairs: &[(&str, &str)], session: Option<&str>) -> Request {
    let mut serializer = url::form_urlencoded::Serializer::new(String::new());
    for (k, v) in pairs {
        serializer.append_pair(k, v);
    }
    let encoded = serializer.finish();

    let mut req = Request::new(Body::from(encoded));
    *req.method_mut() = Method::POST;
    *req.uri_mut() = path.parse().unwrap();
    req.headers_mut().insert(
        "Content-Type",
        "application/x-www-form-urlencoded".parse().unwrap(),
    );
    if let Some(token) = session {
        req.headers_mut()
            .insert("Cookie", format!("session={token}").parse().unwrap());
    }
    req
}

pub fn json_request(path: &str, json: &str) -> Request {
    let mut req = Request::new(Body::from(json.to_string()));
    *req.method_mut() = Method::POST;
    *req.uri_mut() = path.parse().unwrap();
    req.headers_mut()
        .insert("Content-Type", "application/json".parse().unwrap());
    req
}

pub fn body_bytes(resp: &mut Response) -> Vec<u8> {
    let mut bytes = Vec::new();
    resp.body_mut().reader().read_to_end(&mut bytes).unwrap();
    bytes
}

pub fn body_string(resp: &mut Response) -> String {
    String::from_utf8(body_bytes(resp)).unwrap()
}

/// A form that prices a Gulshan apartment at exactly 33,000,000 BDT
/// (22000 base rate x 1500 sqft, all multipliers at 1.0).
pub fn gulshan_form() -> Vec<(&'static str, &'static str)> {
    vec![
        ("property_type", "apartment"),
        ("location", "Gulshan, Dhaka"),
        ("area_sqft", "1500"),
        ("bedrooms", "3"),
        ("bathrooms", "2"),
        ("age_years", "0"),
        ("condition", "good"),
    ]
}
