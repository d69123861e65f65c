use crate::auth::magic::{redeem_magic_link, MagicLinkConfig, MagicLinkService};
use crate::auth::sessions::{load_user_from_session, revoke_session, SESSION_TTL_SECS};
use crate::db::valuations::{delete_valuation, find_valuation, list_valuations, save_valuation};
use crate::db::Database;
use crate::domain::market::{comparables, synthesize, Comparable, MarketSnapshot};
use crate::domain::valuation::{run_valuation, ValuationInput, ValuationResult};
use crate::errors::ServerError;
use crate::responses::{
    clear_session_cookie, html_response, json_response, redirect_response, session_cookie,
    ResultResp,
};
use crate::spreadsheets::export_valuation_report;
use crate::templates::pages::{
    check_email_page, dashboard_page, home_page, login_page, results_page, DashboardVm, ResultsVm,
};
use astra::{Body, Request};
use serde::Serialize;
use std::io::Read;
use std::time::{SystemTime, UNIX_EPOCH};

// Request bodies are small forms or JSON payloads; anything bigger is junk.
const MAX_BODY_BYTES: u64 = 64 * 1024;

pub fn handle(req: Request, db: &Database) -> ResultResp {
    let method = req.method().as_str().to_string();
    let path = req.uri().path().to_string();
    let query = parse_pairs(req.uri().query().unwrap_or(""));
    let session = session_token_from_cookie(&req);
    let body = req.into_body();

    match (method.as_str(), path.as_str()) {
        ("GET", "/") => {
            let signed_in = current_user(db, session.as_deref())?.is_some();
            html_response(home_page(signed_in))
        }

        ("POST", "/estimate") => estimate_route(db, session.as_deref(), body),
        ("POST", "/estimate/export") => estimate_export_route(body),
        ("POST", "/api/estimate") => api_estimate_route(body),

        ("POST", "/valuations") => save_valuation_route(db, session.as_deref(), body),
        ("GET", "/dashboard") => dashboard_route(db, session.as_deref()),
        ("POST", "/valuations/delete") => delete_valuation_route(db, session.as_deref(), body),
        ("GET", "/valuations/export") => export_saved_route(db, session.as_deref(), &query),

        ("GET", "/login") => html_response(login_page()),
        ("POST", "/login") => request_login_route(db, body),
        ("GET", "/auth/magic") => redeem_route(db, &query),
        ("POST", "/logout") => logout_route(db, session.as_deref()),

        _ => Err(ServerError::NotFound),
    }
}

/// Compute an estimate from the submitted form and render the results page.
fn estimate_route(db: &Database, session: Option<&str>, body: Body) -> ResultResp {
    let pairs = parse_form(body)?;
    let input = ValuationInput::from_form(&pairs)?;
    let result = run_valuation(&input)?;
    let market = synthesize(&input.location);
    let comps = comparables(&input.location, input.property_type, input.area_sqft);
    let signed_in = current_user(db, session)?.is_some();

    html_response(results_page(&ResultsVm {
        input,
        result,
        market,
        comparables: comps,
        signed_in,
    }))
}

/// Same compute path as /estimate, but responds with the XLSX report.
fn estimate_export_route(body: Body) -> ResultResp {
    let pairs = parse_form(body)?;
    let input = ValuationInput::from_form(&pairs)?;
    let result = run_valuation(&input)?;
    let market = synthesize(&input.location);
    export_valuation_report(&input, &result, Some(&market))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ApiEstimateResponse {
    result: ValuationResult,
    market: MarketSnapshot,
    comparables: Vec<Comparable>,
}

/// JSON twin of the form endpoint.
fn api_estimate_route(body: Body) -> ResultResp {
    let bytes = read_body(body)?;
    let input: ValuationInput = serde_json::from_slice(&bytes)
        .map_err(|e| ServerError::BadRequest(format!("invalid estimate payload: {e}")))?;
    let result = run_valuation(&input)?;
    let market = synthesize(&input.location);
    let comps = comparables(&input.location, input.property_type, input.area_sqft);

    json_response(&ApiEstimateResponse {
        result,
        market,
        comparables: comps,
    })
}

fn save_valuation_route(db: &Database, session: Option<&str>, body: Body) -> ResultResp {
    let Some((user_id, _)) = current_user(db, session)? else {
        return redirect_response("/login", None);
    };
    let pairs = parse_form(body)?;
    let input = ValuationInput::from_form(&pairs)?;
    let result = run_valuation(&input)?;
    save_valuation(db, user_id, &input, &result)?;
    redirect_response("/dashboard", None)
}

fn dashboard_route(db: &Database, session: Option<&str>) -> ResultResp {
    let Some((user_id, email)) = current_user(db, session)? else {
        return redirect_response("/login", None);
    };
    let records = list_valuations(db, user_id)?;
    html_response(dashboard_page(&DashboardVm { email, records }))
}

fn delete_valuation_route(db: &Database, session: Option<&str>, body: Body) -> ResultResp {
    let Some((user_id, _)) = current_user(db, session)? else {
        return redirect_response("/login", None);
    };
    let pairs = parse_form(body)?;
    let id = pair_value(&pairs, "id")
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| ServerError::BadRequest("missing valuation id".into()))?;
    delete_valuation(db, user_id, id)?;
    redirect_response("/dashboard", None)
}

/// Re-export a saved valuation. No market block: the snapshot taken with the
/// original estimate was ephemeral and is not stored.
fn export_saved_route(
    db: &Database,
    session: Option<&str>,
    query: &[(String, String)],
) -> ResultResp {
    let Some((user_id, _)) = current_user(db, session)? else {
        return redirect_response("/login", None);
    };
    let id = pair_value(query, "id")
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or_else(|| ServerError::BadRequest("missing valuation id".into()))?;
    let record = find_valuation(db, user_id, id)?.ok_or(ServerError::NotFound)?;
    export_valuation_report(&record.to_input(), &record.result, None)
}

fn request_login_route(db: &Database, body: Body) -> ResultResp {
    let pairs = parse_form(body)?;
    let email = pair_value(&pairs, "email")
        .ok_or_else(|| ServerError::BadRequest("missing email".into()))?;

    let issued = db.with_conn(|conn| {
        let svc = MagicLinkService::new(MagicLinkConfig::default());
        svc.request_link(conn, email, now_unix())
    })?;

    // Mail delivery isn't wired up; the link lands in the server log.
    println!("magic link for {}: {}", issued.email, issued.link);

    html_response(check_email_page(&issued.email))
}

fn redeem_route(db: &Database, query: &[(String, String)]) -> ResultResp {
    let token = pair_value(query, "token")
        .ok_or_else(|| ServerError::BadRequest("missing token".into()))?;

    let redeemed = redeem_magic_link(db, token, now_unix())?;
    let cookie = session_cookie(&redeemed.session_token, SESSION_TTL_SECS);
    redirect_response("/dashboard", Some(&cookie))
}

fn logout_route(db: &Database, session: Option<&str>) -> ResultResp {
    if let Some(token) = session {
        db.with_conn(|conn| revoke_session(conn, token, now_unix()))?;
    }
    redirect_response("/", Some(&clear_session_cookie()))
}

// --- request plumbing ---

fn now_unix() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs() as i64)
        .unwrap_or(0)
}

fn read_body(mut body: Body) -> Result<Vec<u8>, ServerError> {
    let mut bytes = Vec::new();
    // Read one byte past the limit so an oversized body is detected and
    // rejected instead of silently parsed as a truncated form.
    body.reader()
        .take(MAX_BODY_BYTES + 1)
        .read_to_end(&mut bytes)
        .map_err(|e| ServerError::BadRequest(format!("could not read body: {e}")))?;
    if bytes.len() as u64 > MAX_BODY_BYTES {
        return Err(ServerError::BadRequest("request body too large".into()));
    }
    Ok(bytes)
}

/// Decode an application/x-www-form-urlencoded body into key/value pairs.
/// Repeated keys (amenity checkboxes) are preserved.
fn parse_form(body: Body) -> Result<Vec<(String, String)>, ServerError> {
    let bytes = read_body(body)?;
    Ok(url::form_urlencoded::parse(&bytes).into_owned().collect())
}

fn parse_pairs(encoded: &str) -> Vec<(String, String)> {
    url::form_urlencoded::parse(encoded.as_bytes())
        .into_owned()
        .collect()
}

fn pair_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
        .filter(|v| !v.is_empty())
}

fn session_token_from_cookie(req: &Request) -> Option<String> {
    let header = req.headers().get("Cookie")?.to_str().ok()?;
    header
        .split(';')
        .map(str::trim)
        .find_map(|part| part.strip_prefix("session="))
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Resolve the session cookie, if any, to (user_id, email).
fn current_user(db: &Database, session: Option<&str>) -> Result<Option<(i64, String)>, ServerError> {
    let Some(token) = session else {
        return Ok(None);
    };
    db.with_conn(|conn| load_user_from_session(conn, token, now_unix()))
}
