use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{body_string, form_request, gulshan_form, json_request, make_db};

#[test]
fn estimate_renders_expected_figures() {
    let db = make_db("estimate");

    let req = form_request("/estimate", &gulshan_form(), None);
    let mut resp = handle(req, &db).unwrap();
    assert_eq!(resp.status(), 200);

    let body = body_string(&mut resp);
    assert!(body.contains("33,000,000"), "missing point estimate");
    assert!(body.contains("29,700,000"), "missing low estimate");
    assert!(body.contains("36,300,000"), "missing high estimate");
    assert!(body.contains("22,000"), "missing price per sqft");
    assert!(body.contains("Similar Properties"));
    assert!(body.contains("Market Context"));
}

#[test]
fn estimate_rejects_non_positive_area() {
    let db = make_db("bad_area");

    let mut form = gulshan_form();
    form[2] = ("area_sqft", "0");
    let req = form_request("/estimate", &form, None);

    assert!(matches!(
        handle(req, &db),
        Err(ServerError::BadRequest(_))
    ));
}

#[test]
fn estimate_rejects_unknown_condition() {
    let db = make_db("bad_condition");

    let mut form = gulshan_form();
    form[6] = ("condition", "pristine");
    let req = form_request("/estimate", &form, None);

    assert!(matches!(
        handle(req, &db),
        Err(ServerError::BadRequest(_))
    ));
}

#[test]
fn estimate_rejects_oversized_body() {
    let db = make_db("oversized_body");

    // Well past the 64 KiB body limit; must come back as an error rather
    // than being parsed from a truncated prefix.
    let filler = "x".repeat(80 * 1024);
    let mut form = gulshan_form();
    form.push(("amenity", filler.as_str()));
    let req = form_request("/estimate", &form, None);

    assert!(matches!(
        handle(req, &db),
        Err(ServerError::BadRequest(_))
    ));
}

#[test]
fn validation_error_page_escapes_echoed_input() {
    let db = make_db("escaped_error");

    let mut form = gulshan_form();
    form[6] = ("condition", "<script>alert(1)</script>");
    let req = form_request("/estimate", &form, None);

    let err = handle(req, &db).unwrap_err();
    let mut resp = crate::responses::error_to_response(err);
    assert_eq!(resp.status(), 400);

    let body = body_string(&mut resp);
    assert!(!body.contains("<script>alert(1)</script>"));
    assert!(body.contains("&lt;script&gt;"));
}

#[test]
fn unknown_location_is_estimated_with_default_rate() {
    let db = make_db("unknown_location");

    let mut form = gulshan_form();
    form[1] = ("location", "Nowhere");
    let req = form_request("/estimate", &form, None);
    let mut resp = handle(req, &db).unwrap();
    assert_eq!(resp.status(), 200);

    // 6000 default rate x 1500 sqft
    let body = body_string(&mut resp);
    assert!(body.contains("9,000,000"));
}

#[test]
fn api_estimate_returns_full_payload() {
    let db = make_db("api_estimate");

    let payload = r#"{
        "propertyType": "apartment",
        "location": "Gulshan, Dhaka",
        "areaSqft": 1500,
        "condition": "good"
    }"#;
    let mut resp = handle(json_request("/api/estimate", payload), &db).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        "application/json"
    );

    let body = body_string(&mut resp);
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();

    assert_eq!(json["result"]["estimatedValue"], 33_000_000);
    assert_eq!(json["result"]["lowEstimate"], 29_700_000);
    assert_eq!(json["result"]["highEstimate"], 36_300_000);
    assert_eq!(json["comparables"].as_array().unwrap().len(), 4);

    let listings = json["market"]["activeListings"].as_i64().unwrap();
    assert!((50..=199).contains(&listings));
    let dom = json["market"]["avgDaysOnMarket"].as_i64().unwrap();
    assert!((20..=79).contains(&dom));
}

#[test]
fn api_estimate_rejects_malformed_payload() {
    let db = make_db("api_bad");

    let payload = r#"{ "location": "Gulshan, Dhaka" }"#;
    assert!(matches!(
        handle(json_request("/api/estimate", payload), &db),
        Err(ServerError::BadRequest(_))
    ));
}

#[test]
fn unknown_route_is_not_found() {
    let db = make_db("not_found");
    let req = crate::tests::utils::get_request("/no-such-page", None);
    assert!(matches!(handle(req, &db), Err(ServerError::NotFound)));
}
