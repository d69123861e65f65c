use crate::db::valuations::list_valuations;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{
    body_bytes, form_request, get_request, gulshan_form, login, make_db,
};

const XLSX_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

#[test]
fn estimate_export_downloads_a_workbook() {
    let db = make_db("export_fresh");

    let mut resp = handle(form_request("/estimate/export", &gulshan_form(), None), &db).unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        XLSX_CONTENT_TYPE
    );
    let disposition = resp
        .headers()
        .get("Content-Disposition")
        .and_then(|v| v.to_str().ok())
        .unwrap();
    assert!(disposition.contains("valuation_gulshan.xlsx"));

    // XLSX is a zip container.
    let bytes = body_bytes(&mut resp);
    assert!(bytes.starts_with(b"PK\x03\x04"));
}

#[test]
fn saved_record_exports_for_its_owner() {
    let db = make_db("export_saved");
    let session = login(&db, "exporter@example.com");

    handle(form_request("/valuations", &gulshan_form(), Some(&session)), &db).unwrap();
    let id = list_valuations(&db, 1).unwrap()[0].id;

    let mut resp = handle(
        get_request(&format!("/valuations/export?id={id}"), Some(&session)),
        &db,
    )
    .unwrap();
    assert_eq!(resp.status(), 200);
    assert_eq!(
        resp.headers().get("Content-Type").unwrap(),
        XLSX_CONTENT_TYPE
    );
    assert!(body_bytes(&mut resp).starts_with(b"PK\x03\x04"));
}

#[test]
fn saved_export_is_scoped_to_the_owner() {
    let db = make_db("export_foreign");
    let owner = login(&db, "holder@example.com");
    handle(form_request("/valuations", &gulshan_form(), Some(&owner)), &db).unwrap();
    let id = list_valuations(&db, 1).unwrap()[0].id;

    let snoop = login(&db, "snoop@example.com");
    let attempt = handle(
        get_request(&format!("/valuations/export?id={id}"), Some(&snoop)),
        &db,
    );
    assert!(matches!(attempt, Err(ServerError::NotFound)));
}

#[test]
fn saved_export_requires_login() {
    let db = make_db("export_anon");
    let resp = handle(get_request("/valuations/export?id=1", None), &db).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(resp.headers().get("Location").unwrap(), "/login");
}
