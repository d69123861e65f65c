use crate::db::valuations::list_valuations;
use crate::errors::ServerError;
use crate::router::handle;
use crate::tests::utils::{
    body_string, form_request, get_request, gulshan_form, login, make_db,
};

#[test]
fn dashboard_requires_login() {
    let db = make_db("dash_anon");

    let resp = handle(get_request("/dashboard", None), &db).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(resp.headers().get("Location").unwrap(), "/login");
}

#[test]
fn save_then_list_on_dashboard() {
    let db = make_db("dash_save");
    let session = login(&db, "owner@example.com");

    let resp = handle(form_request("/valuations", &gulshan_form(), Some(&session)), &db).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(resp.headers().get("Location").unwrap(), "/dashboard");

    let mut resp = handle(get_request("/dashboard", Some(&session)), &db).unwrap();
    assert_eq!(resp.status(), 200);
    let body = body_string(&mut resp);
    assert!(body.contains("owner@example.com"));
    assert!(body.contains("33,000,000"));
    assert!(body.contains("Gulshan, Dhaka"));
}

#[test]
fn dashboard_lists_newest_first() {
    let db = make_db("dash_order");
    let session = login(&db, "order@example.com");

    handle(form_request("/valuations", &gulshan_form(), Some(&session)), &db).unwrap();

    let mut second = gulshan_form();
    second[1] = ("location", "Sylhet");
    handle(form_request("/valuations", &second, Some(&session)), &db).unwrap();

    let mut resp = handle(get_request("/dashboard", Some(&session)), &db).unwrap();
    let body = body_string(&mut resp);
    let sylhet_at = body.find("Sylhet").expect("second record missing");
    let gulshan_at = body.find("Gulshan, Dhaka").expect("first record missing");
    assert!(sylhet_at < gulshan_at, "newest record should be listed first");
}

#[test]
fn saving_requires_login() {
    let db = make_db("save_anon");

    let resp = handle(form_request("/valuations", &gulshan_form(), None), &db).unwrap();
    assert_eq!(resp.status(), 302);
    assert_eq!(resp.headers().get("Location").unwrap(), "/login");
}

#[test]
fn owner_can_delete_their_record() {
    let db = make_db("delete_own");
    let session = login(&db, "deleter@example.com");

    handle(form_request("/valuations", &gulshan_form(), Some(&session)), &db).unwrap();
    // user id 1: first user created in a fresh DB
    let records = list_valuations(&db, 1).unwrap();
    assert_eq!(records.len(), 1);
    let id = records[0].id.to_string();

    let resp = handle(
        form_request("/valuations/delete", &[("id", &id)], Some(&session)),
        &db,
    )
    .unwrap();
    assert_eq!(resp.status(), 302);

    let mut resp = handle(get_request("/dashboard", Some(&session)), &db).unwrap();
    let body = body_string(&mut resp);
    assert!(body.contains("No saved valuations"));
}

#[test]
fn delete_is_scoped_to_the_owner() {
    let db = make_db("delete_foreign");
    let owner = login(&db, "victim@example.com");
    handle(form_request("/valuations", &gulshan_form(), Some(&owner)), &db).unwrap();
    let id = list_valuations(&db, 1).unwrap()[0].id.to_string();

    // A different user tries to delete the record by id.
    let intruder = login(&db, "intruder@example.com");
    let attempt = handle(
        form_request("/valuations/delete", &[("id", &id)], Some(&intruder)),
        &db,
    );
    assert!(matches!(attempt, Err(ServerError::NotFound)));

    // Still there for the owner.
    assert_eq!(list_valuations(&db, 1).unwrap().len(), 1);
}
