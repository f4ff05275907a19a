//! Guest wizard over HTTP: one question per step, login gate at the halfway
//! mark, session resume and claim after login.

#[macro_use]
mod common;

use actix_web::http::{header, StatusCode};
use actix_web::test;
use serde_json::{json, Value};

use common::{bearer, context, empty_template, lease_template, template, variable, GUEST_ID};
use smartfill_server::guest::GUEST_ID_HEADER;

#[actix_web::test]
async fn test_guest_id_header_is_required() {
    let lease = lease_template();
    let ctx = context(vec![lease.clone()]);
    let app = init_app!(ctx.state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/guest/templates/{}", lease.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn test_template_without_variables_is_not_configured_for_guests() {
    let empty = empty_template();
    let ctx = context(vec![empty.clone()]);
    let app = init_app!(ctx.state);

    let req = test::TestRequest::get()
        .uri(&format!("/api/guest/templates/{}", empty.id))
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[actix_web::test]
async fn test_guest_walks_up_to_the_gate() {
    let lease = lease_template();
    let ctx = context(vec![lease.clone()]);
    let app = init_app!(ctx.state);
    let base = format!("/api/guest/templates/{}", lease.id);

    let req = test::TestRequest::get()
        .uri(&base)
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["resumed"], false);
    assert_eq!(body["total_steps"], 4);
    assert_eq!(body["allowed_steps"], 2);
    assert_eq!(body["view"]["locked"], false);
    assert_eq!(body["view"]["next_action"], "next");

    // Required field left empty
    let req = test::TestRequest::post()
        .uri(&format!("{base}/advance"))
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .set_json(json!({ "formData": { "nom": "" } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["outcome"], "blocked");
    assert_eq!(body["errors"][0]["field"], "nom");
    assert_eq!(body["state"]["current_step"], 0);

    let req = test::TestRequest::post()
        .uri(&format!("{base}/advance"))
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .set_json(json!({ "formData": { "nom": "Alice" } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["outcome"], "moved");
    assert_eq!(body["view"]["current_step"], 1);
    assert_eq!(body["view"]["locked"], true);
    assert_eq!(body["view"]["next_action"], "login");

    // The gated step is read-only and cannot be passed
    let req = test::TestRequest::post()
        .uri(&format!("{base}/advance"))
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .set_json(json!({ "formData": { "age": "30", "adresse": "Lyon" } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["outcome"], "login_required");
    assert_eq!(body["state"]["current_step"], 1);
    assert_eq!(body["state"]["values"], json!({ "nom": "Alice" }));

    // Reload resumes the stored session
    let req = test::TestRequest::get()
        .uri(&base)
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["resumed"], true);
    assert_eq!(body["session"]["currentStepIndex"], 1);
    assert_eq!(body["session"]["formData"]["nom"], "Alice");
    assert_eq!(body["view"]["label"], "step 1");
}

#[actix_web::test]
async fn test_sessions_are_scoped_per_guest() {
    let lease = lease_template();
    let ctx = context(vec![lease.clone()]);
    let app = init_app!(ctx.state);
    let base = format!("/api/guest/templates/{}", lease.id);

    let req = test::TestRequest::post()
        .uri(&format!("{base}/advance"))
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .set_json(json!({ "formData": { "nom": "Alice" } }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::get()
        .uri(&base)
        .insert_header((GUEST_ID_HEADER, "another-guest"))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["resumed"], false);
    assert_eq!(body["session"]["formData"], json!({}));
}

#[actix_web::test]
async fn test_two_variables_require_login_after_first_step() {
    let short = template(
        "Attestation",
        "{nom} {ville}",
        json!([variable("nom", "Nom", false), variable("ville", "Ville", false)]),
    );
    let ctx = context(vec![short.clone()]);
    let app = init_app!(ctx.state);
    let base = format!("/api/guest/templates/{}", short.id);

    let req = test::TestRequest::get()
        .uri(&base)
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["allowed_steps"], 1);
    assert_eq!(body["view"]["locked"], false);
    assert_eq!(body["view"]["next_action"], "login");

    let req = test::TestRequest::post()
        .uri(&format!("{base}/advance"))
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .set_json(json!({ "formData": { "nom": "Alice", "ville": "Lyon" } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["outcome"], "login_required");
    assert_eq!(body["state"]["values"], json!({ "nom": "Alice" }));
}

#[actix_web::test]
async fn test_single_variable_guest_can_finish() {
    let single = template("Mot", "{mot}", json!([variable("mot", "Mot", true)]));
    let ctx = context(vec![single.clone()]);
    let app = init_app!(ctx.state);

    let req = test::TestRequest::post()
        .uri(&format!("/api/guest/templates/{}/advance", single.id))
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .set_json(json!({ "formData": { "mot": "bonjour" } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["outcome"], "completed");
    assert_eq!(body["view"]["next_action"], "finish");
}

#[actix_web::test]
async fn test_back_and_session_update() {
    let lease = lease_template();
    let ctx = context(vec![lease.clone()]);
    let app = init_app!(ctx.state);
    let base = format!("/api/guest/templates/{}", lease.id);

    let req = test::TestRequest::post()
        .uri(&format!("{base}/advance"))
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .set_json(json!({ "formData": { "nom": "Alice" } }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("{base}/back"))
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["session"]["currentStepIndex"], 0);
    assert_eq!(body["view"]["can_go_back"], false);

    // Forward jumps are ignored, locked fields are dropped
    let req = test::TestRequest::put()
        .uri(&format!("{base}/session"))
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .set_json(json!({
            "formData": { "nom": "Bob", "age": "41", "inconnu": "x" },
            "currentStepIndex": 3
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["session"]["currentStepIndex"], 0);
    assert_eq!(body["session"]["formData"], json!({ "nom": "Bob" }));
}

#[actix_web::test]
async fn test_delete_session() {
    let lease = lease_template();
    let ctx = context(vec![lease.clone()]);
    let app = init_app!(ctx.state);
    let base = format!("/api/guest/templates/{}", lease.id);

    let req = test::TestRequest::put()
        .uri(&format!("{base}/session"))
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .set_json(json!({ "formData": { "nom": "Alice" } }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::delete()
        .uri(&format!("{base}/session"))
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = test::TestRequest::get()
        .uri(&base)
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["resumed"], false);
}

#[actix_web::test]
async fn test_claim_merges_guest_values_into_blanks() {
    let lease = lease_template();
    let ctx = context(vec![lease.clone()]);
    let app = init_app!(ctx.state);
    let claim_uri = format!("/api/templates/{}/claim-guest-session", lease.id);

    let req = test::TestRequest::post()
        .uri(&format!("/api/guest/templates/{}/advance", lease.id))
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .set_json(json!({ "formData": { "nom": "Alice" } }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&claim_uri)
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .set_json(json!({}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri(&claim_uri)
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .insert_header((header::AUTHORIZATION, bearer("u1")))
        .set_json(json!({ "values": { "nom": "", "ville": "Paris" } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["claimed"], true);
    assert_eq!(body["values"], json!({ "nom": "Alice", "ville": "Paris" }));

    // The guest copy is gone
    let req = test::TestRequest::post()
        .uri(&claim_uri)
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .insert_header((header::AUTHORIZATION, bearer("u1")))
        .set_json(json!({ "values": { "ville": "Paris" } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["claimed"], false);
    assert_eq!(body["values"], json!({ "ville": "Paris" }));
}

#[actix_web::test]
async fn test_claim_keeps_authenticated_values() {
    let lease = lease_template();
    let ctx = context(vec![lease.clone()]);
    let app = init_app!(ctx.state);

    let req = test::TestRequest::put()
        .uri(&format!("/api/guest/templates/{}/session", lease.id))
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .set_json(json!({ "formData": { "nom": "Alice" } }))
        .to_request();
    test::call_service(&app, req).await;

    let req = test::TestRequest::post()
        .uri(&format!("/api/templates/{}/claim-guest-session", lease.id))
        .insert_header((GUEST_ID_HEADER, GUEST_ID))
        .insert_header((header::AUTHORIZATION, bearer("u1")))
        .set_json(json!({ "values": { "nom": "Bob" } }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["values"]["nom"], "Bob");
}
