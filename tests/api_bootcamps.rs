//! Bootcamp endpoints through the router

mod common;

use axum::http::StatusCode;
use bootcamp_api::store::{Document, DocumentId, DocumentStore};
use common::{TestApp, MAX_UPLOAD};
use serde_json::{json, Value};

const BOSTON: &str = "233 Bay State Rd Boston MA 02215";
const KINGSTON: &str = "45 Upper College Rd Kingston RI 02881";
const LOWELL: &str = "220 Pawtucket St Lowell MA 01854";
const LOS_ANGELES: &str = "1 Main St Los Angeles CA 90012";

fn names(body: &Value) -> Vec<String> {
    body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|b| b["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn health_reports_ok() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn create_then_get_bootcamp() {
    let app = TestApp::new().await;
    let id = app.create_bootcamp("Devworks Bootcamp", BOSTON).await;

    let (status, body) = app.get(&format!("/api/v1/bootcamps/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let bootcamp = &body["data"];
    assert_eq!(bootcamp["slug"], "devworks-bootcamp");
    assert_eq!(bootcamp["location"]["type"], "Point");
    assert_eq!(bootcamp["location"]["coordinates"], json!([-71.1045, 42.3509]));
    assert_eq!(bootcamp["location"]["city"], "Boston");
    assert!(bootcamp.get("address").is_none());
    assert_eq!(bootcamp["photo"], "no-photo.jpg");
    assert_eq!(bootcamp["housing"], false);
    assert_eq!(bootcamp["courses"], json!([]));
}

#[tokio::test]
async fn create_reports_every_validation_failure() {
    let app = TestApp::new().await;
    let (status, body) = app
        .post(
            "/api/v1/bootcamps",
            json!({"website": "not a url", "careers": ["Juggling"]}),
        )
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
    assert_eq!(body["statusCode"], 400);
    let message = body["message"].as_str().unwrap();
    for expected in [
        "Please add a name",
        "Please add a description",
        "Please use a valid URL with HTTP or HTTPS",
        "Please add an address",
        "Careers must be among",
    ] {
        assert!(message.contains(expected), "{} missing from {}", expected, message);
    }
}

#[tokio::test]
async fn duplicate_name_names_the_field() {
    let app = TestApp::new().await;
    app.create_bootcamp("Devworks Bootcamp", BOSTON).await;

    let (status, body) = app
        .post(
            "/api/v1/bootcamps",
            json!({
                "name": "Devworks Bootcamp",
                "description": "again",
                "address": KINGSTON,
                "careers": ["Other"]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Duplicate field value entered for name");
}

#[tokio::test]
async fn malformed_json_uses_the_envelope() {
    let app = TestApp::new().await;
    let request = axum::http::Request::builder()
        .method("POST")
        .uri("/api/v1/bootcamps")
        .header("content-type", "application/json")
        .body(axum::body::Body::from("{not json"))
        .unwrap();

    let (status, body) = app.send(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn malformed_and_missing_ids_are_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app.get("/api/v1/bootcamps/5d713995b721c3bb38c1f5d0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(
        body["message"],
        "No bootcamp with the id of 5d713995b721c3bb38c1f5d0"
    );

    let missing = DocumentId::new().to_string();
    let (status, body) = app
        .put(&format!("/api/v1/bootcamps/{}", missing), json!({"housing": true}))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn update_returns_new_state() {
    let app = TestApp::new().await;
    let id = app.create_bootcamp("Devworks Bootcamp", BOSTON).await;

    let (status, body) = app
        .put(
            &format!("/api/v1/bootcamps/{}", id),
            json!({"housing": "true", "name": "ModernTech Bootcamp", "address": KINGSTON}),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["housing"], true);
    assert_eq!(body["data"]["slug"], "moderntech-bootcamp");
    assert_eq!(body["data"]["location"]["zipcode"], "02881");

    let (status, body) = app
        .put(&format!("/api/v1/bootcamps/{}", id), json!({"averageRating": 11}))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Rating can not be more than 10");
}

#[tokio::test]
async fn list_filters_selects_sorts_and_pages() {
    let app = TestApp::new().await;
    app.create_bootcamp("Alpha", BOSTON).await;
    app.create_bootcamp("Bravo", KINGSTON).await;
    app.create_bootcamp("Charlie", LOWELL).await;

    let (status, body) = app
        .get("/api/v1/bootcamps?select=name,description&sort=name&limit=2&page=1")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(names(&body), vec!["Alpha", "Bravo"]);
    assert_eq!(body["pagination"], json!({"next": {"page": 2, "limit": 2}}));
    for bootcamp in body["data"].as_array().unwrap() {
        let mut keys: Vec<_> = bootcamp.as_object().unwrap().keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["description", "id", "name"]);
    }

    let (_, body) = app.get("/api/v1/bootcamps?sort=-name&limit=2&page=2").await;
    assert_eq!(names(&body), vec!["Alpha"]);
    assert_eq!(body["pagination"], json!({"prev": {"page": 1, "limit": 2}}));

    let (_, body) = app.get("/api/v1/bootcamps?location.city=Boston").await;
    assert_eq!(names(&body), vec!["Alpha"]);

    let (_, body) = app
        .get("/api/v1/bootcamps?careers[in]=Business&select=name&sort=name")
        .await;
    assert_eq!(names(&body), vec!["Alpha", "Bravo", "Charlie"]);
}

#[tokio::test]
async fn list_defaults_to_newest_first() {
    let app = TestApp::new().await;
    app.create_bootcamp("First", BOSTON).await;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    app.create_bootcamp("Second", KINGSTON).await;

    let (_, body) = app.get("/api/v1/bootcamps?limit=abc&page=-1").await;
    assert_eq!(names(&body), vec!["Second", "First"]);
}

#[tokio::test]
async fn unknown_operator_is_rejected() {
    let app = TestApp::new().await;
    let (status, body) = app.get("/api/v1/bootcamps?averageCost[ne]=10").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn reserved_keys_with_operators_do_not_filter() {
    let app = TestApp::new().await;
    app.create_bootcamp("Alpha", BOSTON).await;
    app.create_bootcamp("Bravo", KINGSTON).await;

    let (status, body) = app
        .get("/api/v1/bootcamps?page[gt]=1&limit[lte]=5&select=&sort=")
        .await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    assert_eq!(body["count"], 2);
    assert!(body["data"][0].get("location").is_some());
}

#[tokio::test]
async fn comparison_query_example() {
    let app = TestApp::new().await;
    for (name, tuition) in [("A", 3000), ("B", 5000), ("C", 9000), ("D", 7000)] {
        let mut doc = Document::new();
        doc.insert("name".into(), json!(name));
        doc.insert("tuition".into(), json!(tuition));
        doc.insert("createdAt".into(), json!("2024-01-01T00:00:00.000Z"));
        app.store.insert("bootcamps", doc).await.unwrap();
    }

    let (status, body) = app
        .get("/api/v1/bootcamps?tuition[gte]=5000&sort=-tuition&select=name,tuition&limit=2&page=1")
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);
    assert_eq!(names(&body), vec!["C", "D"]);
    for bootcamp in body["data"].as_array().unwrap() {
        assert!(bootcamp["tuition"].as_i64().unwrap() >= 5000);
        assert_eq!(bootcamp.as_object().unwrap().len(), 3);
    }
}

#[tokio::test]
async fn radius_search() {
    let app = TestApp::new().await;
    app.create_bootcamp("Boston", BOSTON).await;
    app.create_bootcamp("Lowell", LOWELL).await;
    app.create_bootcamp("Kingston", KINGSTON).await;
    app.create_bootcamp("LA", LOS_ANGELES).await;

    let (status, body) = app.get("/api/v1/bootcamps/radius/02118/30").await;
    assert_eq!(status, StatusCode::OK);
    let mut found = names(&body);
    found.sort();
    assert_eq!(found, vec!["Boston", "Lowell"]);
    assert_eq!(body["count"], 2);

    let (_, body) = app.get("/api/v1/bootcamps/radius/02118/100").await;
    assert_eq!(body["count"], 3);

    let (status, _) = app.get("/api/v1/bootcamps/radius/99999/10").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_cascades_to_courses() {
    let app = TestApp::new().await;
    let id = app.create_bootcamp("Devworks Bootcamp", BOSTON).await;
    let other = app.create_bootcamp("Other Bootcamp", KINGSTON).await;
    for title in ["One", "Two", "Three"] {
        app.create_course(&id, title, 1000).await;
    }
    app.create_course(&other, "Kept", 1000).await;

    let (status, body) = app.delete(&format!("/api/v1/bootcamps/{}", id)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"success": true, "data": {}}));

    let (status, _) = app.get(&format!("/api/v1/bootcamps/{}", id)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = app.get(&format!("/api/v1/bootcamps/{}/courses", id)).await;
    assert_eq!(body["count"], 0);
    let (_, body) = app.get("/api/v1/courses").await;
    assert_eq!(body["count"], 1);
}

#[tokio::test]
async fn photo_upload() {
    let app = TestApp::new().await;
    let id = app.create_bootcamp("Devworks Bootcamp", BOSTON).await;
    let uri = format!("/api/v1/bootcamps/{}/photo", id);

    let (status, body) = app.upload(&uri, "file", "campus.jpg", "image/jpeg", b"jpeg-bytes").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let expected = format!("photo_{}.jpg", id);
    assert_eq!(body["data"], json!(expected));
    assert!(app.uploads.path().join(&expected).exists());

    let (_, body) = app.get(&format!("/api/v1/bootcamps/{}", id)).await;
    assert_eq!(body["data"]["photo"], json!(expected));

    let (status, _) = app.get(&format!("/uploads/{}", expected)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = app.upload(&uri, "file", "campus.png", "image/png", b"png-bytes").await;
    assert_eq!(status, StatusCode::OK, "{}", body);
    let replaced = format!("photo_{}.png", id);
    assert_eq!(body["data"], json!(replaced));
    assert!(app.uploads.path().join(&replaced).exists());
    assert!(!app.uploads.path().join(&expected).exists());

    app.delete(&format!("/api/v1/bootcamps/{}", id)).await;
    assert!(!app.uploads.path().join(&replaced).exists());
}

#[tokio::test]
async fn photo_upload_rejections() {
    let app = TestApp::new().await;
    let id = app.create_bootcamp("Devworks Bootcamp", BOSTON).await;
    let uri = format!("/api/v1/bootcamps/{}/photo", id);

    let (status, body) = app.upload(&uri, "file", "notes.txt", "text/plain", b"hi").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please upload an image file");

    let big = vec![0u8; MAX_UPLOAD as usize + 1];
    let (status, body) = app.upload(&uri, "file", "big.png", "image/png", &big).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body["message"],
        format!("Please upload an image less than {} bytes", MAX_UPLOAD)
    );

    let (status, body) = app.upload(&uri, "other", "a.png", "image/png", b"x").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please upload a file");

    let (status, body) = app.put(&uri, json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Please upload a file");

    let missing = format!("/api/v1/bootcamps/{}/photo", DocumentId::new());
    let (status, _) = app.upload(&missing, "file", "a.png", "image/png", b"x").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
