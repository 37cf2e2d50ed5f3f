//! Image generation endpoint tests.
//!
//! Tests verify:
//! - Default parameters render a PNG
//! - Each validation rule maps to 400 with its exact message
//! - Percent-encoded colors are accepted
//! - Encoder overflow maps to 500
//! - Unparseable query strings still get a JSON error body

use axum::http::StatusCode;
use serde_json::json;

use super::test_utils::{body_bytes, body_json, content_type, is_png, TestApp, EMAIL};

async fn generate(query: &str) -> (StatusCode, String, axum::body::Bytes) {
    let app = TestApp::with_user().await;
    let cookie = app.cookie_for(EMAIL);

    let response = app
        .get(&format!("/api/qrcode/generate?{}", query), Some(&cookie))
        .await;
    let status = response.status();
    let content_type = content_type(&response).to_string();
    (status, content_type, body_bytes(response).await)
}

async fn generate_error(query: &str) -> (StatusCode, serde_json::Value) {
    let app = TestApp::with_user().await;
    let cookie = app.cookie_for(EMAIL);

    let response = app
        .get(&format!("/api/qrcode/generate?{}", query), Some(&cookie))
        .await;
    let status = response.status();
    (status, body_json(response).await)
}

// =============================================================================
// Successful Generation
// =============================================================================

#[tokio::test]
async fn test_generate_png_with_explicit_defaults() {
    let (status, content_type, body) = generate(
        "contents=test&size=250&correction=L&type=png&fcolor=%23000000&bcolor=%23FFFFFF&margin=4",
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "image/png");
    assert!(is_png(&body));

    let decoded = image::load_from_memory(&body).unwrap();
    assert_eq!(decoded.width(), 250);
    assert_eq!(decoded.height(), 250);
}

#[tokio::test]
async fn test_generate_only_contents() {
    let (status, content_type, body) = generate("contents=hello").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "image/png");
    assert!(!body.is_empty());
}

#[tokio::test]
async fn test_generate_jpeg_and_gif() {
    let (status, content_type, body) = generate("contents=hello&type=jpeg").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "image/jpeg");
    assert_eq!(&body[..2], &[0xFF, 0xD8]);

    let (status, content_type, body) = generate("contents=hello&type=GIF").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(content_type, "image/gif");
    assert_eq!(&body[..6], b"GIF89a");
}

#[tokio::test]
async fn test_generate_percent_encoded_colors() {
    // %2523 decodes to %23 in the query string, then to '#'
    let (status, _, body) =
        generate("contents=colors&fcolor=%2523FF0000&bcolor=%23FFFF00").await;
    assert_eq!(status, StatusCode::OK);

    let decoded = image::load_from_memory(&body).unwrap().to_rgb8();
    assert_eq!(decoded.get_pixel(0, 0).0, [0xFF, 0xFF, 0x00]);
    assert!(decoded.pixels().any(|p| p.0 == [0xFF, 0x00, 0x00]));
}

#[tokio::test]
async fn test_generate_named_colors() {
    let (status, _, body) = generate("contents=named&fcolor=purple&bcolor=Gray").await;
    assert_eq!(status, StatusCode::OK);

    let decoded = image::load_from_memory(&body).unwrap().to_rgb8();
    assert_eq!(decoded.get_pixel(0, 0).0, [0x80, 0x80, 0x80]);
    assert!(decoded.pixels().any(|p| p.0 == [0x80, 0x00, 0x80]));
}

// =============================================================================
// Validation Failures
// =============================================================================

#[tokio::test]
async fn test_generate_invalid_size() {
    let (status, body) = generate_error("contents=test&size=999").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Image size must be between 150 and 350 pixels"})
    );
}

#[tokio::test]
async fn test_generate_invalid_format() {
    let (status, body) = generate_error("contents=test&type=bmp").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        body,
        json!({"error": "Only png, jpeg and gif image types are supported"})
    );
}

#[tokio::test]
async fn test_generate_each_rule_message() {
    let cases = [
        ("contents=%20%20", "Contents cannot be null or blank"),
        ("size=300", "Contents cannot be null or blank"),
        (
            "contents=x&correction=X",
            "Permitted error correction levels are L, M, Q, H",
        ),
        (
            "contents=x&fcolor=%2312345",
            "Color must be a valid color name or hex code (#RRGGBB)",
        ),
        (
            "contents=x&bcolor=orange",
            "Color must be a valid color name or hex code (#RRGGBB)",
        ),
        ("contents=x&margin=51", "Margin must be between 0 and 50 pixels"),
        ("contents=x&margin=-1", "Margin must be between 0 and 50 pixels"),
    ];

    for (query, message) in cases {
        let (status, body) = generate_error(query).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "query {}", query);
        assert_eq!(body["error"], message, "query {}", query);
    }
}

#[tokio::test]
async fn test_generate_first_violation_reported() {
    let (status, body) =
        generate_error("contents=x&size=10&correction=Z&type=bmp&margin=99").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Image size must be between 150 and 350 pixels");
}

#[tokio::test]
async fn test_generate_non_numeric_size() {
    let (status, body) = generate_error("contents=x&size=big").await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid parameter value 'big' for 'size'");
}

#[tokio::test]
async fn test_generate_duplicate_query_key() {
    for query in ["contents=a&contents=b", "contents=a&size=200&size=300"] {
        let app = TestApp::with_user().await;
        let cookie = app.cookie_for(EMAIL);

        let response = app
            .get(&format!("/api/qrcode/generate?{}", query), Some(&cookie))
            .await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "query {}", query);
        assert_eq!(content_type(&response), "application/json");

        let body = body_json(response).await;
        let message = body["error"].as_str().unwrap();
        assert!(message.starts_with("Invalid query string: "), "{}", message);
        assert!(message.contains("duplicate field"), "{}", message);
        assert_eq!(body.as_object().unwrap().len(), 1);
    }
}

#[tokio::test]
async fn test_generate_content_too_long() {
    let contents = "a".repeat(3000);
    let (status, body) =
        generate_error(&format!("contents={}&correction=H", contents)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"error": "Error during image processing"}));
}
