mod common;

use anyhow::Result;
use npi_catalog_api::auth::decode_jwt;
use reqwest::StatusCode;
use serde_json::json;

#[tokio::test]
async fn health_endpoint_responds() -> Result<()> {
    let server = common::spawn_server().await?;

    let (status, body) = server.get_json("/health").await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "ok");
    Ok(())
}

#[tokio::test]
async fn jwt_endpoint_issues_thirty_day_token() -> Result<()> {
    let server = common::spawn_server().await?;
    let before = chrono::Utc::now().timestamp();

    let (status, body) = server.get_json("/jwt/u123/a@b.com").await?;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().expect("token string");
    let claims = decode_jwt(token, common::SECRET)?;
    assert_eq!(claims.uid, "u123");
    assert_eq!(claims.email.as_deref(), Some("a@b.com"));

    let thirty_days = 30 * 24 * 60 * 60;
    let after = chrono::Utc::now().timestamp();
    assert!(claims.exp >= before + thirty_days - 5, "exp too early: {}", claims.exp);
    assert!(claims.exp <= after + thirty_days + 5, "exp too late: {}", claims.exp);
    Ok(())
}

#[tokio::test]
async fn add_activity_without_header_is_unauthorized() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/add-activity"))
        .json(&json!({ "title": "t" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(res.json::<serde_json::Value>().await?["error"], true);
    Ok(())
}

#[tokio::test]
async fn delete_activity_without_header_is_unauthorized() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .delete(server.url("/activities/65a1b2c3d4e5f60718293a4b"))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn wrongly_signed_token_is_forbidden() -> Result<()> {
    let server = common::spawn_server().await?;
    server.seed_user("boss", "admin").await?;
    let forged = common::token_for("boss", "not-the-server-secret");

    let res = server
        .client
        .post(server.url("/add-activity"))
        .bearer_auth(&forged)
        .json(&json!({ "title": "t" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body = res.json::<serde_json::Value>().await?;
    assert_eq!(body["message"], "Access denied");
    assert_eq!(server.store.len(npi_catalog_api::store::Collection::Activities).await, 0);
    Ok(())
}

#[tokio::test]
async fn malformed_authorization_header_is_forbidden() -> Result<()> {
    let server = common::spawn_server().await?;

    for header in ["Bearer", "Bearer garbage", "Token abc.def.ghi"] {
        let res = server
            .client
            .delete(server.url("/activities/65a1b2c3d4e5f60718293a4b"))
            .header("authorization", header)
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::FORBIDDEN, "header {:?}", header);
    }
    Ok(())
}

#[tokio::test]
async fn non_admin_user_is_forbidden() -> Result<()> {
    let server = common::spawn_server().await?;
    server.seed_user("shopper", "user").await?;
    let token = common::token_for("shopper", common::SECRET);

    let res = server
        .client
        .post(server.url("/add-activity"))
        .bearer_auth(&token)
        .json(&json!({ "title": "t" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.json::<serde_json::Value>().await?["message"], "Access denied");
    Ok(())
}

#[tokio::test]
async fn unknown_user_is_forbidden() -> Result<()> {
    let server = common::spawn_server().await?;
    let token = common::token_for("ghost", common::SECRET);

    let res = server
        .client
        .delete(server.url("/activities/65a1b2c3d4e5f60718293a4b"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    Ok(())
}

#[tokio::test]
async fn token_from_jwt_endpoint_admits_admin() -> Result<()> {
    let server = common::spawn_server().await?;
    server.seed_user("boss", "admin").await?;

    let (_, body) = server.get_json("/jwt/boss/boss@example.com").await?;
    let token = body["token"].as_str().expect("token string").to_string();

    let res = server
        .client
        .post(server.url("/add-activity"))
        .bearer_auth(&token)
        .json(&json!({
            "title": "Trade fair",
            "shortDescription": "We exhibited",
            "activityCover": "https://cdn.example.com/fair.jpg",
            "post": "<p>Long form</p>"
        }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::OK);

    let ack = res.json::<serde_json::Value>().await?;
    assert_eq!(ack["acknowledged"], true);
    assert!(ack["insertedId"].is_string());
    Ok(())
}

#[tokio::test]
async fn empty_authorization_header_is_unauthorized() -> Result<()> {
    let server = common::spawn_server().await?;

    let res = server
        .client
        .post(server.url("/add-activity"))
        .header("authorization", "")
        .json(&json!({ "title": "t" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn wrongly_signed_token_cannot_delete() -> Result<()> {
    let server = common::spawn_server().await?;
    server.seed_user("boss", "admin").await?;
    let forged = common::token_for("boss", "not-the-server-secret");

    let res = server
        .client
        .delete(server.url("/activities/65a1b2c3d4e5f60718293a4b"))
        .bearer_auth(&forged)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.json::<serde_json::Value>().await?["message"], "Access denied");
    Ok(())
}

#[tokio::test]
async fn non_admin_user_cannot_delete() -> Result<()> {
    let server = common::spawn_server().await?;
    server.seed_user("shopper", "user").await?;
    let token = common::token_for("shopper", common::SECRET);

    let res = server
        .client
        .delete(server.url("/activities/65a1b2c3d4e5f60718293a4b"))
        .bearer_auth(&token)
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(res.json::<serde_json::Value>().await?["message"], "Access denied");
    Ok(())
}

#[tokio::test]
async fn expired_token_is_forbidden() -> Result<()> {
    let server = common::spawn_server().await?;
    server.seed_user("boss", "admin").await?;
    let issued = chrono::Utc::now().timestamp() - 40 * 24 * 60 * 60;
    let token = common::sign_payload(
        &json!({ "uid": "boss", "email": "boss@example.com", "iat": issued, "exp": issued + 3600 }),
        common::SECRET,
    );

    let res = server
        .client
        .post(server.url("/add-activity"))
        .bearer_auth(&token)
        .json(&json!({ "title": "t" }))
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    assert_eq!(server.store.len(npi_catalog_api::store::Collection::Activities).await, 0);
    Ok(())
}

#[tokio::test]
async fn externally_issued_token_without_email_or_iat_admits_admin() -> Result<()> {
    let server = common::spawn_server().await?;
    server.seed_user("boss", "admin").await?;
    let exp = chrono::Utc::now().timestamp() + 3600;

    let payloads = [
        json!({ "uid": "boss", "exp": exp }),
        json!({ "uid": "boss", "email": "boss@example.com", "exp": exp }),
    ];
    for payload in payloads {
        let token = common::sign_payload(&payload, common::SECRET);
        let res = server
            .client
            .post(server.url("/add-activity"))
            .bearer_auth(&token)
            .json(&json!({ "title": "From elsewhere" }))
            .send()
            .await?;
        assert_eq!(res.status(), StatusCode::OK, "payload {}", payload);
    }
    assert_eq!(server.store.len(npi_catalog_api::store::Collection::Activities).await, 2);
    Ok(())
}

#[tokio::test]
async fn unknown_route_is_not_found() -> Result<()> {
    let server = common::spawn_server().await?;

    let (status, body) = server.get_json("/nope").await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
    Ok(())
}
