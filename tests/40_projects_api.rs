mod common;

use anyhow::Result;
use reqwest::StatusCode;
use serde_json::{json, Value};

const MISSING_ID: &str = "00000000-0000-4000-8000-000000000000";

#[tokio::test]
async fn create_then_list_own_projects() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let cookie = server.login("user@x.com").await?;

    let res = server
        .create_project(&cookie, &common::project_body("Alpha", "PLANNED", false))
        .await?;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = res.json().await?;
    assert_eq!(created["success"], true);
    assert!(created["data"]["id"].is_string());

    let listing: Value = server.get("/app/projects", Some(&cookie)).await?.json().await?;
    let projects = listing["data"]["projects"].as_array().expect("projects array");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"], "Alpha");
    assert_eq!(projects[0]["ownerEmail"], "user@x.com");
    assert_eq!(projects[0]["status"], "PLANNED");
    assert_eq!(projects[0]["statusLabel"], "Planned");
    assert_eq!(projects[0]["isOwner"], true);
    assert_eq!(listing["data"]["filters"], json!({ "status": "all", "search": "" }));
    assert_eq!(listing["data"]["statusOptions"].as_array().map(Vec::len), Some(3));
    Ok(())
}

#[tokio::test]
async fn owners_only_see_their_own_projects() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let alice = server.login("alice@x.com").await?;
    let bob = server.login("bob@x.com").await?;

    server.seed_project(&alice, "Alice Project", "ACTIVE", true).await?;
    server.seed_project(&bob, "Bob Project", "ACTIVE", true).await?;

    let listing: Value = server.get("/app/projects", Some(&alice)).await?.json().await?;
    let names: Vec<&str> = listing["data"]["projects"]
        .as_array()
        .expect("projects array")
        .iter()
        .filter_map(|p| p["name"].as_str())
        .collect();
    assert_eq!(names, vec!["Alice Project"]);
    Ok(())
}

#[tokio::test]
async fn publishing_makes_project_visible_publicly() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let cookie = server.login("user@x.com").await?;

    let id = server.seed_project(&cookie, "Alpha", "PLANNED", false).await?;

    // warm the public list before publishing
    let before: Value = server.get("/projects", None).await?.json().await?;
    assert_eq!(before["data"].as_array().map(Vec::len), Some(0));

    let res = server
        .update_project(&cookie, &id, &common::project_body("Alpha", "ACTIVE", true))
        .await?;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = res.json().await?;
    assert_eq!(body["success"], true);

    let after: Value = server.get("/projects", None).await?.json().await?;
    let projects = after["data"].as_array().expect("public array");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"], "Alpha");
    assert_eq!(projects[0]["status"], "ACTIVE");
    assert_eq!(projects[0]["isOwner"], false);
    Ok(())
}

#[tokio::test]
async fn foreign_mutations_are_forbidden() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let owner = server.login("owner@x.com").await?;
    let intruder = server.login("intruder@x.com").await?;

    let id = server.seed_project(&owner, "Owned", "ACTIVE", false).await?;

    let res = server.delete_project(&intruder, &id).await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "success": false, "error": "Unauthorized" }));

    let res = server
        .update_project(&intruder, &id, &common::project_body("Taken", "DONE", true))
        .await?;
    assert_eq!(res.status(), StatusCode::FORBIDDEN);

    // the owner's project is untouched
    let listing: Value = server.get("/app/projects", Some(&owner)).await?.json().await?;
    assert_eq!(listing["data"]["projects"][0]["name"], "Owned");
    Ok(())
}

#[tokio::test]
async fn invalid_input_returns_first_message() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let cookie = server.login("user@x.com").await?;

    let res = server
        .create_project(&cookie, &common::project_body("ab", "PLANNED", false))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = res.json().await?;
    assert_eq!(body, json!({ "success": false, "error": "Name must be at least 3 characters" }));

    let res = server
        .create_project(&cookie, &json!({ "name": "Valid", "status": "PAUSED", "isPublic": false }))
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);

    let listing: Value = server.get("/app/projects", Some(&cookie)).await?.json().await?;
    assert_eq!(listing["data"]["projects"].as_array().map(Vec::len), Some(0));
    Ok(())
}

#[tokio::test]
async fn missing_projects_are_not_found() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let cookie = server.login("user@x.com").await?;

    let res = server.delete_project(&cookie, MISSING_ID).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    let body: Value = res.json().await?;
    assert_eq!(body["error"], "Project not found");

    let res = server.delete_project(&cookie, "not-a-uuid").await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);

    let res = server
        .update_project(&cookie, MISSING_ID, &common::project_body("Alpha", "DONE", false))
        .await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn delete_removes_project_from_listings() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let cookie = server.login("user@x.com").await?;

    let id = server.seed_project(&cookie, "Shared", "DONE", true).await?;
    let public: Value = server.get("/projects", None).await?.json().await?;
    assert_eq!(public["data"].as_array().map(Vec::len), Some(1));

    let res = server.delete_project(&cookie, &id).await?;
    assert_eq!(res.status(), StatusCode::OK);

    let public: Value = server.get("/projects", None).await?.json().await?;
    assert_eq!(public["data"].as_array().map(Vec::len), Some(0));
    let own: Value = server.get("/app/projects", Some(&cookie)).await?.json().await?;
    assert_eq!(own["data"]["projects"].as_array().map(Vec::len), Some(0));

    let res = server.delete_project(&cookie, &id).await?;
    assert_eq!(res.status(), StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn list_filters_by_status_and_search() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let cookie = server.login("user@x.com").await?;

    server.seed_project(&cookie, "Website Redesign", "ACTIVE", false).await?;
    server.seed_project(&cookie, "Website Launch", "DONE", false).await?;
    server.seed_project(&cookie, "Mobile App", "ACTIVE", false).await?;

    let listing: Value = server
        .get("/app/projects?status=ACTIVE&search=website", Some(&cookie))
        .await?
        .json()
        .await?;
    let projects = listing["data"]["projects"].as_array().expect("projects array");
    assert_eq!(projects.len(), 1);
    assert_eq!(projects[0]["name"], "Website Redesign");
    assert_eq!(listing["data"]["filters"], json!({ "status": "ACTIVE", "search": "website" }));

    // unknown status falls back to all
    let listing: Value = server
        .get("/app/projects?status=bogus", Some(&cookie))
        .await?
        .json()
        .await?;
    assert_eq!(listing["data"]["projects"].as_array().map(Vec::len), Some(3));
    assert_eq!(listing["data"]["filters"]["status"], "all");
    Ok(())
}

#[tokio::test]
async fn malformed_bodies_return_result_envelope() -> Result<()> {
    let server = common::TestServer::spawn().await?;
    let cookie = server.login("user@x.com").await?;
    let expected = json!({ "success": false, "error": "Invalid form data" });

    let res = server
        .client()
        .post(server.url("/app/projects"))
        .header(reqwest::header::COOKIE, &cookie)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("{not json")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, expected);

    let res = server
        .client()
        .post(server.url("/app/projects"))
        .header(reqwest::header::COOKIE, &cookie)
        .header(reqwest::header::CONTENT_TYPE, "text/plain")
        .body("name=Alpha")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, expected);

    let id = server.seed_project(&cookie, "Alpha", "PLANNED", false).await?;
    let res = server
        .client()
        .put(server.url(&format!("/app/projects/{}", id)))
        .header(reqwest::header::COOKIE, &cookie)
        .header(reqwest::header::CONTENT_TYPE, "application/json")
        .body("[1, 2")
        .send()
        .await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, expected);

    // a JSON body that is not an object reaches validation and gets the same message
    let res = server.create_project(&cookie, &json!(["Alpha"])).await?;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    assert_eq!(res.json::<Value>().await?, expected);
    Ok(())
}
