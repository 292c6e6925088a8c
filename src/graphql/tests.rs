//! End-to-end tests for the GraphQL schema
//!
//! Exercises the full resolver set against an in-memory store: the auth
//! flow, posting, voting, the feed, and the subscription change feed.

use std::time::Duration;

use async_graphql::{Request, Response, Variables};
use futures::StreamExt;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

use crate::db::{CreateLink, CreateVote, Database};
use crate::graphql::auth::RequestAuth;
use crate::graphql::{build_schema, LinknestSchema};
use crate::services::{AuthConfig, AuthService};

async fn test_schema() -> (LinknestSchema, Database, AuthService) {
    let db = Database::connect_in_memory().await.unwrap();
    db.migrate().await.unwrap();

    let auth = AuthService::new(AuthConfig {
        app_secret: "test-secret".to_string(),
        token_lifetime: 3600,
        bcrypt_cost: 4,
    });

    let schema = build_schema(db.clone(), auth.clone());
    (schema, db, auth)
}

fn data(resp: Response) -> Value {
    assert!(
        resp.errors.is_empty(),
        "unexpected errors: {:?}",
        resp.errors
    );
    resp.data.into_json().unwrap()
}

fn error_code(resp: &Response) -> String {
    assert!(!resp.errors.is_empty(), "expected an error");
    let err = serde_json::to_value(&resp.errors[0]).unwrap();
    err["extensions"]["code"]
        .as_str()
        .expect("error carries no code extension")
        .to_string()
}

async fn signup(schema: &LinknestSchema, email: &str, password: &str, name: &str) -> Value {
    let resp = schema
        .execute(
            Request::new(
                "mutation Signup($email: String!, $password: String!, $name: String!) {
                    signup(email: $email, password: $password, name: $name) {
                        token
                        user { id name email }
                    }
                }",
            )
            .variables(Variables::from_json(json!({
                "email": email,
                "password": password,
                "name": name,
            }))),
        )
        .await;
    data(resp)
}

async fn login(schema: &LinknestSchema, email: &str, password: &str) -> Response {
    schema
        .execute(
            Request::new(
                "mutation Login($email: String!, $password: String!) {
                    login(email: $email, password: $password) {
                        token
                        user { id }
                    }
                }",
            )
            .variables(Variables::from_json(json!({
                "email": email,
                "password": password,
            }))),
        )
        .await
}

fn post_request(url: &str, description: &str) -> Request {
    Request::new(
        "mutation Post($url: String!, $description: String!) {
            post(url: $url, description: $description) { id url description }
        }",
    )
    .variables(Variables::from_json(json!({
        "url": url,
        "description": description,
    })))
}

async fn feed(schema: &LinknestSchema) -> Value {
    let resp = schema
        .execute("{ feed { url description postedBy { email } } }")
        .await;
    data(resp)
}

#[tokio::test]
async fn info_describes_the_api() {
    let (schema, _db, _auth) = test_schema().await;
    let payload = data(schema.execute("{ info }").await);
    assert_eq!(payload["info"], "This is the API of a Hackernews clone");
}

#[tokio::test]
async fn signup_returns_token_bound_to_the_user() {
    let (schema, _db, auth) = test_schema().await;

    let payload = signup(&schema, "a@x.com", "pw123456", "Alice").await;
    let token = payload["signup"]["token"].as_str().unwrap();
    let user_id = payload["signup"]["user"]["id"].as_str().unwrap();

    assert!(!token.is_empty());
    assert_eq!(payload["signup"]["user"]["email"], "a@x.com");
    assert_eq!(auth.validate_token(token).unwrap(), user_id);
}

#[tokio::test]
async fn signup_with_taken_email_fails() {
    let (schema, _db, _auth) = test_schema().await;

    signup(&schema, "a@x.com", "pw123456", "Alice").await;

    let resp = schema
        .execute(
            Request::new(
                r#"mutation {
                    signup(email: "a@x.com", password: "other-pw", name: "Impostor") { token }
                }"#,
            ),
        )
        .await;
    assert_eq!(error_code(&resp), "DUPLICATE_USER");
}

#[tokio::test]
async fn login_after_signup_yields_the_same_subject() {
    let (schema, _db, auth) = test_schema().await;

    let payload = signup(&schema, "a@x.com", "pw123456", "Alice").await;
    let signup_subject = auth
        .validate_token(payload["signup"]["token"].as_str().unwrap())
        .unwrap();

    let payload = data(login(&schema, "a@x.com", "pw123456").await);
    let login_subject = auth
        .validate_token(payload["login"]["token"].as_str().unwrap())
        .unwrap();

    assert_eq!(signup_subject, login_subject);
    assert_eq!(payload["login"]["user"]["id"].as_str().unwrap(), login_subject);
}

#[tokio::test]
async fn login_failures_are_distinguishable_but_share_a_message() {
    let (schema, _db, _auth) = test_schema().await;
    signup(&schema, "a@x.com", "pw123456", "Alice").await;

    let unknown = login(&schema, "nobody@x.com", "pw123456").await;
    let wrong_pw = login(&schema, "a@x.com", "wrong").await;

    assert_eq!(error_code(&unknown), "USER_NOT_FOUND");
    assert_eq!(error_code(&wrong_pw), "INVALID_CREDENTIALS");
    // The human-readable message must not reveal which emails exist.
    assert_eq!(unknown.errors[0].message, wrong_pw.errors[0].message);
}

#[tokio::test]
async fn post_without_subject_fails_and_writes_nothing() {
    let (schema, _db, _auth) = test_schema().await;

    let resp = schema
        .execute(post_request("https://example.com", "no auth"))
        .await;
    assert_eq!(error_code(&resp), "UNAUTHENTICATED");

    let resp = schema
        .execute(post_request("https://example.com", "bad token").data(RequestAuth::Invalid))
        .await;
    assert_eq!(error_code(&resp), "INVALID_TOKEN");

    // No link was created as a side effect.
    let payload = feed(&schema).await;
    assert_eq!(payload["feed"], json!([]));
}

#[tokio::test]
async fn feed_reflects_posted_links() {
    let (schema, _db, _auth) = test_schema().await;

    let payload = signup(&schema, "a@x.com", "pw123456", "Alice").await;
    let user_id = payload["signup"]["user"]["id"].as_str().unwrap().to_string();

    assert_eq!(feed(&schema).await["feed"], json!([]));

    let resp = schema
        .execute(
            post_request("https://news.example.com", "a news site")
                .data(RequestAuth::Subject(user_id)),
        )
        .await;
    data(resp);

    let payload = feed(&schema).await;
    assert_eq!(
        payload["feed"],
        json!([{
            "url": "https://news.example.com",
            "description": "a news site",
            "postedBy": { "email": "a@x.com" },
        }])
    );
}

#[tokio::test]
async fn feed_supports_filter_and_pagination() {
    let (schema, db, _auth) = test_schema().await;

    let payload = signup(&schema, "a@x.com", "pw123456", "Alice").await;
    let user_id = payload["signup"]["user"]["id"].as_str().unwrap().to_string();

    for (url, description) in [
        ("https://one.example.com", "first rust post"),
        ("https://two.example.com", "second post"),
        ("https://three.example.com", "third rust post"),
    ] {
        db.links()
            .create(CreateLink {
                url: url.to_string(),
                description: description.to_string(),
                posted_by: user_id.clone(),
            })
            .await
            .unwrap();
    }

    let payload = data(
        schema
            .execute(r#"{ feed(filter: "rust") { url } }"#)
            .await,
    );
    assert_eq!(
        payload["feed"],
        json!([
            { "url": "https://one.example.com" },
            { "url": "https://three.example.com" },
        ])
    );

    let payload = data(schema.execute("{ feed(skip: 1, first: 1) { url } }").await);
    assert_eq!(payload["feed"], json!([{ "url": "https://two.example.com" }]));
}

#[tokio::test]
async fn vote_flow_enforces_the_one_vote_invariant() {
    let (schema, db, _auth) = test_schema().await;

    let payload = signup(&schema, "a@x.com", "pw123456", "Alice").await;
    let user_id = payload["signup"]["user"]["id"].as_str().unwrap().to_string();

    let link = db
        .links()
        .create(CreateLink {
            url: "https://example.com".to_string(),
            description: "example".to_string(),
            posted_by: user_id.clone(),
        })
        .await
        .unwrap();

    let vote_query = format!(
        r#"mutation {{ vote(linkId: "{}") {{ id user {{ id }} link {{ id }} }} }}"#,
        link.id
    );

    // Anonymous votes are rejected outright.
    let resp = schema.execute(Request::new(vote_query.clone())).await;
    assert_eq!(error_code(&resp), "UNAUTHENTICATED");

    let payload = data(
        schema
            .execute(Request::new(vote_query.clone()).data(RequestAuth::Subject(user_id.clone())))
            .await,
    );
    assert_eq!(payload["vote"]["user"]["id"], user_id.as_str());
    assert_eq!(payload["vote"]["link"]["id"], link.id.as_str());

    let resp = schema
        .execute(Request::new(vote_query).data(RequestAuth::Subject(user_id.clone())))
        .await;
    assert_eq!(error_code(&resp), "ALREADY_VOTED");

    let resp = schema
        .execute(
            Request::new(r#"mutation { vote(linkId: "no-such-link") { id } }"#)
                .data(RequestAuth::Subject(user_id)),
        )
        .await;
    assert_eq!(error_code(&resp), "LINK_NOT_FOUND");
}

#[tokio::test]
async fn new_link_subscription_delivers_created_links() {
    let (schema, db, _auth) = test_schema().await;

    let payload = signup(&schema, "a@x.com", "pw123456", "Alice").await;
    let user_id = payload["signup"]["user"]["id"].as_str().unwrap().to_string();

    let mut stream = schema
        .execute_stream(Request::new(
            "subscription { newLink { url description } }",
        ))
        .boxed();

    // Give the subscription a moment to attach to the change feed before
    // creating the link.
    let writer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        db.links()
            .create(CreateLink {
                url: "https://example.com".to_string(),
                description: "fresh link".to_string(),
                posted_by: user_id,
            })
            .await
            .unwrap();
    });

    let payload = data(stream.next().await.unwrap());
    assert_eq!(
        payload["newLink"],
        json!({ "url": "https://example.com", "description": "fresh link" })
    );

    writer.await.unwrap();
}

#[tokio::test]
async fn new_vote_subscription_delivers_cast_votes() {
    let (schema, db, _auth) = test_schema().await;

    let payload = signup(&schema, "a@x.com", "pw123456", "Alice").await;
    let user_id = payload["signup"]["user"]["id"].as_str().unwrap().to_string();

    let link = db
        .links()
        .create(CreateLink {
            url: "https://example.com".to_string(),
            description: "example".to_string(),
            posted_by: user_id.clone(),
        })
        .await
        .unwrap();

    let mut stream = schema
        .execute_stream(Request::new(
            "subscription { newVote { user { id } link { url } } }",
        ))
        .boxed();

    let voter_id = user_id.clone();
    let writer = tokio::spawn(async move {
        tokio::time::sleep(Duration::from_millis(100)).await;
        db.votes()
            .create(CreateVote {
                user_id: voter_id,
                link_id: link.id,
            })
            .await
            .unwrap();
    });

    let payload = data(stream.next().await.unwrap());
    assert_eq!(payload["newVote"]["user"]["id"], user_id.as_str());
    assert_eq!(payload["newVote"]["link"]["url"], "https://example.com");

    writer.await.unwrap();
}
