use axum::body::{Body, Bytes};
use axum::http::{Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::Value;
use std::io::Write;
use tower::ServiceExt;

fn build_tiny_app() -> Router {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    writeln!(f, "id,title,overview,genres,keywords").unwrap();
    writeln!(f, "603,The Matrix,hacker learns reality is simulated,Action,hacker simulation").unwrap();
    writeln!(f, "604,The Matrix Reloaded,hacker fights machines,Action,hacker sequel").unwrap();
    writeln!(f, "10,Notting Hill,bookshop owner meets actress,Romance,london").unwrap();
    writeln!(f, "11,Amelie,,,").unwrap();
    server::build_app(&f.path().to_string_lossy(), &Default::default()).unwrap()
}

async fn call(app: Router, uri: &str) -> (StatusCode, Bytes) {
    let req = Request::get(uri).body(Body::empty()).unwrap();
    let resp = app.oneshot(req).await.unwrap();
    let status = resp.status();
    let body = resp.into_body().collect().await.unwrap().to_bytes();
    (status, body)
}

#[tokio::test]
async fn recommend_returns_ranked_results() {
    let (status, body) = call(build_tiny_app(), "/recommend?title=the%20matrix&k=2").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["found"], Value::Bool(true));
    let arr = json["results"].as_array().unwrap();
    assert_eq!(arr.len(), 2);
    assert_eq!(arr[0]["id"].as_i64().unwrap(), 604);
    assert_eq!(arr[0]["rank"].as_u64().unwrap(), 1);
    assert_eq!(arr[0]["url"], "https://www.themoviedb.org/movie/604");
    // tie at zero similarity keeps dataset order
    assert_eq!(arr[1]["id"].as_i64().unwrap(), 10);
}

#[tokio::test]
async fn unknown_title_is_not_found_not_error() {
    let (status, body) = call(build_tiny_app(), "/recommend?title=Not%20A%20Real%20Movie%20Title").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["found"], Value::Bool(false));
    assert!(json["results"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn k_defaults_and_clamps() {
    let (_, body) = call(build_tiny_app(), "/recommend?title=Amelie").await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["results"].as_array().unwrap().len(), 3);

    let (_, body) = call(build_tiny_app(), "/recommend?title=Amelie&k=0").await;
    let json: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(json["results"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn missing_title_param_is_rejected() {
    let (status, _) = call(build_tiny_app(), "/recommend?k=3").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn titles_are_sorted() {
    let (status, body) = call(build_tiny_app(), "/titles").await;
    assert_eq!(status, StatusCode::OK);
    let json: Value = serde_json::from_slice(&body).unwrap();
    let titles: Vec<&str> = json["titles"].as_array().unwrap().iter().map(|v| v.as_str().unwrap()).collect();
    assert_eq!(titles, vec!["Amelie", "Notting Hill", "The Matrix", "The Matrix Reloaded"]);
}

#[test]
fn unreadable_dataset_fails_startup() {
    assert!(server::build_app("/definitely/not/here.csv", &Default::default()).is_err());
}
