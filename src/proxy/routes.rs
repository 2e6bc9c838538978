use std::collections::{BTreeMap, HashMap};

use axum::{
    body::Bytes,
    extract::{Query, State},
    Json,
};
use http::header;
use serde::Serialize;
use serde_json::{json, Value};

use super::error::ProxyError;
use super::ProxyState;

// ═══════════════════════════════════════════════════════════════
// POST /fetch-video
// ═══════════════════════════════════════════════════════════════

/// Response metadata of the fetched video, shaped like a browser `Response`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FetchedResponse {
    pub status: u16,
    pub status_text: String,
    pub headers: BTreeMap<String, String>,
    pub ok: bool,
    pub redirected: bool,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub url: String,
}

pub async fn fetch_video(
    State(st): State<ProxyState>,
    body: Bytes,
) -> Result<Json<Value>, ProxyError> {
    let video_url = serde_json::from_slice::<Value>(&body)
        .ok()
        .and_then(|v| v.get("videoUrl").and_then(Value::as_str).map(str::to_owned))
        .filter(|url| !url.is_empty())
        .ok_or(ProxyError::InvalidVideoUrl)?;

    tracing::info!(url = %video_url, "fetch-video");
    let response = st
        .client
        .get(&video_url)
        .header(header::ACCEPT, "video/*")
        .send()
        .await
        .map_err(|e| {
            tracing::error!(url = %video_url, error = %e, "fetch-video request failed");
            ProxyError::from(e)
        })?;

    let status = response.status();
    if !status.is_success() {
        tracing::warn!(url = %video_url, status = status.as_u16(), "fetch-video upstream not ok");
    }

    let mut headers = BTreeMap::new();
    for (name, value) in response.headers() {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        headers
            .entry(name.as_str().to_string())
            .and_modify(|existing: &mut String| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }

    let final_url = response.url().to_string();
    let redirected = reqwest::Url::parse(&video_url)
        .map(|requested| requested.as_str() != final_url)
        .unwrap_or(false);

    let data = FetchedResponse {
        status: status.as_u16(),
        status_text: status.canonical_reason().unwrap_or_default().to_string(),
        headers,
        ok: status.is_success(),
        redirected,
        kind: "basic",
        url: final_url,
    };
    Ok(Json(json!({ "success": true, "data": data })))
}

// ═══════════════════════════════════════════════════════════════
// GET /youtube?video_id=
// ═══════════════════════════════════════════════════════════════

pub async fn youtube_info(
    State(st): State<ProxyState>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<Json<Value>, ProxyError> {
    let video_id = params
        .get("video_id")
        .filter(|id| !id.is_empty())
        .ok_or(ProxyError::MissingParameter("video_id"))?;

    let url = format!(
        "{}/api/v1/youtube/web/get_video_info_v2?video_id={}",
        st.cfg.video_info_base_url.trim_end_matches('/'),
        urlencoding::encode(video_id)
    );
    tracing::info!(video_id = %video_id, "youtube video info");

    let mut request = st
        .client
        .get(&url)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = st.cfg.video_info_token.as_deref() {
        request = request.bearer_auth(token);
    }

    let response = request.send().await.map_err(|e| {
        tracing::error!(video_id = %video_id, error = %e, "video info request failed");
        ProxyError::from(e)
    })?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        tracing::warn!(video_id = %video_id, status = status.as_u16(), "video info upstream not ok");
        return Err(ProxyError::Upstream { status, body });
    }

    let data: Value = response.json().await?;
    Ok(Json(data))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProxyConfig;
    use axum::{
        response::{IntoResponse, Response},
        routing::get,
        Router,
    };
    use http::{HeaderMap, StatusCode};

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    async fn spawn_upstream(app: Router) -> String {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{}", addr)
    }

    fn state(base_url: &str) -> ProxyState {
        ProxyState::new(ProxyConfig {
            video_info_base_url: base_url.to_string(),
            video_info_token: Some("test-token".to_string()),
            ..ProxyConfig::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_fetch_video_requires_url() {
        for body in [r#"{}"#, r#"{"videoUrl": 5}"#, r#"{"videoUrl": ""}"#, "not json"] {
            let response = fetch_video(State(state("http://unused")), Bytes::from(body))
                .await
                .into_response();
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
            let json = body_json(response).await;
            assert!(json.get("error").is_some());
            assert!(json.get("success").is_none());
        }
    }

    #[tokio::test]
    async fn test_youtube_requires_video_id() {
        let response = youtube_info(State(state("http://unused")), Query(HashMap::new()))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["success"], json!(false));
    }

    #[tokio::test]
    async fn test_youtube_forwards_json_verbatim() {
        let upstream = Router::new().route(
            "/api/v1/youtube/web/get_video_info_v2",
            get(
                |headers: HeaderMap, Query(q): Query<HashMap<String, String>>| async move {
                    let auth = headers
                        .get(header::AUTHORIZATION)
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or_default()
                        .to_string();
                    Json(json!({ "code": 200, "id": q.get("video_id"), "auth": auth }))
                },
            ),
        );
        let base = spawn_upstream(upstream).await;
        let mut params = HashMap::new();
        params.insert("video_id".to_string(), "abc123".to_string());

        let response = youtube_info(State(state(&base)), Query(params)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["id"], json!("abc123"));
        assert_eq!(json["auth"], json!("Bearer test-token"));
    }

    #[tokio::test]
    async fn test_youtube_surfaces_upstream_status() {
        let upstream = Router::new().route(
            "/api/v1/youtube/web/get_video_info_v2",
            get(|| async { (StatusCode::TOO_MANY_REQUESTS, "slow down") }),
        );
        let base = spawn_upstream(upstream).await;
        let mut params = HashMap::new();
        params.insert("video_id".to_string(), "abc123".to_string());

        let response = youtube_info(State(state(&base)), Query(params)).await.into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
        let json = body_json(response).await;
        assert_eq!(json["status"], json!(500));
        assert_eq!(json["error"], json!("Request failed: 429 - slow down"));
    }

    #[tokio::test]
    async fn test_fetch_video_reports_response_metadata() {
        let upstream = Router::new().route(
            "/clip.mp4",
            get(|| async { ([(header::CONTENT_TYPE, "video/mp4")], "bytes") }),
        );
        let base = spawn_upstream(upstream).await;
        let body = json!({ "videoUrl": format!("{}/clip.mp4", base) }).to_string();

        let response = fetch_video(State(state(&base)), Bytes::from(body)).await.into_response();
        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["success"], json!(true));
        assert_eq!(json["data"]["status"], json!(200));
        assert_eq!(json["data"]["statusText"], json!("OK"));
        assert_eq!(json["data"]["ok"], json!(true));
        assert_eq!(json["data"]["redirected"], json!(false));
        assert_eq!(json["data"]["type"], json!("basic"));
        assert_eq!(json["data"]["headers"]["content-type"], json!("video/mp4"));
    }

    #[tokio::test]
    async fn test_fetch_video_transport_failure_is_500() {
        // nothing listens on port 9 locally
        let body = json!({ "videoUrl": "http://127.0.0.1:9/clip.mp4" }).to_string();
        let response = fetch_video(State(state("http://unused")), Bytes::from(body))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body_json(response).await["success"], json!(false));
    }
}
