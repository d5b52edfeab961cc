use std::time::Duration;

use quiz_core::model::OPTION_COUNT;
use quiz_services::{AnswerKeyResolver, HttpAnswerKeyResolver, ResolverConfig};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use url::Url;

fn options() -> [String; OPTION_COUNT] {
    ["Mars", "Jupiter", "Venus", "Earth"].map(String::from)
}

/// Serve one HTTP request with `status` and `body`, returning the request body.
async fn serve_once(status: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let url = Url::parse(&format!("http://{addr}/api/get-answer")).unwrap();

    let handle = tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        let mut received = Vec::new();
        let mut buf = [0_u8; 4096];
        let request_body = loop {
            let n = stream.read(&mut buf).await.unwrap();
            assert!(n > 0, "client closed before sending a full request");
            received.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&received).to_string();
            let Some(header_end) = text.find("\r\n\r\n") else {
                continue;
            };
            let content_length = text[..header_end]
                .lines()
                .find_map(|line| {
                    let (name, value) = line.split_once(':')?;
                    name.eq_ignore_ascii_case("content-length")
                        .then(|| value.trim().parse::<usize>().ok())
                        .flatten()
                })
                .unwrap_or(0);
            let body_start = header_end + 4;
            if received.len() >= body_start + content_length {
                break String::from_utf8_lossy(&received[body_start..body_start + content_length])
                    .to_string();
            }
        };

        let response = format!(
            "HTTP/1.1 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );
        stream.write_all(response.as_bytes()).await.unwrap();
        stream.shutdown().await.unwrap();
        request_body
    });

    (url, handle)
}

fn resolver(url: Url) -> HttpAnswerKeyResolver {
    HttpAnswerKeyResolver::new(ResolverConfig {
        timeout: Duration::from_secs(5),
        ..ResolverConfig::new(url)
    })
}

#[tokio::test]
async fn posts_prompt_and_reads_generated_text() {
    let (url, server) = serve_once("200 OK", r#"{"generatedText":" 1\n"}"#).await;

    let answer = resolver(url)
        .resolve_correct_answer("Largest planet?", &options())
        .await;
    assert_eq!(answer.map(|index| index.value()), Some(1));

    let request: serde_json::Value = serde_json::from_str(&server.await.unwrap()).unwrap();
    let prompt = request["prompt"].as_str().unwrap();
    assert!(prompt.contains("Question: Largest planet?"));
    assert!(prompt.contains("1. Jupiter"));
}

#[tokio::test]
async fn non_success_status_gives_none() {
    let (url, server) = serve_once("500 Internal Server Error", r#"{"error":"boom"}"#).await;
    let answer = resolver(url).resolve_correct_answer("Q", &options()).await;
    assert_eq!(answer, None);
    server.await.unwrap();
}

#[tokio::test]
async fn unexpected_shape_or_text_gives_none() {
    let (url, server) = serve_once("200 OK", r#"{"text":"1"}"#).await;
    assert_eq!(resolver(url).resolve_correct_answer("Q", &options()).await, None);
    server.await.unwrap();

    let (url, server) = serve_once("200 OK", r#"{"generatedText":"Jupiter"}"#).await;
    assert_eq!(resolver(url).resolve_correct_answer("Q", &options()).await, None);
    server.await.unwrap();

    let (url, server) = serve_once("200 OK", r#"{"generatedText":"5"}"#).await;
    assert_eq!(resolver(url).resolve_correct_answer("Q", &options()).await, None);
    server.await.unwrap();
}

#[tokio::test]
async fn refused_connection_gives_none() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let url = Url::parse(&format!("http://{addr}/api/get-answer")).unwrap();
    assert_eq!(resolver(url).resolve_correct_answer("Q", &options()).await, None);
}

#[tokio::test]
async fn silent_server_times_out_to_none() {
    // Bound but never answered.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let url = Url::parse(&format!("http://{addr}/api/get-answer")).unwrap();
    let resolver = HttpAnswerKeyResolver::new(ResolverConfig {
        timeout: Duration::from_millis(200),
        ..ResolverConfig::new(url)
    });

    let answer = tokio::time::timeout(
        Duration::from_secs(5),
        resolver.resolve_correct_answer("Q", &options()),
    )
    .await
    .expect("request timeout should fire first");
    assert_eq!(answer, None);
    drop(listener);
}
