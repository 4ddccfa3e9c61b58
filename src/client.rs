//! HTTP implementation of [`ScanService`] for the terminal front-end

use crate::api::{
    endpoint, ApiError, FileListing, ScanFileReply, ScanFileRequest, ScanService, ScanSummary,
    FILES_PATH, SCAN_FILE_PATH, SCAN_PATH,
};
use serde::de::DeserializeOwned;

const USER_AGENT: &str = concat!("dovi-shelf/", env!("CARGO_PKG_VERSION"));

pub struct HttpScanService {
    base: String,
    http: reqwest::Client,
}

impl HttpScanService {
    /// `base` is the server root, e.g. `http://nas.local:5000`.
    pub fn new(base: &str) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| ApiError::Transport(e.to_string()))?;
        Ok(Self { base: base.trim_end_matches('/').to_string(), http })
    }

    pub fn base(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        endpoint(&self.base, path)
    }
}

// The status code is not inspected: the server reports failures in the body
// and the page has always decoded whatever came back.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, ApiError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;
    tracing::debug!(%status, bytes = body.len(), "response received");
    Ok(serde_json::from_str(&body)?)
}

fn transport(e: reqwest::Error) -> ApiError {
    ApiError::Transport(e.to_string())
}

impl ScanService for HttpScanService {
    async fn scan_all(&self) -> Result<ScanSummary, ApiError> {
        let url = self.url(SCAN_PATH);
        tracing::debug!(%url, "POST");
        let response = self.http.post(&url).send().await.map_err(transport)?;
        decode(response).await
    }

    async fn list_files(&self) -> Result<FileListing, ApiError> {
        let url = self.url(FILES_PATH);
        tracing::debug!(%url, "GET");
        let response = self.http.get(&url).send().await.map_err(transport)?;
        decode(response).await
    }

    async fn scan_file(&self, path: &str) -> Result<ScanFileReply, ApiError> {
        let url = self.url(SCAN_FILE_PATH);
        tracing::debug!(%url, file = path, "POST");
        let body = ScanFileRequest { file_path: path.to_string() };
        let response = self.http.post(&url).json(&body).send().await.map_err(transport)?;
        decode(response).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::thread;
    use tiny_http::{Header, Response, Server};

    // ==========================================================================
    // STUB SERVER
    // ==========================================================================
    //
    // A throwaway tiny_http server on an ephemeral port. It answers each
    // request with the next canned reply and reports what it received.
    // ==========================================================================

    struct Seen {
        method: String,
        url: String,
        body: String,
        content_type: Option<String>,
    }

    fn stub(replies: Vec<(u16, &'static str)>) -> (String, mpsc::Receiver<Seen>) {
        let server = Server::http("127.0.0.1:0").unwrap();
        let port = server.server_addr().to_ip().unwrap().port();
        let (tx, rx) = mpsc::channel();

        thread::spawn(move || {
            for (status, body) in replies {
                let mut request = match server.recv() {
                    Ok(r) => r,
                    Err(_) => return,
                };
                let mut received = String::new();
                let _ = request.as_reader().read_to_string(&mut received);
                let content_type = request
                    .headers()
                    .iter()
                    .find(|h| h.field.equiv("Content-Type"))
                    .map(|h| h.value.to_string());
                let _ = tx.send(Seen {
                    method: request.method().to_string(),
                    url: request.url().to_string(),
                    body: received,
                    content_type,
                });
                let response = Response::from_string(body)
                    .with_status_code(status)
                    .with_header(Header::from_bytes(&b"Content-Type"[..], &b"application/json"[..]).unwrap());
                let _ = request.respond(response);
            }
        });

        (format!("http://127.0.0.1:{}/", port), rx)
    }

    #[tokio::test]
    async fn test_scan_all_posts_to_scan() {
        let (base, seen) = stub(vec![(200, r#"{"new_files": 3}"#)]);
        let service = HttpScanService::new(&base).unwrap();

        let summary = service.scan_all().await.unwrap();
        assert_eq!(summary.new_files, 3);

        let request = seen.recv().unwrap();
        assert_eq!(request.method, "POST");
        assert_eq!(request.url, "/scan");
    }

    #[tokio::test]
    async fn test_list_files_gets_listing() {
        let (base, seen) = stub(vec![(
            200,
            r#"{"success": true, "files": [{"path": "/m/a.mkv", "name": "a.mkv", "scanned": true}]}"#,
        )]);
        let service = HttpScanService::new(&base).unwrap();

        let listing = service.list_files().await.unwrap();
        assert!(listing.success);
        assert_eq!(listing.files[0].name, "a.mkv");

        let request = seen.recv().unwrap();
        assert_eq!(request.method, "GET");
        assert_eq!(request.url, "/get_files");
    }

    #[tokio::test]
    async fn test_scan_file_sends_json_body() {
        let (base, seen) = stub(vec![(200, r#"{"success": false, "message": "Not a profile 7 file"}"#)]);
        let service = HttpScanService::new(&base).unwrap();

        let reply = service.scan_file("/m/Movie (2019).mkv").await.unwrap();
        assert!(!reply.success);
        assert_eq!(reply.message, "Not a profile 7 file");

        let request = seen.recv().unwrap();
        assert_eq!(request.url, "/scan_file");
        assert_eq!(request.body, r#"{"file_path":"/m/Movie (2019).mkv"}"#);
        assert_eq!(request.content_type.as_deref(), Some("application/json"));
    }

    #[tokio::test]
    async fn test_error_status_body_is_still_decoded() {
        let (base, _seen) = stub(vec![(400, r#"{"success": false, "message": "No file path provided"}"#)]);
        let service = HttpScanService::new(&base).unwrap();

        let reply = service.scan_file("").await.unwrap();
        assert!(!reply.success);
        assert_eq!(reply.message, "No file path provided");
    }

    #[tokio::test]
    async fn test_html_error_page_is_decode_error() {
        let (base, _seen) = stub(vec![(500, "<html>Internal Server Error</html>")]);
        let service = HttpScanService::new(&base).unwrap();

        let err = service.scan_all().await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)), "got {:?}", err);
    }

    #[tokio::test]
    async fn test_unreachable_server_is_transport_error() {
        // Bind and drop to get a port nothing listens on
        let port = {
            let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let service = HttpScanService::new(&format!("http://127.0.0.1:{}", port)).unwrap();

        let err = service.list_files().await.unwrap_err();
        assert!(matches!(err, ApiError::Transport(_)), "got {:?}", err);
    }

    #[test]
    fn test_base_trailing_slash_trimmed() {
        let service = HttpScanService::new("http://nas:5000//").unwrap();
        assert_eq!(service.base(), "http://nas:5000");
        assert_eq!(service.url(SCAN_PATH), "http://nas:5000/scan");
    }
}
