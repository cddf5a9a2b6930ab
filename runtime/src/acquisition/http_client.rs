//! Thin async HTTP client for sitemap fetches.
//!
//! Every request carries the configured `User-Agent` and is bounded by the
//! client-wide timeout. Redirects are followed; the final URL is reported.
//! `Content-Encoding: gzip` is undone by reqwest; gzip files served as-is
//! (`sitemap.xml.gz`) are recognized by their magic bytes in [`HttpResponse::text`].

use flate2::read::GzDecoder;
use std::io::Read;
use std::time::Duration;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// A fetched response with its raw body.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// The URL after redirects.
    pub final_url: String,
    pub status: u16,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Body as text, gunzipped first when it is a gzip stream.
    /// Invalid UTF-8 is replaced rather than rejected.
    pub fn text(&self) -> std::io::Result<String> {
        if !self.body.starts_with(&GZIP_MAGIC) {
            return Ok(String::from_utf8_lossy(&self.body).into_owned());
        }

        let mut raw = Vec::new();
        GzDecoder::new(self.body.as_slice()).read_to_end(&mut raw)?;
        Ok(String::from_utf8_lossy(&raw).into_owned())
    }
}

/// HTTP client shared by every fetch in a run.
#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client that sends `user_agent` and gives up after `timeout`.
    pub fn new(user_agent: &str, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .build()?;
        Ok(Self { client })
    }

    /// GET a URL and read the whole body.
    pub async fn get(&self, url: &str) -> Result<HttpResponse, reqwest::Error> {
        let resp = self.client.get(url).send().await?;
        let status = resp.status().as_u16();
        let final_url = resp.url().to_string();
        let body = resp.bytes().await?.to_vec();

        Ok(HttpResponse {
            final_url,
            status,
            body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_get_sends_user_agent() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .and(header("user-agent", "FoldBot/2.0"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<urlset/>"))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new("FoldBot/2.0", Duration::from_secs(5)).unwrap();
        let url = format!("{}/sitemap.xml", server.uri());
        let resp = client.get(&url).await.unwrap();

        assert!(resp.is_success());
        assert_eq!(resp.text().unwrap(), "<urlset/>");
        assert_eq!(resp.final_url, url);
    }

    #[tokio::test]
    async fn test_get_reports_redirect_target() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/old-sitemap.xml"))
            .respond_with(
                ResponseTemplate::new(301)
                    .insert_header("location", format!("{}/sitemap.xml", server.uri())),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/sitemap.xml"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<urlset/>"))
            .mount(&server)
            .await;

        let client = HttpClient::new("FoldBot/2.0", Duration::from_secs(5)).unwrap();
        let resp = client
            .get(&format!("{}/old-sitemap.xml", server.uri()))
            .await
            .unwrap();
        assert_eq!(resp.status, 200);
        assert_eq!(resp.final_url, format!("{}/sitemap.xml", server.uri()));
    }

    #[tokio::test]
    async fn test_non_success_status_is_reported() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpClient::new("FoldBot/2.0", Duration::from_secs(5)).unwrap();
        let resp = client.get(&format!("{}/missing.xml", server.uri())).await.unwrap();
        assert_eq!(resp.status, 404);
        assert!(!resp.is_success());
    }

    #[test]
    fn test_text_gunzips_gzip_body() {
        use flate2::write::GzEncoder;
        use flate2::Compression;
        use std::io::Write;

        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(b"<urlset></urlset>").unwrap();
        let resp = HttpResponse {
            final_url: "https://example.com/sitemap.xml.gz".to_string(),
            status: 200,
            body: encoder.finish().unwrap(),
        };
        assert_eq!(resp.text().unwrap(), "<urlset></urlset>");
    }

    #[test]
    fn test_text_rejects_corrupt_gzip() {
        let resp = HttpResponse {
            final_url: "https://example.com/sitemap.xml.gz".to_string(),
            status: 200,
            body: vec![0x1f, 0x8b, 0x08, 0x00, 0x01],
        };
        assert!(resp.text().is_err());
    }
}
