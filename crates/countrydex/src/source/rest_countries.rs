use async_trait::async_trait;
use reqwest::Client;
use tracing::debug;

use crate::config::Config;
use crate::country::RawCountry;
use crate::error::{Error, Result};

use super::CountrySource;

/// The REST Countries API (`restcountries.com`).
#[derive(Debug, Clone)]
pub struct RestCountriesSource {
    client: Client,
    endpoint: String,
    fields: String,
}

impl RestCountriesSource {
    /// Build a source from the `[api]` section of the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be constructed.
    pub fn new(config: &Config) -> Result<Self> {
        let mut builder = Client::builder().user_agent(concat!(
            env!("CARGO_PKG_NAME"),
            "/",
            env!("CARGO_PKG_VERSION")
        ));
        if let Some(timeout) = config.request_timeout() {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            endpoint: config.api.endpoint.clone(),
            fields: config.fields_param(),
        })
    }

    /// The endpoint requests are sent to.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Decode a response body into upstream records.
pub(crate) fn parse_body(body: &str) -> Result<Vec<RawCountry>> {
    Ok(serde_json::from_str(body)?)
}

#[async_trait]
impl CountrySource for RestCountriesSource {
    fn name(&self) -> &str {
        "restcountries"
    }

    async fn fetch(&self) -> Result<Vec<RawCountry>> {
        debug!("GET {} fields={}", self.endpoint, self.fields);
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("fields", self.fields.as_str())])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .ok()
                .filter(|body| !body.trim().is_empty())
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());
            return Err(Error::api(status.as_u16(), message));
        }

        let body = response.text().await?;
        parse_body(&body)
    }
}

#[cfg(test)]
mod tests {
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    use super::*;

    /// Serve one canned HTTP response on a local port and return a config
    /// pointing at it.
    async fn serve_once(status_line: &str, body: &str) -> Config {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let response = format!(
            "HTTP/1.1 {status_line}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
            body.len()
        );

        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
        });

        let mut config = Config::default();
        config.api.endpoint = format!("http://{addr}/v3.1/all");
        config.api.timeout_secs = 5;
        config
    }

    async fn fetch_from(status_line: &str, body: &str) -> Result<Vec<RawCountry>> {
        let config = serve_once(status_line, body).await;
        RestCountriesSource::new(&config).unwrap().fetch().await
    }

    #[test]
    fn test_new_from_default_config() {
        let source = RestCountriesSource::new(&Config::default()).unwrap();
        assert_eq!(source.endpoint(), "https://restcountries.com/v3.1/all");
        assert_eq!(source.fields, "name,cca2,region,capital,population");
        assert_eq!(source.name(), "restcountries");
    }

    #[test]
    fn test_new_with_timeout() {
        let mut config = Config::default();
        config.api.timeout_secs = 3;
        assert!(RestCountriesSource::new(&config).is_ok());
    }

    #[test]
    fn test_parse_body_upstream_sample() {
        let body = r#"[
            {"name":{"common":"Bolivia","official":"Plurinational State of Bolivia","nativeName":{}},
             "cca2":"BO","capital":["Sucre","La Paz"],"region":"Americas","population":11673029},
            {"name":{"common":"Antarctica","official":"Antarctica","nativeName":{}},
             "cca2":"AQ","capital":[],"region":"Antarctic","population":1000}
        ]"#;

        let records = parse_body(body).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].cca2.as_deref(), Some("AQ"));
    }

    #[test]
    fn test_parse_body_error_object() {
        let err = parse_body(r#"{"status":400,"message":"Bad Request"}"#).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }

    #[tokio::test]
    async fn test_fetch_success() {
        let records = fetch_from(
            "200 OK",
            r#"[{"name":{"common":"Finland"},"cca2":"FI","region":"Europe","capital":["Helsinki"],"population":5530719}]"#,
        )
        .await
        .unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].cca2.as_deref(), Some("FI"));
    }

    #[tokio::test]
    async fn test_fetch_error_status_uses_reason_phrase() {
        let err = fetch_from("503 Service Unavailable", "").await.unwrap_err();
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 503);
                assert_eq!(message, "Service Unavailable");
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_error_status_uses_body() {
        let err = fetch_from("404 Not Found", r#"{"status":404,"message":"Not Found"}"#)
            .await
            .unwrap_err();
        match err {
            Error::Api { status, message } => {
                assert_eq!(status, 404);
                assert!(message.contains(r#""message":"Not Found""#));
            }
            other => panic!("expected Api error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_fetch_non_array_body_is_json_error() {
        let err = fetch_from("200 OK", r#"{"status":200,"data":[]}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
