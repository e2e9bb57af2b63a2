use http::header::{AUTHORIZATION, CONTENT_TYPE, HOST};
use http::uri::PathAndQuery;
use http::{HeaderMap, Method};
use serde::Serialize;
use url::Url;

use crate::{SignError, SignResult};

const FORM_URLENCODED: &str = "application/x-www-form-urlencoded";

/// The parts of an HTTP request that take part in the signature.
///
/// `host` may carry an explicit port (`example.com:8080`). `body` holds the
/// raw entity body only when it is `application/x-www-form-urlencoded`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestView {
    method: Method,
    scheme: String,
    host: String,
    path: String,
    query: Option<String>,
    body: Option<Vec<u8>>,
    authorization: Option<String>,
}

impl RequestView {
    pub fn new(method: Method, url: &Url) -> Self {
        let host = match (url.host_str(), url.port()) {
            (Some(host), Some(port)) => format!("{}:{}", host, port),
            (Some(host), None) => host.to_string(),
            (None, _) => String::new(),
        };
        RequestView {
            method,
            scheme: url.scheme().to_string(),
            host,
            path: url.path().to_string(),
            query: url.query().map(str::to_string),
            body: None,
            authorization: None,
        }
    }

    /// Builds a view from a scheme, a `Host` value and a request target
    /// such as `/r%20v/X?id=123`.
    pub fn from_parts<S, H>(method: Method, scheme: S, host: H, target: &str) -> SignResult<Self>
    where
        S: Into<String>,
        H: Into<String>,
    {
        let target = target
            .parse::<PathAndQuery>()
            .map_err(|_| SignError::InvalidRequestTarget(target.to_string()))?;
        Ok(RequestView::with_target(method, scheme.into(), host.into(), &target))
    }

    fn with_target(method: Method, scheme: String, host: String, target: &PathAndQuery) -> Self {
        RequestView {
            method,
            scheme,
            host,
            path: target.path().to_string(),
            query: target.query().map(str::to_string),
            body: None,
            authorization: None,
        }
    }

    /// Reads the signed parts out of a built `reqwest::Request`.
    ///
    /// Only a buffered body is looked at; streaming and multipart bodies
    /// contribute no parameters.
    pub fn from_reqwest(request: &reqwest::Request) -> Self {
        let mut view = RequestView::new(request.method().clone(), request.url());
        view.authorization = authorization_of(request.headers());
        if is_form_urlencoded(request.headers()) {
            view.body = request
                .body()
                .and_then(|body| body.as_bytes())
                .map(<[u8]>::to_vec);
        }
        view
    }

    pub fn authorization<T: Into<String>>(self, header: T) -> Self {
        RequestView {
            authorization: Some(header.into()),
            ..self
        }
    }

    /// Sets a raw `application/x-www-form-urlencoded` body.
    pub fn form_body<T: Into<Vec<u8>>>(self, body: T) -> Self {
        RequestView {
            body: Some(body.into()),
            ..self
        }
    }

    /// Serializes `form` as the form-encoded body.
    pub fn form<T: Serialize + ?Sized>(self, form: &T) -> SignResult<Self> {
        let body = serde_urlencoded::to_string(form)
            .map_err(|e| SignError::InvalidForm(e.to_string()))?;
        Ok(self.form_body(body))
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    pub fn host(&self) -> &str {
        &self.host
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn body(&self) -> Option<&[u8]> {
        self.body.as_deref()
    }

    pub fn authorization_header(&self) -> Option<&str> {
        self.authorization.as_deref()
    }
}

impl<B: AsRef<[u8]>> From<&http::Request<B>> for RequestView {
    /// Relative request URIs fall back to the `Host` header and `http`.
    /// Userinfo in the authority is not part of the host.
    fn from(request: &http::Request<B>) -> Self {
        let uri = request.uri();
        let host = uri
            .authority()
            .map(|authority| match authority.port_u16() {
                Some(port) => format!("{}:{}", authority.host(), port),
                None => authority.host().to_string(),
            })
            .or_else(|| {
                request
                    .headers()
                    .get(HOST)
                    .and_then(|value| value.to_str().ok())
                    .map(str::to_string)
            })
            .unwrap_or_default();
        let root = PathAndQuery::from_static("/");
        let mut view = RequestView::with_target(
            request.method().clone(),
            uri.scheme_str().unwrap_or("http").to_string(),
            host,
            uri.path_and_query().unwrap_or(&root),
        );
        view.authorization = authorization_of(request.headers());
        if is_form_urlencoded(request.headers()) {
            view.body = Some(request.body().as_ref().to_vec());
        }
        view
    }
}

fn authorization_of(headers: &HeaderMap) -> Option<String> {
    let value = headers.get(AUTHORIZATION)?;
    match value.to_str() {
        Ok(value) => Some(value.to_string()),
        Err(_) => {
            tracing::warn!("ignoring Authorization header that is not visible ASCII");
            None
        }
    }
}

fn is_form_urlencoded(headers: &HeaderMap) -> bool {
    headers
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(';').next())
        .map(|mime| mime.trim().eq_ignore_ascii_case(FORM_URLENCODED))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_url_keeps_explicit_port_and_query() {
        let url = Url::parse("https://www.example.net:8080/?q=1").unwrap();
        let view = RequestView::new(Method::GET, &url);
        assert_eq!(view.scheme(), "https");
        assert_eq!(view.host(), "www.example.net:8080");
        assert_eq!(view.path(), "/");
        assert_eq!(view.query(), Some("q=1"));
        assert_eq!(view.body(), None);
        assert_eq!(view.authorization_header(), None);
    }

    #[test]
    fn from_parts_splits_target() {
        let view =
            RequestView::from_parts(Method::GET, "http", "EXAMPLE.COM:80", "/r%20v/X?id=123").unwrap();
        assert_eq!(view.host(), "EXAMPLE.COM:80");
        assert_eq!(view.path(), "/r%20v/X");
        assert_eq!(view.query(), Some("id=123"));

        let view = RequestView::from_parts(Method::GET, "http", "example.com", "/request").unwrap();
        assert_eq!(view.query(), None);

        let view = RequestView::from_parts(Method::GET, "http", "example.com", "/a?b?c#frag").unwrap();
        assert_eq!(view.path(), "/a");
        assert_eq!(view.query(), Some("b?c"));
    }

    #[test]
    fn from_parts_rejects_invalid_target() {
        assert_eq!(
            RequestView::from_parts(Method::GET, "http", "example.com", "/a b"),
            Err(SignError::InvalidRequestTarget("/a b".to_string()))
        );
    }

    #[test]
    fn form_serializes_body() {
        #[derive(Serialize)]
        struct Status<'a> {
            status: &'a str,
        }

        let url = Url::parse("https://api.twitter.com/1.1/statuses/update.json").unwrap();
        let view = RequestView::new(Method::POST, &url)
            .form(&Status { status: "Hello Ladies + Gentlemen" })
            .unwrap();
        assert_eq!(view.body(), Some(&b"status=Hello+Ladies+%2B+Gentlemen"[..]));
    }

    #[test]
    fn from_reqwest_reads_form_body() {
        let request = reqwest::Client::new()
            .post("http://example.com/request?b5=%3D%253D")
            .header(AUTHORIZATION, "OAuth oauth_token=\"kkk9d7dh3k39sjv7\"")
            .form(&[("c2", ""), ("a3", "2 q")])
            .build()
            .unwrap();
        let view = RequestView::from_reqwest(&request);
        assert_eq!(view.method(), &Method::POST);
        assert_eq!(view.host(), "example.com");
        assert_eq!(view.query(), Some("b5=%3D%253D"));
        assert_eq!(view.body(), Some(&b"c2=&a3=2+q"[..]));
        assert_eq!(
            view.authorization_header(),
            Some("OAuth oauth_token=\"kkk9d7dh3k39sjv7\"")
        );
    }

    #[test]
    fn from_reqwest_ignores_non_form_body() {
        let request = reqwest::Client::new()
            .post("http://example.com/request")
            .header(CONTENT_TYPE, "text/plain")
            .body("c2&a3=2+q")
            .build()
            .unwrap();
        assert_eq!(RequestView::from_reqwest(&request).body(), None);
    }

    #[test]
    fn from_http_request() {
        let request = http::Request::builder()
            .method(Method::POST)
            .uri("/request?a3=a")
            .header(http::header::HOST, "example.com")
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded; charset=utf-8")
            .body("c2&a3=2+q")
            .unwrap();
        let view = RequestView::from(&request);
        assert_eq!(view.scheme(), "http");
        assert_eq!(view.host(), "example.com");
        assert_eq!(view.path(), "/request");
        assert_eq!(view.query(), Some("a3=a"));
        assert_eq!(view.body(), Some(&b"c2&a3=2+q"[..]));
    }

    #[test]
    fn from_http_request_drops_userinfo() {
        let request = http::Request::builder()
            .uri("http://user:pw@example.com/r")
            .body(Vec::new())
            .unwrap();
        let view = RequestView::from(&request);
        assert_eq!(view.host(), "example.com");
        assert_eq!(
            crate::base_string_uri(&view).unwrap(),
            "http://example.com/r"
        );

        let request = http::Request::builder()
            .uri("https://user@Example.com:8443/r?x=1")
            .body(Vec::new())
            .unwrap();
        let view = RequestView::from(&request);
        assert_eq!(view.host(), "Example.com:8443");
        assert_eq!(view.query(), Some("x=1"));
    }
}
