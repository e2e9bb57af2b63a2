// ----------------------------------------------------------------------------
// This source code contains derived artifacts from seanmonstar's `reqwest`.
// for further information(including license information),
// please visit their repository: https://github.com/seanmonstar/reqwest .
// ----------------------------------------------------------------------------
use std::{convert::TryFrom, future::Future, time::Duration};

use http::header::AUTHORIZATION;
#[cfg(feature = "multipart")]
use reqwest::multipart;
use reqwest::{
    header::HeaderMap, header::HeaderName, header::HeaderValue, Body,
    Client as ReqwestClient, Request, RequestBuilder as ReqwestRequestBuilder, Response,
};
use serde::Serialize;

use crate::generator::{Clock, RandomSource};
use crate::{OAuthParameters, RequestView, Result, SecretsProvider, SignError, Signer};

pub struct RequestBuilder<TSigner> {
    client: ReqwestClient,
    inner: ReqwestRequestBuilder,
    signer: TSigner,
}

impl RequestBuilder<()> {
    // ------------------------------------------------------------------------
    // Set signing information

    /// Add the signing information.
    pub fn sign<'a, T>(self, secrets: &'a T) -> RequestBuilder<Signer<'a, T>>
    where
        T: SecretsProvider,
    {
        self.sign_with_params(secrets, OAuthParameters::new())
    }

    /// Add the signing information with OAuth parameters.
    pub fn sign_with_params<'a, T>(
        self,
        secrets: &'a T,
        params: OAuthParameters<'a>,
    ) -> RequestBuilder<Signer<'a, T>>
    where
        T: SecretsProvider,
    {
        RequestBuilder {
            client: self.client,
            inner: self.inner,
            signer: Signer::new(secrets, params),
        }
    }

    /// Build the unsigned `Request`.
    pub fn build(self) -> Result<Request> {
        Ok(self.inner.build()?)
    }

    /// Send the request without an OAuth signature.
    pub fn send(self) -> impl Future<Output = Result<Response>> {
        let client = self.client.clone();
        let request = self.build();
        async move { Ok(client.execute(request?).await?) }
    }
}

impl<'a, TSecretsProvider, TClock, TRandom>
    RequestBuilder<Signer<'a, TSecretsProvider, TClock, TRandom>>
where
    TSecretsProvider: SecretsProvider,
    TClock: Clock,
    TRandom: RandomSource,
{
    // ------------------------------------------------------------------------
    // Finish building the request with OAuth signature

    /// Build the `Request` and set its `Authorization` header to the
    /// OAuth signature.
    ///
    /// # Errors
    ///
    /// This method fails if reqwest cannot build the request, or if the
    /// request carries a malformed OAuth `Authorization` header.
    pub fn build(self) -> Result<Request> {
        let mut request = self.inner.build()?;
        let signed = self
            .signer
            .generate_signature(&RequestView::from_reqwest(&request))?;
        let value = HeaderValue::from_str(signed.header())
            .map_err(|e| SignError::InvalidHeaderValue(e.to_string()))?;
        request.headers_mut().insert(AUTHORIZATION, value);
        Ok(request)
    }

    /// Constructs the signed Request and sends it to the target URL,
    /// returning a future Response.
    ///
    /// # Errors
    ///
    /// This method fails if the request could not be signed, if there was
    /// an error while sending request, redirect loop was detected or
    /// redirect limit was exhausted.
    pub fn send(self) -> impl Future<Output = Result<Response>> {
        let client = self.client.clone();
        let request = self.build();
        async move { Ok(client.execute(request?).await?) }
    }
}

impl<TSigner> RequestBuilder<TSigner> {
    pub(crate) fn new(client: ReqwestClient, inner: ReqwestRequestBuilder, signer: TSigner) -> Self {
        RequestBuilder {
            client,
            inner,
            signer,
        }
    }

    // ------------------------------------------------------------------------
    // Pass-through to inner builder

    fn pass_through<F>(self, f: F) -> Self
    where
        F: FnOnce(ReqwestRequestBuilder) -> ReqwestRequestBuilder,
    {
        RequestBuilder {
            inner: f(self.inner),
            ..self
        }
    }

    /// Modify the query string of the URL.
    ///
    /// Modifies the URL of this request, adding the parameters provided.
    /// This method appends and does not overwrite. This means that it can
    /// be called multiple times and that existing query parameters are not
    /// overwritten if the same key is used. The key will simply show up
    /// twice in the query string.
    /// Calling `.query([("foo", "a"), ("foo", "b")])` gives `"foo=a&foo=b"`.
    ///
    /// Query parameters take part in the signature.
    pub fn query<T: Serialize + ?Sized>(self, query: &T) -> Self {
        self.pass_through(|b| b.query(query))
    }

    /// Send a form body.
    ///
    /// Form parameters take part in the signature.
    pub fn form<T: Serialize + ?Sized>(self, form: &T) -> Self {
        self.pass_through(|b| b.form(form))
    }

    /// Add a `Header` to this Request.
    pub fn header<K, V>(self, key: K, value: V) -> Self
    where
        HeaderName: TryFrom<K>,
        <HeaderName as TryFrom<K>>::Error: Into<http::Error>,
        HeaderValue: TryFrom<V>,
        <HeaderValue as TryFrom<V>>::Error: Into<http::Error>,
    {
        self.pass_through(|b| b.header(key, value))
    }

    /// Add a set of Headers to the existing ones on this Request.
    ///
    /// The headers will be merged in to any already set.
    pub fn headers(self, headers: HeaderMap) -> Self {
        self.pass_through(|b| b.headers(headers))
    }

    /// Set the request body.
    ///
    /// The body is signed only when the `Content-Type` header says
    /// `application/x-www-form-urlencoded`.
    pub fn body<T: Into<Body>>(self, body: T) -> Self {
        self.pass_through(|b| b.body(body))
    }

    /// Enables a request timeout.
    ///
    /// The timeout is applied from the when the request starts connecting
    /// until the response body has finished. It affects only this request
    /// and overrides the timeout configured using `ClientBuilder::timeout()`.
    pub fn timeout(self, timeout: Duration) -> Self {
        self.pass_through(|b| b.timeout(timeout))
    }

    /// Sends a multipart/form-data body.
    ///
    /// Note: multipart/form-data is not handled by the OAuth signer.
    #[cfg(feature = "multipart")]
    pub fn multipart(self, multipart: multipart::Form) -> Self {
        self.pass_through(|b| b.multipart(multipart))
    }

    /// Send a JSON body.
    ///
    /// Note: JSON bodies are not handled by the OAuth signer.
    #[cfg(feature = "json")]
    pub fn json<T: Serialize + ?Sized>(self, json: &T) -> Self {
        self.pass_through(|b| b.json(json))
    }

    /// Attempt to clone the RequestBuilder.
    ///
    /// `None` is returned if the RequestBuilder can not be cloned,
    /// i.e. if the request body is a stream.
    pub fn try_clone(&self) -> Option<Self>
    where
        TSigner: Clone,
    {
        self.inner.try_clone().map(|inner| RequestBuilder {
            client: self.client.clone(),
            inner,
            signer: self.signer.clone(),
        })
    }
}
