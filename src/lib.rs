/*!
reqwest-oauth1-hmac: RFC 5849 HMAC-SHA1 signatures for reqwest.

# Overview

This library signs HTTP requests with OAuth 1.0 (RFC 5849) HMAC-SHA1.
The signature base string is built from the request method, the base string
URI and every parameter the RFC covers: the query string, a form-encoded body
and any OAuth parameters already present in the `Authorization` header.

The canonicalization pipeline is usable on its own through [`RequestView`]
and [`authenticate`], and the [`Client`] wrapper signs requests built with
[reqwest](https://crates.io/crates/reqwest).

# How to use

## Basic usecase 1 - signing a reqwest request

```rust,no_run
use reqwest_oauth1_hmac::{OAuthClientProvider, Secrets};

# async fn run() -> reqwest_oauth1_hmac::Result<()> {
let secrets = Secrets::new("[CONSUMER_KEY]", "[CONSUMER_SECRET]")
    .token("[ACCESS_TOKEN]", "[TOKEN_SECRET]");

let resp = reqwest::Client::new()
    .oauth1(&secrets)
    .post("https://api.twitter.com/1.1/statuses/update.json")
    .form(&[("status", "Hello, Twitter!")])
    .send()
    .await?;
# Ok(())
# }
```

## Basic usecase 2 - computing the header by hand

```rust
use http::Method;
use reqwest_oauth1_hmac::{authenticate, Parameters, RequestView};
use url::Url;

let url = Url::parse("http://photos.example.net/photos?file=vacation.jpg&size=original").unwrap();
let request = RequestView::new(Method::GET, &url);

let extra: Parameters = vec![
    ("oauth_consumer_key", "dpf43f3p2l4k3l03"),
    ("oauth_token", "nnch734d00sl2jdk"),
    ("oauth_signature_method", "HMAC-SHA1"),
    ("oauth_timestamp", "137131202"),
    ("oauth_nonce", "chapoH"),
]
.into_iter()
.collect();

let signed = authenticate(&request, &extra, "kd94hf93k423kf44&pfkkdhi9sl3r4s00").unwrap();
assert_eq!(signed.signature(), Some("MdpQcU8iPSUjWoN/UDMsK2sui9I="));
```
*/
mod authorization;
mod base_string;
mod client;
mod encode;
mod error;
mod generator;
mod parameters;
mod request;
mod secrets;
mod signer;
mod view;

// exposed to external program
pub use authorization::{make_authorization_header, parse_authorization_header};
pub use base_string::{base_string_uri, collect_parameters, normalize_parameters, signature_base};
pub use client::{Client, OAuthClientProvider};
pub use encode::encode;
pub use error::{Error, Result, SignError, SignResult};
pub use generator::{
    generate_nonce, generate_timestamp, Clock, FixedClock, OsRandom, RandomSource, SystemClock,
};
pub use parameters::Parameters;
pub use request::RequestBuilder;
pub use secrets::{Secrets, SecretsProvider};
pub use signer::{authenticate, sign, OAuthParameters, SignedAuthorization, Signer};
pub use view::RequestView;

// exposed constant variables
/// Represents `oauth_callback`.
pub const OAUTH_CALLBACK_KEY: &str = "oauth_callback";
/// Represents `oauth_nonce`.
pub const OAUTH_NONCE_KEY: &str = "oauth_nonce";
/// Represents `oauth_signature`.
pub const OAUTH_SIGNATURE_KEY: &str = "oauth_signature";
/// Represents `oauth_timestamp`.
pub const OAUTH_TIMESTAMP_KEY: &str = "oauth_timestamp";
/// Represents `oauth_verifier`.
pub const OAUTH_VERIFIER_KEY: &str = "oauth_verifier";
/// Represents `oauth_version`.
pub const OAUTH_VERSION_KEY: &str = "oauth_version";
/// Represents `realm`.
pub const REALM_KEY: &str = "realm";
/// The only supported `oauth_signature_method`.
pub const HMAC_SHA1: &str = "HMAC-SHA1";

// crate-private constant variables
pub(crate) const OAUTH_KEY_PREFIX: &str = "oauth_";
pub(crate) const OAUTH_SIGNATURE_METHOD_KEY: &str = "oauth_signature_method";
pub(crate) const OAUTH_CONSUMER_KEY: &str = "oauth_consumer_key";
pub(crate) const OAUTH_TOKEN_KEY: &str = "oauth_token";
