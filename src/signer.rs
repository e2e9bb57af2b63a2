use std::borrow::Cow;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::authorization::make_authorization_header;
use crate::base_string::signature_base;
use crate::generator::{generate_nonce, Clock, OsRandom, RandomSource, SystemClock};
use crate::{
    Parameters, RequestView, SecretsProvider, SignError, SignResult, HMAC_SHA1,
    OAUTH_CALLBACK_KEY, OAUTH_CONSUMER_KEY, OAUTH_NONCE_KEY, OAUTH_SIGNATURE_KEY,
    OAUTH_SIGNATURE_METHOD_KEY, OAUTH_TIMESTAMP_KEY, OAUTH_TOKEN_KEY, OAUTH_VERIFIER_KEY,
    OAUTH_VERSION_KEY, REALM_KEY,
};

const OAUTH_VERSION: &str = "1.0";

type HmacSha1 = Hmac<Sha1>;

/// Returns the base64 HMAC-SHA1 of `base` keyed with `key`.
pub fn sign(base: &str, key: &str) -> SignResult<String> {
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|e| SignError::SigningFailure(e.to_string()))?;
    mac.update(base.as_bytes());
    Ok(BASE64.encode(mac.finalize().into_bytes()))
}

/// Result of signing a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedAuthorization {
    parameters: Parameters,
    header: String,
}

impl SignedAuthorization {
    /// The protocol parameters of this request including `oauth_signature`.
    pub fn parameters(&self) -> &Parameters {
        &self.parameters
    }

    pub fn signature(&self) -> Option<&str> {
        self.parameters.get(OAUTH_SIGNATURE_KEY)
    }

    /// Value for the `Authorization` header.
    pub fn header(&self) -> &str {
        &self.header
    }

    pub fn into_header(self) -> String {
        self.header
    }
}

/// Signs `request` with `key` and builds its `Authorization` header.
///
/// `extra` is left untouched; the returned parameters are `extra` plus the
/// computed `oauth_signature`.
pub fn authenticate(
    request: &RequestView,
    extra: &Parameters,
    key: &str,
) -> SignResult<SignedAuthorization> {
    let base = signature_base(request, extra)?;
    tracing::debug!(base = %base, "computed signature base string");

    let signature = sign(&base, key)?;

    let mut parameters = extra.clone();
    parameters.remove(OAUTH_SIGNATURE_KEY);
    parameters.add(OAUTH_SIGNATURE_KEY, signature);
    let header = make_authorization_header(&parameters);

    Ok(SignedAuthorization { parameters, header })
}

#[derive(Debug, Clone)]
pub struct Signer<'a, TSecretsProvider, TClock = SystemClock, TRandom = OsRandom>
where
    TSecretsProvider: SecretsProvider,
{
    secrets: &'a TSecretsProvider,
    parameters: OAuthParameters<'a>,
    clock: TClock,
    random: TRandom,
}

impl<'a, TSecretsProvider> Signer<'a, TSecretsProvider>
where
    TSecretsProvider: SecretsProvider,
{
    pub fn new(secrets: &'a TSecretsProvider, parameters: OAuthParameters<'a>) -> Self {
        Signer {
            secrets,
            parameters,
            clock: SystemClock,
            random: OsRandom,
        }
    }
}

impl<'a, TSecretsProvider, TClock, TRandom> Signer<'a, TSecretsProvider, TClock, TRandom>
where
    TSecretsProvider: SecretsProvider,
    TClock: Clock,
    TRandom: RandomSource,
{
    /// Replaces the time source used for `oauth_timestamp` and nonces.
    pub fn with_clock<T: Clock>(self, clock: T) -> Signer<'a, TSecretsProvider, T, TRandom> {
        Signer {
            secrets: self.secrets,
            parameters: self.parameters,
            clock,
            random: self.random,
        }
    }

    /// Replaces the random source used for nonces.
    pub fn with_random<T: RandomSource>(
        self,
        random: T,
    ) -> Signer<'a, TSecretsProvider, TClock, T> {
        Signer {
            secrets: self.secrets,
            parameters: self.parameters,
            clock: self.clock,
            random,
        }
    }

    /// Signs `request` with fresh protocol parameters.
    pub fn generate_signature(&self, request: &RequestView) -> SignResult<SignedAuthorization> {
        let (consumer_key, _) = self.secrets.get_consumer_key_pair();
        let (token, _) = self.secrets.get_token_option_pair();
        let extra =
            self.parameters
                .build_parameters(consumer_key, token, &self.clock, &self.random)?;

        let signed = authenticate(request, &extra, &self.secrets.signing_key())?;

        match self.parameters.realm {
            // OAuth oauth_...,realm="realm"
            Some(ref realm) => Ok(SignedAuthorization {
                header: format!("{},{}=\"{}\"", signed.header, REALM_KEY, realm),
                ..signed
            }),
            None => Ok(signed),
        }
    }
}

/// Protocol parameters of a signing operation.
///
/// Nonce and timestamp are generated per request unless fixed here.
#[derive(Debug, Clone, Default)]
pub struct OAuthParameters<'a> {
    callback: Option<Cow<'a, str>>,
    nonce: Option<Cow<'a, str>>,
    realm: Option<Cow<'a, str>>,
    timestamp: Option<u64>,
    verifier: Option<Cow<'a, str>>,
    version: bool,
}

impl<'a> OAuthParameters<'a> {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn callback<T>(self, callback: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            callback: Some(callback.into()),
            ..self
        }
    }

    /// set the oauth_nonce value
    pub fn nonce<T>(self, nonce: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            nonce: Some(nonce.into()),
            ..self
        }
    }

    /// set the realm value appended to the header
    pub fn realm<T>(self, realm: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            realm: Some(realm.into()),
            ..self
        }
    }

    /// set the oauth_timestamp value
    pub fn timestamp<T>(self, timestamp: T) -> Self
    where
        T: Into<u64>,
    {
        OAuthParameters {
            timestamp: Some(timestamp.into()),
            ..self
        }
    }

    /// set the oauth_verifier value
    pub fn verifier<T>(self, verifier: T) -> Self
    where
        T: Into<Cow<'a, str>>,
    {
        OAuthParameters {
            verifier: Some(verifier.into()),
            ..self
        }
    }

    /// set the oauth_version value (boolean)
    ///
    /// # Note
    /// When the version has value `true`, oauth_version will be set with "1.0".
    /// Otherwise, oauth_version will not be included in your request.
    /// In oauth1, oauth_version value must be "1.0" or not specified.
    pub fn version<T>(self, version: T) -> Self
    where
        T: Into<bool>,
    {
        OAuthParameters {
            version: version.into(),
            ..self
        }
    }

    fn build_parameters<C, R>(
        &self,
        consumer_key: &str,
        token: Option<&str>,
        clock: &C,
        random: &R,
    ) -> SignResult<Parameters>
    where
        C: Clock,
        R: RandomSource,
    {
        let mut params = Parameters::new();
        params.add(OAUTH_CONSUMER_KEY, consumer_key);
        params.add(OAUTH_SIGNATURE_METHOD_KEY, HMAC_SHA1);

        let timestamp = match self.timestamp {
            Some(timestamp) => timestamp,
            None => clock.unix_timestamp()?,
        };
        params.add(OAUTH_TIMESTAMP_KEY, timestamp.to_string());

        let nonce = match self.nonce {
            Some(ref nonce) => nonce.to_string(),
            None => generate_nonce(clock, random)?,
        };
        params.add(OAUTH_NONCE_KEY, nonce);

        if let Some(token) = token {
            params.add(OAUTH_TOKEN_KEY, token);
        }
        if let Some(ref callback) = self.callback {
            params.add(OAUTH_CALLBACK_KEY, callback.to_string());
        }
        if let Some(ref verifier) = self.verifier {
            params.add(OAUTH_VERIFIER_KEY, verifier.to_string());
        }
        if self.version {
            params.add(OAUTH_VERSION_KEY, OAUTH_VERSION);
        }

        Ok(params)
    }
}
