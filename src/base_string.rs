//! Signature base string construction (RFC 5849 section 3.4.1).

use std::collections::BTreeMap;

use percent_encoding::percent_decode;

use crate::authorization::parse_authorization_header;
use crate::encode::encode;
use crate::{Parameters, RequestView, SignResult, OAUTH_SIGNATURE_KEY};

/// Constructs the signature base string of `request`.
///
/// `extra` holds the protocol parameters of this signing operation that are
/// not on the request yet (consumer key, nonce, timestamp, ...).
pub fn signature_base(request: &RequestView, extra: &Parameters) -> SignResult<String> {
    let base = base_string_uri(request)?;
    let values = collect_parameters(request, extra)?;
    let params = normalize_parameters(&values);

    Ok(format!(
        "{}&{}&{}",
        request.method().as_str(),
        encode(&base),
        encode(&params)
    ))
}

/// Builds the base string URI: lowercase scheme and host, no default port,
/// no query.
pub fn base_string_uri(request: &RequestView) -> SignResult<String> {
    let scheme = request.scheme().to_ascii_lowercase();
    let mut host = request.host().to_ascii_lowercase();
    let default_port = match scheme.as_str() {
        "http" => Some(":80"),
        "https" => Some(":443"),
        _ => None,
    };
    let keep = default_port
        .and_then(|port| host.strip_suffix(port))
        .filter(|stripped| is_port_separator(stripped))
        .map(str::len);
    if let Some(len) = keep {
        host.truncate(len);
    }

    let path = match request.path() {
        "" => "/",
        path => path,
    };

    Ok(format!("{}://{}{}", scheme, host, path))
}

/// Whether the colon right after `host` separates a port.
///
/// Holds for a plain host name and for a bracketed IPv6 literal, not for
/// a bare IPv6 address like `::80`.
fn is_port_separator(host: &str) -> bool {
    !host.is_empty() && (host.ends_with(']') || !host.contains(':'))
}

/// Collects the parameters taking part in the signature.
///
/// Sources are the query string, the form-encoded body, the `Authorization`
/// header and `extra`. `oauth_signature` is always excluded.
pub fn collect_parameters(request: &RequestView, extra: &Parameters) -> SignResult<Parameters> {
    let header = parse_authorization_header(request.authorization_header())?;

    let mut rv = Parameters::new();
    if let Some(query) = request.query() {
        rv.extend(decode_form(query.as_bytes()));
    }
    if let Some(body) = request.body() {
        rv.extend(decode_form(body));
    }
    rv.extend_from(&header);
    rv.extend_from(extra);

    rv.remove(OAUTH_SIGNATURE_KEY);

    tracing::trace!(
        names = rv.len(),
        from_header = header.len(),
        "collected signature parameters"
    );
    Ok(rv)
}

/// Splits `application/x-www-form-urlencoded` input into decoded pairs.
///
/// `+` means a space. Decoded octets are kept as they are, UTF-8 or not.
fn decode_form(input: &[u8]) -> impl Iterator<Item = (Vec<u8>, Vec<u8>)> + '_ {
    input
        .split(|&b| b == b'&')
        .filter(|sequence| !sequence.is_empty())
        .map(|sequence| {
            let mut split = sequence.splitn(2, |&b| b == b'=');
            let name = split.next().unwrap_or_default();
            let value = split.next().unwrap_or_default();
            (decode_component(name), decode_component(value))
        })
}

fn decode_component(input: &[u8]) -> Vec<u8> {
    let replaced = input
        .iter()
        .map(|&b| if b == b'+' { b' ' } else { b })
        .collect::<Vec<u8>>();
    percent_decode(&replaced).collect()
}

/// Encodes and sorts `params` into `k=v&k=v...`.
///
/// Names sort by their encoded form, and values of one name sort the same
/// way.
pub fn normalize_parameters(params: &Parameters) -> String {
    let mut encoded: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for (name, values) in params.groups() {
        encoded
            .entry(encode(name))
            .or_default()
            .extend(values.iter().map(|v| encode(v)));
    }

    let mut pairs = Vec::new();
    for (name, mut values) in encoded {
        values.sort();
        for value in values {
            pairs.push(format!("{}={}", name, value));
        }
    }
    pairs.join("&")
}

#[cfg(test)]
mod tests {
    use http::Method;
    use pretty_assertions::assert_eq;
    use url::Url;

    use super::*;

    const AUTHORIZATION_HEADER: &str = "OAuth realm=\"Example\",
oauth_consumer_key=\"9djdj82h48djs9d2\",
oauth_token=\"kkk9d7dh3k39sjv7\",
oauth_signature_method=\"HMAC-SHA1\",
oauth_timestamp=\"137131201\",
oauth_nonce=\"7d8f3e4a\",
oauth_signature=\"bYT5CMsGcbgUdFHObYMEfcx6bsw%3D\"";

    fn rfc_request() -> RequestView {
        let url = Url::parse("http://example.com/request?b5=%3D%253D&a3=a&c%40=&a2=r%20b").unwrap();
        RequestView::new(Method::POST, &url)
            .form_body("c2&a3=2+q")
            .authorization(AUTHORIZATION_HEADER)
    }

    fn rfc_parameters() -> Vec<(&'static str, &'static str)> {
        vec![
            ("b5", "=%3D"),
            ("a3", "a"),
            ("c@", ""),
            ("a2", "r b"),
            ("oauth_consumer_key", "9djdj82h48djs9d2"),
            ("oauth_token", "kkk9d7dh3k39sjv7"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "137131201"),
            ("oauth_nonce", "7d8f3e4a"),
            ("c2", ""),
            ("a3", "2 q"),
        ]
    }

    const RFC_NORMALIZED: &str = "\
        a2=r%20b&a3=2%20q&a3=a&b5=%3D%253D&c%40=&c2=&oauth_consumer_key=9dj\
        dj82h48djs9d2&oauth_nonce=7d8f3e4a&oauth_signature_method=HMAC-SHA1\
        &oauth_timestamp=137131201&oauth_token=kkk9d7dh3k39sjv7";

    #[test]
    fn rfc_signature_base() {
        let expected = "\
            POST&http%3A%2F%2Fexample.com%2Frequest&a2%3Dr%2520b%26a3%3D2%2520q\
            %26a3%3Da%26b5%3D%253D%25253D%26c%2540%3D%26c2%3D%26oauth_consumer_\
            key%3D9djdj82h48djs9d2%26oauth_nonce%3D7d8f3e4a%26oauth_signature_m\
            ethod%3DHMAC-SHA1%26oauth_timestamp%3D137131201%26oauth_token%3Dkkk\
            9d7dh3k39sjv7";

        let out = signature_base(&rfc_request(), &Parameters::new()).unwrap();
        assert_eq!(out, expected);
    }

    #[test]
    fn signature_base_propagates_header_errors() {
        let request = rfc_request().authorization("OAuth oauth_token");
        assert!(signature_base(&request, &Parameters::new()).is_err());
    }

    #[test]
    fn base_string_uri_scenarios() {
        let tests = [
            ("http", "EXAMPLE.COM:80", "/r%20v/X?id=123", "http://example.com/r%20v/X"),
            ("https", "www.example.net:8080", "/?q=1", "https://www.example.net:8080/"),
            ("HTTPS", "Example.com:443", "/a", "https://example.com/a"),
            ("https", "example.com:80", "/", "https://example.com:80/"),
            ("http", "example.com:443", "/", "http://example.com:443/"),
            ("http", "[::1]:80", "/", "http://[::1]/"),
            ("http", "::80", "/", "http://::80/"),
        ];

        for (i, (scheme, host, target, out)) in tests.iter().enumerate() {
            let request = RequestView::from_parts(Method::GET, *scheme, *host, target).unwrap();
            let uri = base_string_uri(&request).unwrap();
            assert_eq!(uri, *out, "{}. {}://{}{}", i, scheme, host, target);
        }
    }

    #[test]
    fn base_string_uri_from_url() {
        let url = Url::parse("http://EXAMPLE.COM:80/r%20v/X?id=123").unwrap();
        let uri = base_string_uri(&RequestView::new(Method::GET, &url)).unwrap();
        assert_eq!(uri, "http://example.com/r%20v/X");

        let url = Url::parse("foo://example.com").unwrap();
        assert_eq!(url.path(), "");
        let uri = base_string_uri(&RequestView::new(Method::GET, &url)).unwrap();
        assert_eq!(uri, "foo://example.com/");
    }

    #[test]
    fn signature_base_keeps_non_utf8_query_octets() {
        let url = Url::parse("http://example.com/r?a=%FF").unwrap();
        let request = RequestView::new(Method::GET, &url);
        let values = collect_parameters(&request, &Parameters::new()).unwrap();
        assert_eq!(normalize_parameters(&values), "a=%FF");
        assert_eq!(
            signature_base(&request, &Parameters::new()).unwrap(),
            "GET&http%3A%2F%2Fexample.com%2Fr&a%3D%25FF"
        );
    }

    #[test]
    fn collect_all_sources() {
        let extra: Parameters = vec![("oauth_verifier", "473f82d3")].into_iter().collect();
        let values = collect_parameters(&rfc_request(), &extra).unwrap();

        assert!(values.contains_key("b5"), "query component should be processed");
        assert!(
            values.contains_key("oauth_token"),
            "authorization header should be processed"
        );
        assert!(values.contains_key("c2"), "entity body should be processed");
        assert!(values.contains_key("oauth_verifier"), "extra should be processed");
        assert!(
            !values.contains_key("oauth_signature"),
            "oauth_signature MUST be excluded"
        );
        assert!(!values.contains_key("realm"));
        assert_eq!(values.get("c@"), Some(""));
        assert_eq!(values.get("b5"), Some("=%3D"));
        assert_eq!(values.get_all("a3"), &[b"a".to_vec(), b"2 q".to_vec()]);
    }

    #[test]
    fn collect_excludes_signature_from_every_source() {
        let url = Url::parse("http://example.com/?oauth_signature=q").unwrap();
        let request = RequestView::new(Method::POST, &url)
            .form_body("oauth_signature=b")
            .authorization("OAuth oauth_signature=\"h\"");
        let extra: Parameters = vec![("oauth_signature", "e")].into_iter().collect();
        let values = collect_parameters(&request, &extra).unwrap();
        assert!(values.is_empty());
        assert_eq!(normalize_parameters(&values), "");
    }

    #[test]
    fn collect_keeps_duplicates_across_sources() {
        let url = Url::parse("http://example.com/?oauth_nonce=a").unwrap();
        let request = RequestView::new(Method::GET, &url).authorization("OAuth oauth_nonce=\"b\"");
        let extra: Parameters = vec![("oauth_nonce", "c")].into_iter().collect();
        let values = collect_parameters(&request, &extra).unwrap();
        assert_eq!(values.get_all("oauth_nonce").len(), 3);
    }

    #[test]
    fn collect_keeps_non_utf8_octets() {
        let url = Url::parse("http://example.com/r?a=%FF&b=caf%E9+au+lait").unwrap();
        let request = RequestView::new(Method::POST, &url).form_body("%C0=%80%2B");
        let values = collect_parameters(&request, &Parameters::new()).unwrap();

        assert_eq!(values.get_bytes("a"), Some(&[0xFFu8][..]));
        assert_eq!(values.get("a"), None);
        assert_eq!(values.get_bytes("b"), Some(&b"caf\xE9 au lait"[..]));
        assert_eq!(values.get_bytes(&[0xC0u8][..]), Some(&[0x80u8, b'+'][..]));
        assert_eq!(
            normalize_parameters(&values),
            "%C0=%80%2B&a=%FF&b=caf%E9%20au%20lait"
        );
    }

    #[test]
    fn decode_form_sequences() {
        let pairs = decode_form(b"c2&a3=2+q&&=x&k=a=b").collect::<Vec<_>>();
        assert_eq!(
            pairs,
            vec![
                (b"c2".to_vec(), Vec::new()),
                (b"a3".to_vec(), b"2 q".to_vec()),
                (Vec::new(), b"x".to_vec()),
                (b"k".to_vec(), b"a=b".to_vec()),
            ]
        );
    }

    #[test]
    fn rfc_normalized_parameters() {
        let params: Parameters = rfc_parameters().into_iter().collect();
        assert_eq!(normalize_parameters(&params), RFC_NORMALIZED);
    }

    #[test]
    fn normalization_ignores_insertion_order() {
        let mut reversed = rfc_parameters();
        reversed.reverse();
        let forward: Parameters = rfc_parameters().into_iter().collect();
        let backward: Parameters = reversed.into_iter().collect();
        assert_eq!(normalize_parameters(&forward), normalize_parameters(&backward));
        assert_eq!(normalize_parameters(&backward), RFC_NORMALIZED);
    }

    #[test]
    fn normalization_sorts_by_encoded_form() {
        // '%' (0x25) sorts before digits and letters once encoded
        let params: Parameters = vec![("a", "z"), ("a", " "), ("a", "Z"), ("!", "1")]
            .into_iter()
            .collect();
        assert_eq!(normalize_parameters(&params), "%21=1&a=%20&a=Z&a=z");
    }

    #[test]
    fn normalize_empty() {
        assert_eq!(normalize_parameters(&Parameters::new()), "");
    }
}
