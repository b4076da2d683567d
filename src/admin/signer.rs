//! AWS Signature V4 request signing for the admin API.

use chrono::{DateTime, Utc};
use failure::Fallible;
use hmac::{Hmac, Mac};
use sha2::{Digest, Sha256};
use url::Url;

static ALGORITHM: &str = "AWS4-HMAC-SHA256";
static SERVICE: &str = "s3";
static SIGNED_HEADERS: &str = "host;x-amz-content-sha256;x-amz-date";

/// SHA-256 of an empty payload.
pub(crate) static EMPTY_PAYLOAD_SHA256: &str =
    "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855";

/// Signing credentials.
#[derive(Debug)]
pub(crate) struct Credentials<'a> {
    pub(crate) access_key: &'a str,
    pub(crate) secret_key: &'a str,
    pub(crate) region: &'a str,
}

/// Compute the headers authenticating a body-less request to `url`.
pub(crate) fn sign_request(
    method: &str,
    url: &Url,
    creds: &Credentials,
    now: DateTime<Utc>,
) -> Fallible<Vec<(&'static str, String)>> {
    let amz_date = now.format("%Y%m%dT%H%M%SZ").to_string();
    let date = now.format("%Y%m%d").to_string();
    let scope = format!("{}/{}/{}/aws4_request", date, creds.region, SERVICE);

    let canonical = canonical_request(method, url, &amz_date)?;
    let string_to_sign = format!(
        "{}\n{}\n{}\n{}",
        ALGORITHM,
        amz_date,
        scope,
        hex::encode(Sha256::digest(canonical.as_bytes()))
    );

    let key = signing_key(creds.secret_key, &date, creds.region)?;
    let signature = hex::encode(hmac_sha256(&key, string_to_sign.as_bytes())?);
    let authorization = format!(
        "{} Credential={}/{}, SignedHeaders={}, Signature={}",
        ALGORITHM, creds.access_key, scope, SIGNED_HEADERS, signature
    );

    Ok(vec![
        ("x-amz-date", amz_date),
        ("x-amz-content-sha256", EMPTY_PAYLOAD_SHA256.to_string()),
        ("authorization", authorization),
    ])
}

/// Value of the `Host` header for `url`, default ports omitted.
pub(crate) fn host_header(url: &Url) -> Fallible<String> {
    let host = url
        .host_str()
        .ok_or_else(|| format_err!("missing host in URL '{}'", url))?;
    let value = match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    };
    Ok(value)
}

fn canonical_request(method: &str, url: &Url, amz_date: &str) -> Fallible<String> {
    let mut query: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| {
            (
                urlencoding::encode(&k).into_owned(),
                urlencoding::encode(&v).into_owned(),
            )
        })
        .collect();
    query.sort();
    let query = query
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    let canonical = format!(
        "{}\n{}\n{}\nhost:{}\nx-amz-content-sha256:{}\nx-amz-date:{}\n\n{}\n{}",
        method,
        url.path(),
        query,
        host_header(url)?,
        EMPTY_PAYLOAD_SHA256,
        amz_date,
        SIGNED_HEADERS,
        EMPTY_PAYLOAD_SHA256
    );
    Ok(canonical)
}

fn signing_key(secret_key: &str, date: &str, region: &str) -> Fallible<Vec<u8>> {
    let k_date = hmac_sha256(format!("AWS4{}", secret_key).as_bytes(), date.as_bytes())?;
    let k_region = hmac_sha256(&k_date, region.as_bytes())?;
    let k_service = hmac_sha256(&k_region, SERVICE.as_bytes())?;
    hmac_sha256(&k_service, b"aws4_request")
}

fn hmac_sha256(key: &[u8], data: &[u8]) -> Fallible<Vec<u8>> {
    let mut mac = Hmac::<Sha256>::new_from_slice(key)
        .map_err(|e| format_err!("failed to create HMAC: {}", e))?;
    mac.update(data);
    Ok(mac.finalize().into_bytes().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn creds() -> Credentials<'static> {
        Credentials {
            access_key: "AKIDEXAMPLE",
            secret_key: "wJalrXUtnFEMI/K7MDENG+bPxRfiCYEXAMPLEKEY",
            region: "us-east-1",
        }
    }

    #[test]
    fn empty_payload_digest() {
        assert_eq!(hex::encode(Sha256::digest(b"")), EMPTY_PAYLOAD_SHA256);
    }

    #[test]
    fn host_header_ports() {
        let url = Url::parse("https://minio.example.com:443/x").unwrap();
        assert_eq!(host_header(&url).unwrap(), "minio.example.com");
        let url = Url::parse("http://play.min.io:9000/x").unwrap();
        assert_eq!(host_header(&url).unwrap(), "play.min.io:9000");
    }

    #[test]
    fn canonical_request_layout() {
        let url = Url::parse("http://play.min.io:9000/minio/admin/v3/info?b=2&a=1 2").unwrap();
        let canonical = canonical_request("GET", &url, "20240501T120000Z").unwrap();
        let expected = format!(
            "GET\n/minio/admin/v3/info\na=1%202&b=2\nhost:play.min.io:9000\n\
             x-amz-content-sha256:{0}\nx-amz-date:20240501T120000Z\n\n\
             host;x-amz-content-sha256;x-amz-date\n{0}",
            EMPTY_PAYLOAD_SHA256
        );
        assert_eq!(canonical, expected);
    }

    #[test]
    fn signed_headers() {
        let url = Url::parse("http://play.min.io:9000/minio/admin/v3/info").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let headers = sign_request("GET", &url, &creds(), now).unwrap();

        assert_eq!(headers[0], ("x-amz-date", "20240501T120000Z".to_string()));
        assert_eq!(headers[1].1, EMPTY_PAYLOAD_SHA256);

        let (name, auth) = &headers[2];
        assert_eq!(*name, "authorization");
        let prefix = "AWS4-HMAC-SHA256 Credential=AKIDEXAMPLE/20240501/us-east-1/s3/aws4_request, \
                      SignedHeaders=host;x-amz-content-sha256;x-amz-date, Signature=";
        assert!(auth.starts_with(prefix), "unexpected header: {}", auth);
        assert_eq!(
            &auth[prefix.len()..],
            "091e56198babdab7be5ec213d78be6f0555e07058597b37d02325abe19e94e5a"
        );
    }

    #[test]
    fn signature_depends_on_secret() {
        let url = Url::parse("http://play.min.io:9000/minio/admin/v3/info").unwrap();
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let first = sign_request("GET", &url, &creds(), now).unwrap();
        let again = sign_request("GET", &url, &creds(), now).unwrap();
        let other = Credentials {
            secret_key: "other",
            ..creds()
        };
        let second = sign_request("GET", &url, &other, now).unwrap();

        assert_eq!(first[2], again[2]);
        assert_ne!(first[2], second[2]);
    }
}
