//! Bearer token minting.

use chrono::{DateTime, Duration, Utc};
use failure::{Fallible, ResultExt};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};

/// Issuer claim expected by the server metrics endpoint.
static TOKEN_ISSUER: &str = "prometheus";

/// Default token lifetime: 100 years.
///
/// Tokens are never refreshed, rotation happens by generating a new config.
pub(crate) const DEFAULT_VALIDITY_SECS: u64 = 100 * 365 * 24 * 60 * 60;

/// JWT claims carried by a bearer token.
#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub(crate) struct Claims {
    pub(crate) exp: i64,
    pub(crate) sub: String,
    pub(crate) iss: String,
}

/// Mint an HS512-signed bearer token for `account`.
///
/// The token expires `validity` after `issued_at`. An empty secret
/// is rejected.
pub(crate) fn mint(
    account: &str,
    secret: &[u8],
    issued_at: DateTime<Utc>,
    validity: Duration,
) -> Fallible<String> {
    if secret.is_empty() {
        bail!("cannot sign bearer token for '{}': empty secret key", account);
    }
    let expires_at = issued_at
        .checked_add_signed(validity)
        .ok_or_else(|| format_err!("token expiry out of range (validity: {})", validity))?;

    let claims = Claims {
        exp: expires_at.timestamp(),
        sub: account.to_string(),
        iss: TOKEN_ISSUER.to_string(),
    };
    trace!("minting bearer token for '{}', expiring at {}", account, expires_at);

    let header = Header::new(Algorithm::HS512);
    let token = encode(&header, &claims, &EncodingKey::from_secret(secret))
        .context("failed to sign bearer token")?;
    Ok(token)
}
