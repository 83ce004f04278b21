#![forbid(unsafe_code)]

use std::borrow::Cow;
use std::fmt;

use poem::http::HeaderValue;

use crate::utils::errors::Errors;

// ***************************************************************************
//                               BasicChallenge
// ***************************************************************************
/// Challenge carried by the `WWW-Authenticate` header for the HTTP Basic
/// authentication scheme (RFC 7617).  The realm is optional; without one the
/// challenge renders as the bare scheme name.
#[derive(Eq, PartialEq, Debug, Default, Clone)]
pub struct BasicChallenge {
    realm: Option<Cow<'static, str>>,
}

impl BasicChallenge {
    pub fn new() -> Self {
        BasicChallenge::default()
    }

    pub fn with_realm<T>(realm: T) -> Self
    where
        T: Into<Cow<'static, str>>,
    {
        BasicChallenge { realm: Some(realm.into()) }
    }

    // ---------------------------------------------------------------------------
    // to_header_value:
    // ---------------------------------------------------------------------------
    /** Render the challenge as a header value.  Fails only if the realm holds
     * bytes that are not legal in an HTTP header.
     */
    pub fn to_header_value(&self) -> Result<HeaderValue, Errors> {
        HeaderValue::from_str(&self.to_string())
            .map_err(|e| Errors::InvalidHeaderValue(format!("{}: {}", self, e)))
    }
}

impl fmt::Display for BasicChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Basic")?;
        if let Some(ref realm) = self.realm {
            f.write_str(" realm=\"")?;
            // Embedded quotes would terminate the quoted-string early.
            for (i, part) in realm.split('"').enumerate() {
                if i > 0 {
                    f.write_str("\\\"")?;
                }
                f.write_str(part)?;
            }
            f.write_str("\"")?;
        }
        Ok(())
    }
}
