#![forbid(unsafe_code)]

use poem::http::{header, StatusCode};
use poem::{handler, Response};

use crate::RUNTIME_CTX;

// ***************************************************************************
//                             Challenge Endpoint
// ***************************************************************************
// ---------------------------------------------------------------------------
// challenge:
// ---------------------------------------------------------------------------
/** Answer every request with the same Basic authentication challenge.
 *
 * Nothing in the request is read: method, path, headers and body are all
 * ignored, and a supplied Authorization header is never checked.
 */
#[handler]
pub fn challenge() -> Response {
    Response::builder()
        .status(StatusCode::UNAUTHORIZED)
        .header(header::WWW_AUTHENTICATE, RUNTIME_CTX.challenge.clone())
        .body(RUNTIME_CTX.config.body.clone())
}
