use crate::errors::ServerError;
use crate::responses::ResultResp;
use astra::{Body, ResponseBuilder};
use mime::Mime;

/// Serve stored evidence bytes inline (photos render in the album,
/// audio plays in the browser).
pub fn file_response(bytes: Vec<u8>, media_type: &Mime) -> ResultResp {
    let resp = ResponseBuilder::new()
        .status(200)
        .header("Content-Type", media_type.as_ref())
        .header("Cache-Control", "no-cache")
        .body(Body::from(bytes))
        .map_err(|_| ServerError::InternalError)?;

    Ok(resp)
}
