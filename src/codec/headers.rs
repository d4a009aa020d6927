//! Header codec.

use axum::http::{HeaderMap, HeaderName, HeaderValue};

use crate::dispatch::types::HandlerError;
use crate::edge::EdgeHeaderMap;

/// Convert edge headers into a canonical header map.
///
/// Lines with an empty value are dropped. Values for one name keep their
/// edge order.
pub fn to_canonical_headers(edge: &EdgeHeaderMap) -> Result<HeaderMap, HandlerError> {
    let mut headers = HeaderMap::new();

    for (name, lines) in edge.iter() {
        for line in lines.iter().filter(|l| !l.value.is_empty()) {
            let header_name = HeaderName::from_bytes(name.as_bytes()).map_err(|_| {
                HandlerError::InvalidHeader {
                    name: name.to_string(),
                }
            })?;
            let header_value = HeaderValue::from_str(&line.value).map_err(|_| {
                HandlerError::InvalidHeader {
                    name: name.to_string(),
                }
            })?;
            headers.append(header_name, header_value);
        }
    }

    Ok(headers)
}

/// Convert canonical response headers into the edge representation.
///
/// Every value is kept, including empty ones.
pub fn from_canonical_headers(headers: &HeaderMap) -> EdgeHeaderMap {
    let mut edge = EdgeHeaderMap::new();

    for name in headers.keys() {
        for value in headers.get_all(name) {
            edge.append(
                name.as_str(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            );
        }
    }

    edge
}
