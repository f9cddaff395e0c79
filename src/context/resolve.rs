//! Elapsed-time and transfer-size resolution from raw proxy fields.

use crate::math::parse_number;

/// Parse an elapsed-time field into seconds.
///
/// Proxies chain upstream timings across hops as `"0.120, 0.300"`; only the
/// first hop is used. `"-"`, empty, absent and unparsable values are `0`.
/// Negative values are returned unchanged.
pub fn parse_time_seconds(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else { return 0.0 };
    if raw.is_empty() || raw == "-" {
        return 0.0;
    }
    let first = raw.split(',').next().unwrap_or("").trim();
    if first.is_empty() || first == "-" {
        return 0.0;
    }
    parse_number(first, 0.0)
}

/// Elapsed seconds for a request: upstream time when positive, else total
/// request time.
pub fn resolve_time_seconds(upstream_response_time: Option<&str>, request_time: Option<&str>) -> f64 {
    let upstream = parse_time_seconds(upstream_response_time);
    if upstream > 0.0 {
        return upstream;
    }
    parse_time_seconds(request_time)
}

/// Bytes transferred: the larger of request and response size.
pub fn data_size_bytes(request_length: Option<&str>, body_bytes_sent: Option<&str>) -> f64 {
    let request_bytes = request_length.map_or(0.0, |raw| parse_number(raw, 0.0));
    let response_bytes = body_bytes_sent.map_or(0.0, |raw| parse_number(raw, 0.0));
    if response_bytes > request_bytes {
        response_bytes
    } else {
        request_bytes
    }
}
