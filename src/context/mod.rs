//! Request context derivation: path normalization plus time/size resolution.

pub mod path;
pub mod resolve;

pub use path::*;
pub use resolve::*;

use crate::domain::{RequestContext, RequestRecord};

impl RequestContext {
    /// Derive elapsed time and transfer size from raw request fields.
    pub fn from_record(record: &RequestRecord) -> Self {
        Self {
            time_sec: resolve_time_seconds(
                record.upstream_response_time.as_deref(),
                record.request_time.as_deref(),
            ),
            data_size_bytes: data_size_bytes(record.request_length.as_deref(), record.body_bytes_sent.as_deref()),
        }
    }
}

impl RequestRecord {
    /// Normalized lookup path for this request (`/` when the URI is missing).
    pub fn normalized_path(&self) -> String {
        normalize_opt_path(self.uri.as_deref())
    }

    /// Path used for the endpoint lookup: the normalized path normalized once
    /// more, so `/api//` resolves to `/api`.
    pub fn lookup_path(&self) -> String {
        normalize_path(&self.normalized_path())
    }
}
