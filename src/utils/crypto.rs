use data_encoding::HEXLOWER;
use ring::digest::{Context, SHA256};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

use crate::error::{LedgerError, Result};

pub fn sha256_digest(data: &[u8]) -> Vec<u8> {
    let mut context = Context::new(&SHA256);
    context.update(data);
    let digest = context.finish();
    digest.as_ref().to_vec()
}

/// SHA-256 over the input bytes, hex-encoded lowercase.
pub fn sha256_hex(data: &[u8]) -> String {
    HEXLOWER.encode(sha256_digest(data).as_slice())
}

/// Current UTC instant as an RFC 3339 string.
pub fn current_timestamp() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .map_err(|e| LedgerError::Serialization(format!("Time format error: {e}")))
}
