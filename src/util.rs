use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use std::path::Path;
use time::format_description::well_known::Rfc3339;
use time::{OffsetDateTime, UtcOffset};
use unicode_normalization::UnicodeNormalization;

pub fn ensure_dir(p: &Path) -> Result<()> {
    std::fs::create_dir_all(p).with_context(|| format!("create_dir_all {}", p.display()))
}

pub fn sha256_hex(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    format!("{:x}", h.finalize())
}

pub fn now_rfc3339() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_else(|_| "1970-01-01T00:00:00Z".to_string())
}

/// Wall clock shifted to the configured fixed offset. Date tags in reports
/// follow local time at the measurement site, not UTC.
pub fn now_with_offset(hours: i8) -> Result<OffsetDateTime> {
    let offset = UtcOffset::from_hms(hours, 0, 0)
        .with_context(|| format!("invalid utc offset: {hours}"))?;
    Ok(OffsetDateTime::now_utc().to_offset(offset))
}

/// NFC-normalizes template text so tag tokens match even when the file was
/// saved with decomposed codepoints.
pub fn nfc(text: &str) -> String {
    text.nfc().collect()
}
