use chrono::{DateTime, FixedOffset, NaiveDateTime, Offset, TimeZone, Utc};

/// Asia/Jakarta is UTC+7 with no daylight saving
const JAKARTA_OFFSET_SECS: i32 = 7 * 3600;

/// Naive layouts seen in vendor payloads, interpreted in the gateway timezone
const NAIVE_LAYOUTS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"];

/// Timezone a gateway uses for timestamps that carry no offset.
/// Midtrans reports Asia/Jakarta local time, Xendit and unknown gateways use UTC.
pub fn gateway_offset(gateway: &str) -> FixedOffset {
    match gateway.to_lowercase().as_str() {
        "midtrans" => FixedOffset::east_opt(JAKARTA_OFFSET_SECS).unwrap_or_else(|| Utc.fix()),
        _ => Utc.fix(),
    }
}

/// Parse a vendor timestamp into UTC.
///
/// RFC 3339 strings keep their own offset; naive `YYYY-MM-DD HH:MM:SS`
/// strings are read in the gateway's local timezone.
pub fn parse_gateway_timestamp(raw: &str, gateway: &str) -> Result<DateTime<Utc>, String> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    let offset = gateway_offset(gateway);
    for layout in NAIVE_LAYOUTS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, layout) {
            if let Some(local) = offset.from_local_datetime(&naive).single() {
                return Ok(local.with_timezone(&Utc));
            }
        }
    }

    Err(format!("Invalid {} timestamp: {}", gateway, raw))
}
