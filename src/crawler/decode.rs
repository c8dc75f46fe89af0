//! Response body decoding
//!
//! The site serves GB2312/GBK pages without reliable charset headers, so the
//! configured encoding is authoritative and BOM sniffing is disabled.

use encoding_rs::Encoding;

/// Decodes a body with the primary encoding, falling back on malformed input
///
/// Strict decodes are tried first with the primary encoding, then the
/// fallback. If both report malformed sequences the primary encoding is used
/// again, replacing malformed bytes with U+FFFD.
pub fn decode_body(bytes: &[u8], primary: &'static Encoding, fallback: &'static Encoding) -> String {
    if let Some(text) = primary.decode_without_bom_handling_and_without_replacement(bytes) {
        return text.into_owned();
    }

    if let Some(text) = fallback.decode_without_bom_handling_and_without_replacement(bytes) {
        tracing::warn!("Body is not valid {}, decoded as {}", primary.name(), fallback.name());
        return text.into_owned();
    }

    tracing::warn!(
        "Body is valid neither as {} nor as {}, replacing malformed bytes",
        primary.name(),
        fallback.name()
    );
    primary.decode_without_bom_handling(bytes).0.into_owned()
}

/// Looks up an encoding by its WHATWG label (e.g. `gb2312`, `utf-8`)
pub fn encoding_for(label: &str) -> Option<&'static Encoding> {
    Encoding::for_label(label.trim().as_bytes())
}
