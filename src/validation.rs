//! Field-format validators for tax identifiers and contact fields.
//!
//! Format checks only: GST/PAN are matched against the published layout,
//! not checksummed. These run in the form layer before any network call;
//! the gateway and stores never call them.

use std::sync::OnceLock;

use regex::Regex;

fn gst_regex() -> &'static Regex {
    static GST_RE: OnceLock<Regex> = OnceLock::new();
    GST_RE.get_or_init(|| {
        Regex::new(r"^[0-9]{2}[A-Z]{5}[0-9]{4}[A-Z][0-9A-Z]Z[0-9A-Z]$")
            .expect("GST regex should compile")
    })
}

fn pan_regex() -> &'static Regex {
    static PAN_RE: OnceLock<Regex> = OnceLock::new();
    PAN_RE.get_or_init(|| Regex::new(r"^[A-Z]{5}[0-9]{4}[A-Z]$").expect("PAN regex should compile"))
}

fn phone_regex() -> &'static Regex {
    static PHONE_RE: OnceLock<Regex> = OnceLock::new();
    PHONE_RE.get_or_init(|| Regex::new(r"^[6-9][0-9]{9}$").expect("phone regex should compile"))
}

fn email_regex() -> &'static Regex {
    static EMAIL_RE: OnceLock<Regex> = OnceLock::new();
    EMAIL_RE.get_or_init(|| {
        Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email regex should compile")
    })
}

fn hex_color_regex() -> &'static Regex {
    static HEX_RE: OnceLock<Regex> = OnceLock::new();
    HEX_RE.get_or_init(|| Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("hex color regex should compile"))
}

/// GSTIN layout: 2 digits, 5 letters, 4 digits, 1 letter, 1 alphanumeric,
/// literal `Z`, 1 alphanumeric.
pub fn validate_gst(value: &str) -> bool {
    gst_regex().is_match(value)
}

/// PAN layout: 5 letters, 4 digits, 1 letter.
pub fn validate_pan(value: &str) -> bool {
    pan_regex().is_match(value)
}

/// Ten-digit mobile number starting 6-9.
pub fn validate_phone(value: &str) -> bool {
    phone_regex().is_match(value)
}

pub fn validate_email(value: &str) -> bool {
    email_regex().is_match(value)
}

/// Six-digit `#RRGGBB` color used by the branding settings.
pub fn validate_hex_color(value: &str) -> bool {
    hex_color_regex().is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gst_accepts_valid_layout() {
        assert!(validate_gst("27ABCDE1234F1Z5"));
        assert!(validate_gst("09PQRSX9876K2ZB"));
    }

    #[test]
    fn test_gst_rejects_wrong_shapes() {
        assert!(!validate_gst(""));
        assert!(!validate_gst("27ABCDE1234F1Y5")); // no literal Z
        assert!(!validate_gst("2ABCDE1234F1Z5")); // one leading digit
        assert!(!validate_gst("27abcde1234F1Z5")); // lowercase letters
        assert!(!validate_gst("27ABCDE1234F1Z55")); // trailing extra
        assert!(!validate_gst("27ABCD1234F1Z5")); // four letters
    }

    #[test]
    fn test_pan_exact_layout() {
        assert!(validate_pan("ABCDE1234F"));
        assert!(!validate_pan("ABCDE1234"));
        assert!(!validate_pan("ABCD1234FF"));
        assert!(!validate_pan("abcde1234f"));
        assert!(!validate_pan("ABCDE1234F1"));
    }

    #[test]
    fn test_phone_ten_digit_mobile() {
        assert!(validate_phone("9876543210"));
        assert!(!validate_phone("1876543210")); // bad leading digit
        assert!(!validate_phone("987654321")); // nine digits
        assert!(!validate_phone("98765432100"));
    }

    #[test]
    fn test_email_basic_shape() {
        assert!(validate_email("ops@acme.example"));
        assert!(!validate_email("not-an-email"));
        assert!(!validate_email("a@b"));
    }

    #[test]
    fn test_hex_color_six_digits_only() {
        assert!(validate_hex_color("#1A2b3C"));
        assert!(!validate_hex_color("1A2B3C"));
        assert!(!validate_hex_color("#1A2B3"));
        assert!(!validate_hex_color("#1A2B3G"));
    }
}
