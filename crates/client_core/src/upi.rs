use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use shared::domain::Payee;

/// Percent-encoding set matching JS `encodeURIComponent`, which the payment
/// apps were verified against: spaces become `%20`, never `+`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Stands in for the student's name in the payment note until one is typed.
pub const NOTE_PLACEHOLDER: &str = "Pongal";

pub fn payment_note(student_name: &str) -> String {
    let who = if student_name.is_empty() {
        NOTE_PLACEHOLDER
    } else {
        student_name
    };
    format!("Snacks for {who}")
}

/// Builds the `upi://pay` deep link for the current selections. Always derived
/// fresh from its inputs; callers must not cache the result across edits.
pub fn payment_uri(payee: &Payee, amount: u32, student_name: &str) -> String {
    format!(
        "upi://pay?pa={}&pn={}&am={}&cu=INR&tn={}",
        payee.vpa,
        utf8_percent_encode(&payee.name, COMPONENT),
        amount,
        utf8_percent_encode(&payment_note(student_name), COMPONENT),
    )
}

/// GET URL for the third-party QR renderer. The response is an opaque image.
pub fn qr_image_url(qr_endpoint: &str, payment_uri: &str) -> String {
    format!(
        "{qr_endpoint}?size=400x400&data={}",
        utf8_percent_encode(payment_uri, COMPONENT)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payee() -> Payee {
        Payee {
            name: "Santhosh Nagaraj .m".into(),
            vpa: "msanthoshnagaraj-2@okhdfcbank".into(),
        }
    }

    #[test]
    fn uri_carries_amount_currency_and_raw_vpa() {
        let uri = payment_uri(&payee(), 57, "Asha");
        assert!(uri.starts_with("upi://pay?pa=msanthoshnagaraj-2@okhdfcbank&"));
        assert!(uri.contains("&am=57&cu=INR&"));
    }

    #[test]
    fn note_uses_placeholder_until_a_name_is_typed() {
        assert!(payment_uri(&payee(), 40, "").ends_with("&tn=Snacks%20for%20Pongal"));
        assert!(payment_uri(&payee(), 40, "Asha").ends_with("&tn=Snacks%20for%20Asha"));
    }

    #[test]
    fn display_name_is_percent_encoded_like_encode_uri_component() {
        let uri = payment_uri(&payee(), 40, "");
        assert!(uri.contains("&pn=Santhosh%20Nagaraj%20.m&"));
    }

    #[test]
    fn qr_url_nests_the_fully_encoded_payment_uri() {
        let uri = payment_uri(&payee(), 57, "");
        let qr = qr_image_url("https://api.qrserver.com/v1/create-qr-code/", &uri);
        assert!(qr.starts_with("https://api.qrserver.com/v1/create-qr-code/?size=400x400&data=upi%3A%2F%2Fpay"));
        // The inner URI's own percent signs must be double-encoded.
        assert!(qr.contains("%2520for%2520"));
    }
}
