use super::*;

fn make_token(payload_json: &str) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(payload_json.as_bytes());
    format!("{header}.{payload}.sig")
}

// =============================================================================
// expiry — happy path
// =============================================================================

#[test]
fn expiry_reads_exp_claim() {
    let token = make_token(r#"{"user_id":7,"exp":1735689600}"#);
    let at = expiry(&token).unwrap();
    assert_eq!(at.unix_timestamp(), 1_735_689_600);
}

#[test]
fn expiry_ignores_other_claims() {
    let token = make_token(r#"{"exp":1700000000,"iat":1699990000,"sub":"u-1"}"#);
    let at = expiry(&token).unwrap();
    assert_eq!(at.unix_timestamp(), 1_700_000_000);
}

#[test]
fn expiry_tolerates_padded_payload() {
    // Some encoders emit padded base64; the decoder strips '=' first.
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"none"}"#);
    let mut payload = URL_SAFE_NO_PAD.encode(br#"{"exp":1700000000}"#);
    while payload.len() % 4 != 0 {
        payload.push('=');
    }
    let token = format!("{header}.{payload}.x");
    assert_eq!(expiry(&token).unwrap().unix_timestamp(), 1_700_000_000);
}

// =============================================================================
// expiry — fail-closed paths
// =============================================================================

#[test]
fn expiry_rejects_two_segments() {
    let err = expiry("abc.def").unwrap_err();
    assert!(matches!(err, TokenError::Malformed));
}

#[test]
fn expiry_rejects_four_segments() {
    let err = expiry("a.b.c.d").unwrap_err();
    assert!(matches!(err, TokenError::Malformed));
}

#[test]
fn expiry_rejects_empty_string() {
    assert!(matches!(expiry("").unwrap_err(), TokenError::Malformed));
}

#[test]
fn expiry_rejects_non_base64_payload() {
    let err = expiry("head.!!not-base64!!.sig").unwrap_err();
    assert!(matches!(err, TokenError::Encoding(_)));
}

#[test]
fn expiry_rejects_non_json_payload() {
    let payload = URL_SAFE_NO_PAD.encode(b"plain text");
    let err = expiry(&format!("h.{payload}.s")).unwrap_err();
    assert!(matches!(err, TokenError::Payload(_)));
}

#[test]
fn expiry_rejects_missing_exp() {
    let token = make_token(r#"{"user_id":7}"#);
    assert!(matches!(expiry(&token).unwrap_err(), TokenError::MissingExp));
}

#[test]
fn expiry_rejects_string_exp() {
    let token = make_token(r#"{"exp":"1700000000"}"#);
    assert!(matches!(expiry(&token).unwrap_err(), TokenError::MissingExp));
}

#[test]
fn expiry_rejects_out_of_range_exp() {
    let token = make_token(r#"{"exp":999999999999999999}"#);
    assert!(matches!(expiry(&token).unwrap_err(), TokenError::ExpOutOfRange(_)));
}
