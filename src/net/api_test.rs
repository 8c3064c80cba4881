use super::*;

#[test]
fn error_message_prefers_backend_error_field() {
    assert_eq!(error_message(r#"{"error": "No active game"}"#), "No active game");
}

#[test]
fn error_message_falls_back_to_raw_body() {
    assert_eq!(error_message("  Internal Server Error\n"), "Internal Server Error");
    assert_eq!(error_message(r#"{"detail": "nope"}"#), r#"{"detail": "nope"}"#);
}

#[test]
fn new_trims_trailing_slash_from_base_url() {
    let config = ClientConfig { base_url: "http://localhost:5000/".to_owned(), ..ClientConfig::default() };
    let api = HttpGameApi::new(&config).unwrap();
    assert_eq!(api.base_url(), "http://localhost:5000");
}
