use super::*;
use std::sync::Mutex;

static ENV_LOCK: Mutex<()> = Mutex::new(());

const VARS: [&str; 7] = [
    "JIBBER_BASE_URL",
    "JIBBER_REQUEST_TIMEOUT_SECS",
    "JIBBER_CONNECT_TIMEOUT_SECS",
    "JIBBER_TYPING_BASE_MS",
    "JIBBER_TYPING_MAX_MS",
    "JIBBER_TYPING_CHARS_PER_SEC",
    "JIBBER_VICTORY_DELAY_MS",
];

/// # Safety
/// Callers hold `ENV_LOCK` so no other test touches the environment.
unsafe fn clear_jibber_env() {
    for var in VARS {
        unsafe { std::env::remove_var(var) };
    }
}

#[test]
fn from_env_defaults() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe { clear_jibber_env() };

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg, ClientConfig::default());
    assert_eq!(cfg.base_url, DEFAULT_BASE_URL);
    assert_eq!(cfg.victory_delay, Duration::from_millis(DEFAULT_VICTORY_DELAY_MS));
}

#[test]
fn from_env_parses_overrides() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_jibber_env();
        std::env::set_var("JIBBER_BASE_URL", "https://jibber.example/");
        std::env::set_var("JIBBER_REQUEST_TIMEOUT_SECS", "5");
        std::env::set_var("JIBBER_CONNECT_TIMEOUT_SECS", "2");
        std::env::set_var("JIBBER_TYPING_BASE_MS", "100");
        std::env::set_var("JIBBER_TYPING_MAX_MS", "300");
        std::env::set_var("JIBBER_TYPING_CHARS_PER_SEC", "50");
        std::env::set_var("JIBBER_VICTORY_DELAY_MS", "250");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.base_url, "https://jibber.example");
    assert_eq!(cfg.timeouts, HttpTimeouts { request_secs: 5, connect_secs: 2 });
    assert_eq!(cfg.pacing.base, Duration::from_millis(100));
    assert_eq!(cfg.pacing.max, Duration::from_millis(300));
    assert_eq!(cfg.pacing.chars_per_sec, 50);
    assert_eq!(cfg.victory_delay, Duration::from_millis(250));

    unsafe { clear_jibber_env() };
}

#[test]
fn from_env_ignores_unparseable_numbers() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_jibber_env();
        std::env::set_var("JIBBER_REQUEST_TIMEOUT_SECS", "soon");
        std::env::set_var("JIBBER_VICTORY_DELAY_MS", "-3");
    }

    let cfg = ClientConfig::from_env().unwrap();
    assert_eq!(cfg.timeouts.request_secs, DEFAULT_REQUEST_TIMEOUT_SECS);
    assert_eq!(cfg.victory_delay, Duration::from_millis(DEFAULT_VICTORY_DELAY_MS));

    unsafe { clear_jibber_env() };
}

#[test]
fn from_env_rejects_zero_typing_speed() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_jibber_env();
        std::env::set_var("JIBBER_TYPING_CHARS_PER_SEC", "0");
    }

    assert_eq!(ClientConfig::from_env(), Err(ConfigError::ZeroTypingSpeed));

    unsafe { clear_jibber_env() };
}

#[test]
fn from_env_rejects_ceiling_below_floor() {
    let _guard = ENV_LOCK.lock().unwrap();
    unsafe {
        clear_jibber_env();
        std::env::set_var("JIBBER_TYPING_BASE_MS", "900");
        std::env::set_var("JIBBER_TYPING_MAX_MS", "400");
    }

    assert_eq!(ClientConfig::from_env(), Err(ConfigError::CeilingBelowFloor { base_ms: 900, max_ms: 400 }));

    unsafe { clear_jibber_env() };
}
