/// Quiet period before a pending input change turns into a prediction request (ms)
pub const DEBOUNCE_MS: u64 = 300;

/// How long the event loop blocks waiting for terminal input per tick (ms)
pub const EVENT_POLL_MS: u64 = 30;

/// Per-request timeout so a hung server settles as a failure instead of
/// leaving the loading indicator stuck
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Prediction server base URL when neither the CLI arg nor the env var is set
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:5000";

/// Env var overriding the server base URL (also read from .env)
pub const SERVER_URL_ENV: &str = "WORDPILOT_SERVER";

/// Dot-directory for debug and panic logs
pub const DOT_DIR: &str = ".wordpilot";
