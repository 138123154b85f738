// Tuning constants for playback and the client data layer.
// Values that users may want to adjust live in `Config`; these are the defaults and
// the fixed protocol strings.

// === Stream proxy ===
/// Path of the same-origin relay, appended to the API base URL
pub const PROXY_STREAM_PATH: &str = "/proxy/stream";
/// Query parameter carrying the percent-encoded upstream URL
pub const PROXY_URL_PARAM: &str = "url";

// === Playback gating ===
pub const MIN_START_BUFFER_SECS: f64 = 0.5;

// === Stall recovery ===
pub const EDGE_NUDGE_WINDOW_SECS: f64 = 0.35;
pub const EDGE_NUDGE_BACKOFF_SECS: f64 = 0.05;
pub const GAP_SKIP_WINDOW_SECS: f64 = 1.0;
pub const GAP_SKIP_OFFSET_SECS: f64 = 0.1;

// === Autoplay ===
pub const AUTOPLAY_MAX_ATTEMPTS: u32 = 5;
pub const AUTOPLAY_STEP_DELAY_MS: u64 = 300;

// === Overlay timers ===
pub const CONTROLS_HIDE_SECS: u64 = 10;
pub const PAUSE_OVERLAY_SECS: u64 = 2;

// === Quality ===
pub const AUTO_QUALITY_LABEL: &str = "Auto";

// === Client cache keys ===
pub const DASHBOARD_CACHE_KEY: &str = "dashboard_movies";
pub const MOVIES_CACHE_KEY: &str = "all_movies";
pub const MY_LIST_CACHE_KEY: &str = "my_list";
pub const CACHE_CAPACITY: usize = 64;

// === Session ===
pub const SESSION_COOKIE: &str = "token";
pub const ROLE_COOKIE: &str = "role";
pub const API_BASE_URL_ENV: &str = "CINESTREAM_API_BASE_URL";

// === Backend endpoints ===
pub const MOVIES_PATH: &str = "/movies";
pub const MY_LIST_PATH: &str = "/mylist";

// === Dashboard rows ===
pub const RECENTLY_ADDED_TITLE: &str = "Recently Added";
pub const RECENTLY_ADDED_LIMIT: usize = 10;

// === Routes ===
pub const LOGIN_ROUTE: &str = "/login";
pub const REGISTER_ROUTE: &str = "/register";
pub const HOME_ROUTE: &str = "/dashboard";
pub const ADMIN_ROUTE: &str = "/admin";
pub const PROTECTED_ROUTES: &[&str] = &["/dashboard", "/movies", "/my-list", "/watch", "/admin"];
