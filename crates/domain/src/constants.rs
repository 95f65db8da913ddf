//! Service constants
//!
//! Hosts, limits and well-known error codes of the WeCom server API.

// Endpoints
pub const DEFAULT_API_BASE_URL: &str = "https://qyapi.weixin.qq.com/cgi-bin";
pub const DEFAULT_OAUTH_BASE_URL: &str = "https://open.work.weixin.qq.com";
pub const TOKEN_PATH: &str = "gettoken";
pub const OAUTH_QR_CONNECT_PATH: &str = "/wwopen/sso/qrConnect";

// Error codes
pub const ERRCODE_OK: i64 = 0;
pub const ERRCODE_SYSTEM_BUSY: i64 = -1;
pub const ERRCODE_INVALID_TOKEN: i64 = 40014;
pub const ERRCODE_MISSING_TOKEN: i64 = 41001;
pub const ERRCODE_TOKEN_EXPIRED: i64 = 42001;
pub const ERRCODE_FREQUENCY_LIMIT: i64 = 45009;
pub const ERRCODE_CONCURRENCY_LIMIT: i64 = 45033;

// Request limits
pub const MAX_TAG_USERS_PER_REQUEST: usize = 1000;
pub const MAX_TAG_PARTIES_PER_REQUEST: usize = 100;
pub const MIN_LIST_ID_LIMIT: u32 = 1;
pub const MAX_LIST_ID_LIMIT: u32 = 10_000;
pub const MIN_EXPORT_BLOCK_SIZE: u32 = 10_000;
pub const MAX_EXPORT_BLOCK_SIZE: u32 = 1_000_000;

// Root department of every corp
pub const ROOT_DEPARTMENT_ID: u32 = 1;
