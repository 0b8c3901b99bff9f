//! Constants for the center ledger

// =============================================================================
// Remote sheet
// =============================================================================

/// Spreadsheet holding the daily center ledger
pub const DEFAULT_SPREADSHEET_ID: &str = "1gomjbrX0pULJ4njnV8NksMJoVddc23aHzEvmwi65iKA";

/// Worksheet (tab) name inside the spreadsheet
pub const DEFAULT_WORKSHEET: &str = "시트1";

/// Sheets API values endpoint
pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// OAuth scopes requested for the service account
pub const SCOPES: [&str; 2] = [
    "https://www.googleapis.com/auth/spreadsheets",
    "https://www.googleapis.com/auth/drive",
];

/// JWT bearer grant used for service-account token exchange
pub const JWT_BEARER_GRANT: &str = "urn:ietf:params:oauth:grant-type:jwt-bearer";

/// Lifetime requested for the signed assertion (seconds)
pub const ASSERTION_LIFETIME_SECS: i64 = 3600;

/// Refresh an access token this many seconds before it expires
pub const TOKEN_REFRESH_MARGIN_SECS: i64 = 60;

// =============================================================================
// Sheet columns
// =============================================================================

pub const DATE_COLUMN: &str = "date";
pub const CENTER_1_COLUMN: &str = "center_1";
pub const CENTER_2_COLUMN: &str = "center_2";
pub const CENTER_1_GOODS_COLUMN: &str = "center_1_goods";
pub const CENTER_1_ARMY_COLUMN: &str = "center_1_army";
pub const CENTER_1_LABEL_COLUMN: &str = "center_1_label";
pub const CENTER_2_GOODS_COLUMN: &str = "center_2_goods";
pub const CENTER_2_LABEL_COLUMN: &str = "center_2_label";

/// Raw won per display unit (만원)
pub const MANWON: f64 = 10_000.0;

// =============================================================================
// Presentation
// =============================================================================

/// Fill for negative values
pub const NEGATIVE_COLOR: &str = "rgb(255,171,171)";

/// Fill for zero and positive values
pub const POSITIVE_COLOR: &str = "rgb(131,201,255)";

/// Cumulative line color on combo charts
pub const CUMULATIVE_LINE_COLOR: &str = "rgb(1,104,201)";

/// Primary axis spans ±(max |value| × this)
pub const AXIS_HEADROOM: f64 = 1.2;

/// Per-bar labels sit this fraction of max |value| away from the bar end
pub const LABEL_OFFSET_RATIO: f64 = 0.05;

pub const COMBO_CHART_HEIGHT: u32 = 650;
pub const MONTHLY_CHART_HEIGHT: u32 = 500;

/// Company name used in page and section titles
pub const COMPANY_NAME: &str = "CJ 물류센터";

pub const DEFAULT_LOGO_PATH: &str = "/logo.svg";
pub const DEFAULT_LOGO_LINK: &str = "https://www.manpower.co.kr/";

/// Default in-memory cache lifetime for the normalized table (seconds)
pub const DEFAULT_CACHE_TTL_SECS: u64 = 300;

// =============================================================================
// Export
// =============================================================================

pub const MONTHLY_ROLLUP_FILENAME: &str = "monthly_rollup.csv";
pub const PERIOD_DETAIL_FILENAME: &str = "period_detail.csv";
