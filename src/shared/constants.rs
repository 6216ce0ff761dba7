pub const APP_NAME: &str = "pixbot";

pub const CONFIG_FILE: &str = "pixbot.config";
pub const ERROR_LOG_FILE: &str = "pixbot-error.log";
pub const DEBUG_LOG_FILE: &str = "pixbot-debug.log";

pub const DEFAULT_IMG_WIDTH: u32 = 100;
pub const DEFAULT_CLICK_DELAY_MS: u64 = 3;

/// Default palette: the 22 swatches of a typical online drawing game,
/// top row then bottom row, left to right.
pub const DEFAULT_PALETTE: &[&str] = &[
    "ffffff", "c1c1c1", "ef130b", "ff7100", "ffe400", "00cc00", "00b2ff",
    "231fd3", "a300ba", "d37caa", "a0522d", "000000", "4c4c4c", "740b07",
    "c23800", "e8a200", "005510", "00569e", "0e0865", "550069", "a75574",
    "63300d",
];
