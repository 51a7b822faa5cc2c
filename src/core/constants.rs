// Board
pub const BOARD_WIDTH: usize = 10;
pub const BOARD_HEIGHT: usize = 10;
pub const BOARD_MINES: usize = 10;

// Timing
pub const TICK_INTERVAL_MS: u64 = 100;
pub const MESSAGE_DURATION_MS: u64 = 2000;

// Round scoring
pub const WIN_SCORE_BASE: u32 = 200;
pub const WIN_SCORE_FLOOR: u32 = 10;

// XP and leveling
pub const STARTING_XP_TO_NEXT_LEVEL: u32 = 100;
pub const XP_WIN_BASE: u32 = 50;
pub const XP_WIN_TIME_BONUS_CAP: u32 = 100;
pub const XP_WIN_SCORE_DIVISOR: u32 = 10;
pub const XP_LOSS_BASE: u32 = 10;
pub const XP_LOSS_TIME_DIVISOR: u32 = 10;
pub const XP_LOSS_CELLS_DIVISOR: u32 = 2;

// Abilities
pub const SCANNER_MINES_SHOWN: usize = 3;
pub const SCANNER_DURATION_MS: u64 = 3000;
pub const HINT_DURATION_MS: u64 = 2000;
pub const TELEPATHY_DURATION_MS: u64 = 5000;
pub const TIME_SHIELD_SECONDS: u64 = 10;
pub const MAGNETISM_CELLS: usize = 3;
// Ceiling for counters read back from a save file
pub const MAX_ABILITY_LEVEL: u32 = 999;
pub const MAX_ABILITY_USES: u32 = 999;

// Persistence
pub const SAVE_DIR_NAME: &str = ".minesweep";
pub const PROFILE_FILE_NAME: &str = "profile.json";
