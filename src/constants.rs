pub const CHAT_API_NAME: &str = "SYNO.Chat.Post";
pub const CHAT_API_METHOD: &str = "list";
pub const CHAT_API_VERSION: &str = "5";

pub const CHAT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
    AppleWebKit/537.36 (KHTML, like Gecko) SynologyChat/1.2.3-232 \
    Chrome/98.0.4758.141 Electron/17.4.7 Safari/537.36";

pub const PAGE_SIZE: usize = 100;
pub const PAGE_DELAY_MS: u64 = 500;

// TimeGuessr result grammar
pub const GAME_HEADER: &str = "TimeGuessr #";
pub const SCORE_TRAILER: &str = "/50,000";
pub const ROUNDS_PER_GAME: usize = 5;
pub const SYMBOLS_PER_CLUSTER: usize = 3;

pub const GLOBE_MARKER: char = '\u{1F30E}'; // 🌎
pub const CALENDAR_MARKER: char = '\u{1F4C5}'; // 📅
pub const HIGH_MARKER: char = '\u{1F7E9}'; // 🟩
pub const MID_MARKER: char = '\u{1F7E8}'; // 🟨
pub const PRESENTATION_SELECTOR: char = '\u{FE0F}';

pub const HIGH_MARKER_POINTS: u8 = 2;
pub const MID_MARKER_POINTS: u8 = 1;

pub const ARCHIVE_FILE_PREFIX: &str = "data_channel-";
pub const DEFAULT_OUTPUT: &str = "timeguessr_dashboard.html";
pub const DEFAULT_CONFIG: &str = "guessr-board.json";
