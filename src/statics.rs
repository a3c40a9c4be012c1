use once_cell::sync::Lazy;
use regex::Regex;

/// `- Label : value`, where the number of dashes is the nesting depth.
pub static TEMPLATE_FIELD_RE: Lazy<Regex> =
    Lazy::new(|| unsafe { Regex::new(r"^(-+)\s*([A-Za-z][A-Za-z0-9_]*)\s*:(.*)$").unwrap_unchecked() });

pub static GAME_DATA_DIR: &str = "The Scroll of Taiwu_Data";
pub static MANAGED_ASSEMBLY: [&str; 3] = [GAME_DATA_DIR, "Managed", "Assembly-CSharp.dll"];
pub static EVENT_LANGUAGES_DIR: [&str; 2] = ["Event", "EventLanguages"];
pub static LANGUAGE_ASSET_BUNDLE: [&str; 3] = [GAME_DATA_DIR, "GameResources", "language_cn.uab"];
pub static STREAMING_LANGUAGE_DIR: [&str; 3] = [GAME_DATA_DIR, "StreamingAssets", "Language_CN"];

pub static LANGUAGE_KEY_TYPE: &str = "LanguageKey";

pub static DEFAULT_OUTPUT_DIR: &str = "zh-hans";
pub static EVENTS_OUTPUT_FILE: &str = "events.json";

pub static UI_LANGUAGE_STEM: &str = "ui_language";
pub static ADVENTURE_LANGUAGE_STEM: &str = "Adventure_language";

pub static DEFAULT_KEY_MARKER: &str = "LK_";
pub static KEY_VALUE_SEPARATOR: char = '=';
pub static SECTION_DIVIDER: &str = ">>>>>>>>>>>>>>>>>>";

pub static ESCAPED_NEW_LINE: &str = r"\n";
pub static QUALIFIED_KEY_SEPARATOR: char = '.';

pub static IDENTIFIER_FIELD: &str = "EventGuid";
pub static CONTENT_FIELD: &str = "EventContent";
pub static OPTION_FIELD_PREFIX: &str = "Option_";
pub static OPTION_CONTENT_FIELD: &str = "OptionContent";
