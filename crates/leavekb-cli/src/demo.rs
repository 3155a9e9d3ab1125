//! Sample questions exercising colloquial phrasing, synonyms and UI-help intent

pub const DEMO_QUERIES: &[&str] = &[
    "病假需要證明嗎",
    "生理假每月可以請幾天",
    "請假超過時限怎麼辦",
    "生病要附診斷書嗎",
    "生理期可以請假嗎",
    "感冒請假要證明嗎",
    "心理壓力可以請假嗎",
    "家裡有事怎麼請假",
    "找不到公假選項",
];
