//! Fixed lexical tables used by the expander, the analyzer and the ranker.
//!
//! Every table is an ordered slice: scan order is part of the contract. The
//! first synonym found wins, and the first known category found is the
//! detected one.

/// Leave categories the analyzer and ranker know about, in detection order.
///
/// Kept apart from whatever categories the index actually holds, which are
/// free-form strings.
pub const KNOWN_CATEGORIES: &[&str] = &[
    "病假",
    "事假",
    "喪假",
    "產假",
    "生理假",
    "器官捐贈假",
    "心理調適假",
    "學期考試假",
    "公假",
    "歲時祭儀假",
    "多元文化假",
];

/// Colloquial term -> canonical category, in scan order
pub const SYNONYMS: &[(&str, &str)] = &[
    ("生病", "病假"),
    ("身體不舒服", "病假"),
    ("感冒", "病假"),
    ("看醫生", "病假"),
    ("有事", "事假"),
    ("私事", "事假"),
    ("家裡有事", "事假"),
    ("親人過世", "喪假"),
    ("家人去世", "喪假"),
    ("葬禮", "喪假"),
    ("生理期", "生理假"),
    ("月經", "生理假"),
    ("經期", "生理假"),
    ("心理", "心理調適假"),
    ("壓力", "心理調適假"),
    ("情緒", "心理調適假"),
    ("期末考", "學期考試假"),
    ("考試", "學期考試假"),
    ("期中考", "學期考試假"),
    ("代表學校", "公假"),
    ("校隊", "公假"),
    ("比賽", "公假"),
    ("活動", "公假"),
    ("懷孕", "產假"),
    ("生小孩", "產假"),
    ("陪產", "產假"),
];

/// Query asks whether a certificate or receipt is required
pub const PROOF_KEYWORDS: &[&str] = &[
    "證明", "診斷書", "收據", "證明文件", "附證明", "要附", "需要附",
];

/// Query asks about day counts or limits
pub const QUANTITY_KEYWORDS: &[&str] = &["幾天", "多久", "多少天", "天數", "上限", "限制"];

/// Query asks how or where to apply
pub const PROCESS_KEYWORDS: &[&str] = &["怎麼請", "如何申請", "怎麼辦", "流程", "步驟", "要找誰"];

/// Query is looking for a form option rather than a rule
pub const UI_HELP_KEYWORDS: &[&str] = &[
    "找不到", "沒有", "看不到", "沒看到", "哪裡", "選項", "在哪",
];

/// Content mentions a proof document
pub const PROOF_LITERALS: &[&str] = &["證明"];

/// Content mentions a day count or limit
pub const QUANTITY_LITERALS: &[&str] = &["天", "上限", "限"];

/// Content describes an application step
pub const PROCESS_LITERALS: &[&str] = &["申請", "核准", "報備"];

/// True if `text` contains any of `terms` as a substring
pub fn contains_any(text: &str, terms: &[&str]) -> bool {
    terms.iter().any(|term| text.contains(term))
}

/// First known category literal contained in `text`, in table order
pub fn find_known_category(text: &str) -> Option<&'static str> {
    KNOWN_CATEGORIES
        .iter()
        .copied()
        .find(|category| text.contains(category))
}
