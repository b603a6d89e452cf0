//! Keyword-matched safety FAQ
//!
//! Matching is case-insensitive on both sides: the query and every keyword
//! are lowercased, so acronym keywords such as `ISO`, `PPE`, `ABE` and `CPR`
//! match however they are typed.

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use portal_types::{Error, Result};

const BUILTIN_FAQ: &str = include_str!("../../assets/faq.toml");

static BUILTIN_BOOK: LazyLock<FaqBook> =
    LazyLock::new(|| FaqBook::from_toml(BUILTIN_FAQ).expect("embedded FAQ table is valid"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FaqEntry {
    pub keywords: Vec<String>,
    pub question: String,
    pub answer: String,
}

impl FaqEntry {
    fn matches(&self, query: &str) -> bool {
        self.keywords
            .iter()
            .any(|keyword| query.contains(&keyword.to_lowercase()))
    }
}

/// Ordered FAQ table with a fallback answer
#[derive(Debug, Clone, Deserialize)]
pub struct FaqBook {
    #[serde(default)]
    pub suggested: Vec<String>,
    pub fallback: String,
    pub entries: Vec<FaqEntry>,
}

impl FaqBook {
    pub fn from_toml(source: &str) -> Result<Self> {
        toml::from_str(source).map_err(|e| Error::validation(format!("invalid FAQ table: {e}")))
    }

    /// The table shipped with the portal
    pub fn builtin() -> &'static FaqBook {
        &BUILTIN_BOOK
    }

    /// First entry (in table order) with a keyword contained in `query`
    pub fn lookup(&self, query: &str) -> Option<&FaqEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return None;
        }
        self.entries.iter().find(|entry| entry.matches(&query))
    }

    /// Answer for `query`, or the fallback listing the known topics
    pub fn find_answer(&self, query: &str) -> &str {
        self.lookup(query)
            .map(|entry| entry.answer.as_str())
            .unwrap_or(self.fallback.as_str())
    }

    pub fn suggested_questions(&self) -> &[String] {
        &self.suggested
    }
}

/// Answer from the built-in table
pub fn find_answer(query: &str) -> &'static str {
    FaqBook::builtin().find_answer(query)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_loads() {
        let book = FaqBook::builtin();
        assert_eq!(book.entries.len(), 23);
        assert_eq!(book.suggested_questions().len(), 4);
        assert!(book.fallback.starts_with("죄송합니다"));
    }

    #[test]
    fn test_first_matching_entry_wins() {
        let book = FaqBook::builtin();
        // "안전모" appears in the helmet entry; "관리" only later in the PPE entry
        let entry = book.lookup("안전모 관리 방법").unwrap();
        assert_eq!(entry.question, "안전모 착용 및 관리");

        // "절연안전모" contains "안전모", which is listed first
        let entry = book.lookup("절연안전모").unwrap();
        assert_eq!(entry.question, "안전모 착용 및 관리");
    }

    #[test]
    fn test_uppercase_keywords_match() {
        let book = FaqBook::builtin();
        assert_eq!(book.lookup("iso 인증 절차").unwrap().question, "ISO 45001 안전보건경영시스템");
        assert_eq!(book.lookup("CPR 방법").unwrap().question, "응급처치 기본 수칙");
    }

    #[test]
    fn test_fallback() {
        let book = FaqBook::builtin();
        assert_eq!(book.find_answer("점심 메뉴"), book.fallback);
        assert_eq!(book.find_answer("   "), book.fallback);
        assert!(find_answer("작업중지권이 뭐죠?").contains("작업중지권"));
    }

    #[test]
    fn test_custom_table() {
        let book = FaqBook::from_toml(
            r#"
fallback = "모름"
[[entries]]
keywords = ["A"]
question = "q"
answer = "a"
"#,
        )
        .unwrap();
        assert_eq!(book.find_answer("a"), "a");
        assert_eq!(book.find_answer("b"), "모름");
        assert!(FaqBook::from_toml("entries = 3").is_err());
    }
}
