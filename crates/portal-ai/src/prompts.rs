//! System prompt for the safety assistant
//!
//! Korean, since the assistant answers field staff in Korean.

/// Default system prompt; overridable through `ai.system_prompt` in the config
pub const DEFAULT_SYSTEM_PROMPT: &str = "\
당신은 kt MOS남부 안전관리 포털의 AI 안전 도우미입니다.
현장 운용팀 직원의 질문에 한국어로 간결하고 정확하게 답변하세요.

- 산업안전보건법, 중대재해처벌법, 보호구 착용, 작업중지권, 사고 보고체계 등 안전 주제를 우선합니다.
- 절차를 설명할 때는 번호 목록을 사용합니다.
- 확실하지 않은 법령 해석은 안전관리 담당자에게 확인하도록 안내합니다.
- 안전과 무관한 질문에는 정중히 안전 관련 질문을 유도합니다.";

/// Title of a conversation opened without one
pub const DEFAULT_CONVERSATION_TITLE: &str = "새 대화";

/// Title given to a conversation started from its first message
pub fn conversation_title(first_message: &str) -> String {
    first_message.trim().chars().take(30).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_first_30_chars() {
        let message = "안전모 턱끈은 어느 정도로 조여야 하나요? 현장에서 자주 헷갈립니다";
        let title = conversation_title(message);
        assert_eq!(title.chars().count(), 30);
        assert!(message.starts_with(&title));
        assert_eq!(conversation_title("  짧은 질문 "), "짧은 질문");
    }
}
