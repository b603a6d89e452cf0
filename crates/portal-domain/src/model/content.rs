//! JSON sub-schemas carried in `Notice::content`
//!
//! Boards other than the plain text ones store a small JSON document in the
//! notice body. Reading one never fails: a body that is not the expected JSON
//! becomes a document whose `text` is the raw body.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};

/// Shared behaviour of notice content documents
pub trait NoticeContent: Serialize + DeserializeOwned {
    /// Document holding only free text
    fn from_text(text: &str) -> Self;

    /// Parse a notice body, falling back to `from_text` on malformed JSON
    fn parse(content: &str) -> Self {
        serde_json::from_str(content).unwrap_or_else(|_| Self::from_text(content))
    }

    /// Encode into a notice body
    fn to_content(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }
}

/// Text with an optional spreadsheet attachment (`equipment`, `equip_status` reports)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentContent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub team: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excel_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excel_name: Option<String>,
}

impl AttachmentContent {
    pub fn has_attachment(&self) -> bool {
        self.excel_url.as_deref().is_some_and(|u| !u.is_empty())
    }
}

impl NoticeContent for AttachmentContent {
    fn from_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }
}

/// Review state of an equipment request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
}

impl RequestStatus {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "pending" | "대기중" | "대기" => Some(RequestStatus::Pending),
            "approved" | "승인" => Some(RequestStatus::Approved),
            "rejected" | "반려" => Some(RequestStatus::Rejected),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "pending",
            RequestStatus::Approved => "approved",
            RequestStatus::Rejected => "rejected",
        }
    }

    /// Badge text shown on the request board
    pub fn label(&self) -> &'static str {
        match self {
            RequestStatus::Pending => "대기중",
            RequestStatus::Approved => "승인",
            RequestStatus::Rejected => "반려",
        }
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for RequestStatus {
    type Err = portal_types::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        RequestStatus::parse(s)
            .ok_or_else(|| portal_types::Error::validation(format!("unknown request status: {s}")))
    }
}

// Unknown or missing statuses read as pending
impl<'de> Deserialize<'de> for RequestStatus {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.and_then(|s| RequestStatus::parse(&s)).unwrap_or_default())
    }
}

/// Equipment request filed by a team (`equip_request`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestContent {
    #[serde(default)]
    pub team: String,
    #[serde(default)]
    pub requester: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub status: RequestStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excel_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub excel_name: Option<String>,
}

impl NoticeContent for RequestContent {
    fn from_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Default::default()
        }
    }
}

/// Digital board slide (`digital_board`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SlideContent {
    #[serde(default)]
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl NoticeContent for SlideContent {
    fn from_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            image_url: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attachment_parse() {
        let content = AttachmentContent::parse(
            r#"{"team":"동대구운용팀","text":"3월 점검","excelUrl":"/uploads/a.xlsx","excelName":"점검표.xlsx"}"#,
        );
        assert_eq!(content.team.as_deref(), Some("동대구운용팀"));
        assert!(content.has_attachment());
        assert_eq!(content.excel_name.as_deref(), Some("점검표.xlsx"));
    }

    #[test]
    fn test_plain_text_falls_back() {
        let content = AttachmentContent::parse("그냥 텍스트");
        assert_eq!(content.text, "그냥 텍스트");
        assert!(!content.has_attachment());

        let slide = SlideContent::parse("{broken");
        assert_eq!(slide.text, "{broken");
        assert!(slide.image_url.is_none());
    }

    #[test]
    fn test_request_status_lenient() {
        let request = RequestContent::parse(r#"{"team":"포항운용팀","requester":"김","text":"안전화 5","status":"승인"}"#);
        assert_eq!(request.status, RequestStatus::Approved);

        let request = RequestContent::parse(r#"{"team":"포항운용팀","text":"x","status":"보류"}"#);
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.requester, "");
    }

    #[test]
    fn test_request_status_serializes_lowercase() {
        let request = RequestContent {
            team: "구미운용팀".to_string(),
            requester: "이".to_string(),
            text: "장갑".to_string(),
            status: RequestStatus::Rejected,
            excel_url: None,
            excel_name: None,
        };
        let json = request.to_content();
        assert!(json.contains("\"status\":\"rejected\""));
        assert!(!json.contains("excelUrl"));
        assert_eq!(RequestStatus::Rejected.label(), "반려");
        assert!("unknown".parse::<RequestStatus>().is_err());
    }
}
