use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::client::ClientRef;
use super::dates;
use super::status::{CallStatus, Priority};
use super::user::UserRef;
use super::validation::{ValidationError, require};

/// Calls are always fetched six to a page.
pub const CALLS_PER_PAGE: u32 = 6;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Call {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: CallStatus,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub client: Option<ClientRef>,
    #[serde(default)]
    pub assigned_to: Option<UserRef>,
    #[serde(default)]
    pub opened_by: Option<UserRef>,
    #[serde(default, with = "dates::opt_datetime")]
    pub created_at: Option<NaiveDateTime>,
}

impl Call {
    pub fn is_opened_by(&self, user_id: i64) -> bool {
        self.opened_by.as_ref().is_some_and(|u| u.id == user_id)
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CallPage {
    #[serde(default)]
    pub items: Vec<Call>,
    #[serde(default = "first_page")]
    pub page: u32,
    #[serde(default = "first_page")]
    pub pages: u32,
}

fn first_page() -> u32 {
    1
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallOrder {
    PriorityDesc,
    CreatedDesc,
    ClientAsc,
}

impl CallOrder {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PriorityDesc => "priority_desc",
            Self::CreatedDesc => "created_desc",
            Self::ClientAsc => "client_asc",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "priority_desc" => Some(Self::PriorityDesc),
            "created_desc" => Some(Self::CreatedDesc),
            "client_asc" => Some(Self::ClientAsc),
            _ => None,
        }
    }
}

/// Filters of the paginated call list. Empty filters are not sent.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallQuery {
    pub page: u32,
    pub status: Option<CallStatus>,
    pub search: String,
    pub priority: Option<Priority>,
    pub order: Option<CallOrder>,
}

impl Default for CallQuery {
    fn default() -> Self {
        Self {
            page: 1,
            status: None,
            search: String::new(),
            priority: None,
            order: None,
        }
    }
}

impl CallQuery {
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("per_page", CALLS_PER_PAGE.to_string()),
        ];
        if let Some(status) = &self.status {
            pairs.push(("status", status.to_string()));
        }
        if !self.search.is_empty() {
            pairs.push(("search", self.search.clone()));
        }
        if let Some(priority) = &self.priority {
            pairs.push(("priority", priority.to_string()));
        }
        if let Some(order) = self.order {
            pairs.push(("order", order.as_str().to_string()));
        }
        pairs
    }
}

/// Create/edit form of the call list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallDraft {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub client_id: Option<i64>,
    pub assigned_to_user_id: Option<i64>,
    pub status: CallStatus,
}

impl Default for CallDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            priority: Priority::Media,
            client_id: None,
            assigned_to_user_id: None,
            status: CallStatus::Aberto,
        }
    }
}

impl CallDraft {
    pub fn from_call(call: &Call) -> Self {
        Self {
            title: call.title.clone(),
            description: call.description.clone().unwrap_or_default(),
            priority: call.priority.clone().unwrap_or(Priority::Media),
            client_id: call.client.as_ref().map(|c| c.id),
            assigned_to_user_id: call.assigned_to.as_ref().map(|u| u.id),
            status: call.status.clone(),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.title, "title")?;
        if self.assigned_to_user_id.is_none() {
            return Err(ValidationError::Missing("assigned_to_user_id"));
        }
        Ok(())
    }
}

/// In-place edit on the call details screen. The client is not editable there.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CallEdit {
    pub title: String,
    pub description: String,
    pub status: CallStatus,
    pub priority: Priority,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to_user_id: Option<i64>,
}

impl CallEdit {
    pub fn from_call(call: &Call) -> Self {
        Self {
            title: call.title.clone(),
            description: call.description.clone().unwrap_or_default(),
            status: call.status.clone(),
            priority: call.priority.clone().unwrap_or(Priority::Media),
            assigned_to_user_id: call.assigned_to.as_ref().map(|u| u.id),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FollowUpKind {
    #[default]
    Comentario,
    Solucao,
}

impl FollowUpKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Comentario => "comentario",
            Self::Solucao => "solucao",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub file_name: String,
    pub file_url: String,
}

impl Attachment {
    pub fn url(&self, api_base: &str) -> String {
        format!("{}/calls/uploads/{}", api_base.trim_end_matches('/'), self.file_url)
    }

    pub fn is_image(&self) -> bool {
        is_image_file(&self.file_name)
    }
}

pub fn is_image_file(file_name: &str) -> bool {
    file_name
        .rsplit_once('.')
        .map(|(_, ext)| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FollowUp {
    pub id: i64,
    #[serde(default)]
    pub call_id: Option<i64>,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type", default)]
    pub kind: FollowUpKind,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default, with = "dates::opt_datetime")]
    pub created_at: Option<NaiveDateTime>,
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

/// A file picked for upload with a new follow-up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FollowUpDraft {
    pub description: String,
    pub kind: FollowUpKind,
    pub file: Option<Upload>,
}

impl FollowUpDraft {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.description, "description")
    }
}

/// JSON body of a follow-up edit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FollowUpEdit {
    pub description: String,
    #[serde(rename = "type")]
    pub kind: FollowUpKind,
}

impl FollowUpEdit {
    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.description, "description")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_sends_only_set_filters() {
        let q = CallQuery {
            page: 2,
            search: "vpn".into(),
            order: Some(CallOrder::ClientAsc),
            ..CallQuery::default()
        };
        assert_eq!(
            q.to_pairs(),
            vec![
                ("page", "2".to_string()),
                ("per_page", "6".to_string()),
                ("search", "vpn".to_string()),
                ("order", "client_asc".to_string()),
            ]
        );
    }

    #[test]
    fn draft_requires_title_and_assignee() {
        let mut d = CallDraft {
            title: "Impressora".into(),
            ..CallDraft::default()
        };
        assert_eq!(d.validate(), Err(ValidationError::Missing("assigned_to_user_id")));
        d.assigned_to_user_id = Some(3);
        assert!(d.validate().is_ok());
        let json = serde_json::to_value(&d).unwrap();
        assert_eq!(json["priority"], "Média");
        assert_eq!(json["status"], "Aberto");
    }

    #[test]
    fn blank_follow_up_rejected() {
        let draft = FollowUpDraft {
            description: "   ".into(),
            ..FollowUpDraft::default()
        };
        assert_eq!(draft.validate(), Err(ValidationError::Missing("description")));
    }

    #[test]
    fn attachments() {
        let att = Attachment {
            id: None,
            file_name: "Print.PNG".into(),
            file_url: "abc123.png".into(),
        };
        assert!(att.is_image());
        assert_eq!(att.url("http://h/api/"), "http://h/api/calls/uploads/abc123.png");
        assert!(!is_image_file("relatorio.pdf"));
        assert!(!is_image_file("noext"));
    }

    #[test]
    fn follow_up_json() {
        let fu: FollowUp = serde_json::from_str(
            r#"{"id":1,"description":"ok","type":"solucao","user":{"id":2,"name":"Ana"},
                "created_at":"Wed, 10 Jan 2024 09:00:00 GMT",
                "attachments":[{"file_name":"a.jpg","file_url":"x.jpg"}]}"#,
        )
        .unwrap();
        assert_eq!(fu.kind, FollowUpKind::Solucao);
        assert!(fu.created_at.is_some());
        assert_eq!(fu.attachments.len(), 1);
    }

    #[test]
    fn call_page_defaults() {
        let page: CallPage = serde_json::from_str(r#"{"items":[]}"#).unwrap();
        assert_eq!((page.page, page.pages), (1, 1));
    }
}
