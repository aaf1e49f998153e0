use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use super::validation::{ValidationError, require};

const CPF_MASK: &str = "000.000.000-00";
const CNPJ_MASK: &str = "00.000.000/0000-00";
const PHONE_MASK: &str = "(00) 00000-0000";

static NON_DIGIT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\D").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    pub id: i64,
    pub name: String,
    /// CPF or CNPJ, whichever the client has.
    #[serde(default)]
    pub cnpj: Option<String>,
    #[serde(default)]
    pub segment: Option<String>,
    #[serde(default)]
    pub contact_email: Option<String>,
    #[serde(default)]
    pub contact_phone: Option<String>,
    #[serde(default)]
    pub owner_name: Option<String>,
}

impl Client {
    /// Case-insensitive match on name, contact e-mail or owner.
    pub fn matches(&self, term: &str) -> bool {
        let term = term.to_lowercase();
        [Some(&self.name), self.contact_email.as_ref(), self.owner_name.as_ref()]
            .into_iter()
            .flatten()
            .any(|s| s.to_lowercase().contains(&term))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientRef {
    pub id: i64,
    #[serde(default)]
    pub name: String,
}

/// Create/edit form for a client. The owner goes out as `owner_name`
/// while the rest of the contact fields keep their camelCase names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ClientDraft {
    pub name: String,
    pub cnpj: String,
    pub segment: String,
    #[serde(rename = "contactEmail")]
    pub contact_email: String,
    #[serde(rename = "contactPhone")]
    pub contact_phone: String,
    pub owner_name: String,
}

impl ClientDraft {
    pub fn from_client(client: &Client) -> Self {
        Self {
            name: client.name.clone(),
            cnpj: client.cnpj.clone().unwrap_or_default(),
            segment: client.segment.clone().unwrap_or_default(),
            contact_email: client.contact_email.clone().unwrap_or_default(),
            contact_phone: client.contact_phone.clone().unwrap_or_default(),
            owner_name: client.owner_name.clone().unwrap_or_default(),
        }
    }

    pub fn set_document(&mut self, input: &str) {
        self.cnpj = mask_document(input);
    }

    pub fn set_phone(&mut self, input: &str) {
        self.contact_phone = mask_phone(input);
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        require(&self.name, "name")
    }
}

fn apply_mask(mask: &str, digits: &str) -> String {
    let mut out = String::with_capacity(mask.len());
    let mut digits = digits.chars().peekable();
    for slot in mask.chars() {
        if digits.peek().is_none() {
            break;
        }
        if slot == '0' {
            if let Some(d) = digits.next() {
                out.push(d);
            }
        } else {
            out.push(slot);
        }
    }
    out
}

pub fn digits_only(input: &str) -> String {
    NON_DIGIT.replace_all(input, "").into_owned()
}

/// CPF layout up to 11 digits, CNPJ beyond that.
pub fn mask_document(input: &str) -> String {
    let digits = digits_only(input);
    let mask = if digits.len() > 11 { CNPJ_MASK } else { CPF_MASK };
    apply_mask(mask, &digits)
}

pub fn mask_phone(input: &str) -> String {
    apply_mask(PHONE_MASK, &digits_only(input))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_mask_switches_at_twelve_digits() {
        assert_eq!(mask_document("12345678901"), "123.456.789-01");
        assert_eq!(mask_document("12.345.678/0001-95"), "12.345.678/0001-95");
        assert_eq!(mask_document("12345678000195"), "12.345.678/0001-95");
        assert_eq!(mask_document("1234"), "123.4");
        assert_eq!(mask_document(""), "");
    }

    #[test]
    fn phone_mask() {
        assert_eq!(mask_phone("11987654321"), "(11) 98765-4321");
        assert_eq!(mask_phone("119876543210000"), "(11) 98765-4321");
    }

    #[test]
    fn client_json_uses_camel_case() {
        let c: Client = serde_json::from_str(
            r#"{"id":1,"name":"ACME","contactEmail":"ti@acme.com","ownerName":"Rita"}"#,
        )
        .unwrap();
        assert!(c.matches("RITA"));
        assert!(c.matches("ti@"));
        assert!(!c.matches("zeta"));
    }

    #[test]
    fn draft_payload_names() {
        let draft = ClientDraft {
            name: "ACME".into(),
            owner_name: "Rita".into(),
            ..ClientDraft::default()
        };
        let json = serde_json::to_value(&draft).unwrap();
        assert_eq!(json["owner_name"], "Rita");
        assert!(json.get("contactEmail").is_some());
        assert_eq!(ClientDraft::default().validate(), Err(ValidationError::Missing("name")));
    }
}
