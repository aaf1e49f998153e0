//! Client access records and the cards derived from them.
//!
//! The API only knows flat rows (`card_name`, `field_name`, `field_value`).
//! Rows sharing a card name form a [`Card`]; renaming, deleting or
//! reordering a card is a bulk operation the server applies to every row
//! with that name.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use super::validation::{ValidationError, require};

/// Name given to rows that carry no card name.
pub const UNTITLED_CARD: &str = "Sem Título";

/// Value of an access field. Strings holding JSON arrays or objects are
/// unpacked; anything that fails to parse stays plain text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
    Map(Vec<(String, String)>),
}

impl Default for FieldValue {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

fn scalar_text(v: &Value) -> String {
    match v {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

impl FieldValue {
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(raw) => match serde_json::from_str::<Value>(&raw) {
                Ok(parsed @ (Value::Array(_) | Value::Object(_))) => Self::from_json(parsed),
                Ok(Value::String(inner)) => Self::Text(inner),
                _ => Self::Text(raw),
            },
            Value::Array(items) => Self::List(items.iter().map(scalar_text).collect()),
            Value::Object(map) => Self::Map(map.iter().map(|(k, v)| (k.clone(), scalar_text(v))).collect()),
            other => Self::Text(scalar_text(&other)),
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::Text(s) => Value::String(s.clone()),
            Self::List(items) => Value::Array(items.iter().cloned().map(Value::String).collect()),
            Self::Map(pairs) => Value::Object(
                pairs
                    .iter()
                    .map(|(k, v)| (k.clone(), Value::String(v.clone())))
                    .collect(),
            ),
        }
    }

    /// One display line per value; map entries render as `key: value`.
    pub fn lines(&self) -> Vec<String> {
        match self {
            Self::Text(s) => vec![s.clone()],
            Self::List(items) => items.clone(),
            Self::Map(pairs) => pairs.iter().map(|(k, v)| format!("{k}: {v}")).collect(),
        }
    }

    /// Values to prefill the multi-value editor with.
    pub fn edit_values(&self) -> Vec<String> {
        match self {
            Self::List(items) if !items.is_empty() => items.clone(),
            Self::Text(s) => vec![s.clone()],
            _ => vec![String::new()],
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(s)
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        Value::deserialize(d).map(Self::from_json)
    }
}

/// Split a display line at its first `:` into a label and a value.
pub fn split_label(line: &str) -> (Option<&str>, &str) {
    match line.split_once(':') {
        Some((label, value)) => (Some(label.trim()), value.trim()),
        None => (None, line),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessField {
    pub id: i64,
    #[serde(default)]
    pub client_id: Option<i64>,
    #[serde(default)]
    pub card_name: Option<String>,
    #[serde(default)]
    pub card_order: Option<i64>,
    #[serde(default)]
    pub field_name: String,
    #[serde(default)]
    pub field_value: FieldValue,
}

impl AccessField {
    pub fn card(&self) -> &str {
        match self.card_name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => UNTITLED_CARD,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub name: String,
    pub order: i64,
    pub fields: Vec<AccessField>,
}

/// Group rows into cards. A card takes its order from its first row and
/// cards with equal order keep first-seen order.
pub fn build_cards(fields: &[AccessField]) -> Vec<Card> {
    let mut cards: Vec<Card> = Vec::new();
    for field in fields {
        match cards.iter_mut().find(|c| c.name == field.card()) {
            Some(card) => card.fields.push(field.clone()),
            None => cards.push(Card {
                name: field.card().to_string(),
                order: field.card_order.unwrap_or(0),
                fields: vec![field.clone()],
            }),
        }
    }
    cards.sort_by_key(|c| c.order);
    cards
}

/// Cards whose name contains `term`, ignoring case.
pub fn filter_cards<'a>(cards: &'a [Card], term: &str) -> Vec<&'a Card> {
    let term = term.to_lowercase();
    cards
        .iter()
        .filter(|c| c.name.to_lowercase().contains(&term))
        .collect()
}

/// Move the visible card at `from` to `to` and merge the result back into
/// the full list.
///
/// `visible` is the currently shown (filtered, paginated) subset by name.
/// Visible cards come first in their new order; the rest keep their prior
/// relative order after them. The merged list is renumbered from zero.
/// Returns `None` when nothing moves.
pub fn reorder_cards(cards: &[Card], visible: &[&str], from: usize, to: usize) -> Option<Vec<Card>> {
    if from == to || from >= visible.len() || to >= visible.len() {
        return None;
    }
    let mut moved: Vec<&str> = visible.to_vec();
    let card = moved.remove(from);
    moved.insert(to, card);

    let mut merged: Vec<Card> = cards.to_vec();
    merged.sort_by_key(|c| {
        moved
            .iter()
            .position(|name| *name == c.name)
            .unwrap_or(usize::MAX)
    });
    for (i, card) in merged.iter_mut().enumerate() {
        card.order = i as i64;
    }
    Some(merged)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReorderCards {
    pub order: Vec<String>,
}

impl ReorderCards {
    pub fn from_cards(cards: &[Card]) -> Self {
        Self {
            order: cards.iter().map(|c| c.name.clone()).collect(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenameCard {
    pub old_card_name: String,
    pub new_card_name: String,
}

impl RenameCard {
    pub fn new(old: &str, new: &str) -> Result<Self, ValidationError> {
        require(old, "old_card_name")?;
        require(new, "new_card_name")?;
        Ok(Self {
            old_card_name: old.to_string(),
            new_card_name: new.to_string(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteCard {
    pub card_name: String,
}

/// Body of `POST /clients/{id}/accesses` and the matching PATCH.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccessPayload {
    pub card_name: String,
    pub field_name: String,
    pub field_value: FieldValue,
}

impl AccessPayload {
    /// New card with its first, single-valued field.
    pub fn new_card(card_name: &str, field_name: &str, value: &str) -> Result<Self, ValidationError> {
        require(card_name, "card_name")?;
        require(field_name, "field_name")?;
        Ok(Self {
            card_name: card_name.to_string(),
            field_name: field_name.to_string(),
            field_value: FieldValue::Text(value.to_string()),
        })
    }

    /// Field edited in the multi-value editor; always sent as a list.
    pub fn multi(card_name: &str, field_name: &str, values: Vec<String>) -> Self {
        Self {
            card_name: card_name.to_string(),
            field_name: field_name.to_string(),
            field_value: FieldValue::List(values),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(id: i64, card: Option<&str>, order: Option<i64>) -> AccessField {
        AccessField {
            id,
            client_id: Some(1),
            card_name: card.map(str::to_string),
            card_order: order,
            field_name: format!("f{id}"),
            field_value: FieldValue::default(),
        }
    }

    fn card(name: &str, order: i64) -> Card {
        Card {
            name: name.to_string(),
            order,
            fields: Vec::new(),
        }
    }

    fn names(cards: &[Card]) -> Vec<&str> {
        cards.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn field_value_inference() {
        let v: FieldValue = serde_json::from_str(r#""[\"a\",\"b\"]""#).unwrap();
        assert_eq!(v, FieldValue::List(vec!["a".into(), "b".into()]));
        let v: FieldValue = serde_json::from_str(r#""{\"user\":\"root\"}""#).unwrap();
        assert_eq!(v.lines(), vec!["user: root".to_string()]);
        let v: FieldValue = serde_json::from_str(r#""senha: 123""#).unwrap();
        assert_eq!(v, FieldValue::Text("senha: 123".into()));
        let v: FieldValue = serde_json::from_str(r#"["x"]"#).unwrap();
        assert_eq!(v, FieldValue::List(vec!["x".into()]));
        let v: FieldValue = serde_json::from_str("null").unwrap();
        assert_eq!(v, FieldValue::Text(String::new()));
    }

    #[test]
    fn edit_prefill() {
        assert_eq!(FieldValue::Text("a".into()).edit_values(), vec!["a"]);
        assert_eq!(FieldValue::Map(vec![]).edit_values(), vec![""]);
        assert_eq!(FieldValue::List(vec![]).edit_values(), vec![""]);
    }

    #[test]
    fn label_split_at_first_colon() {
        assert_eq!(split_label("url: http://x:8080"), (Some("url"), "http://x:8080"));
        assert_eq!(split_label("plain"), (None, "plain"));
    }

    #[test]
    fn grouping_uses_first_row_order_and_untitled() {
        let rows = vec![
            row(1, Some("VPN"), Some(2)),
            row(2, None, None),
            row(3, Some("VPN"), Some(0)),
            row(4, Some("ERP"), Some(1)),
        ];
        let cards = build_cards(&rows);
        assert_eq!(names(&cards), vec![UNTITLED_CARD, "ERP", "VPN"]);
        assert_eq!(cards[2].fields.len(), 2);
        assert_eq!(cards[2].order, 2);
    }

    #[test]
    fn search_is_case_insensitive() {
        let cards = vec![card("Servidor VPN", 0), card("ERP", 1)];
        let found = filter_cards(&cards, "vpn");
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].name, "Servidor VPN");
    }

    #[test]
    fn reorder_keeps_hidden_cards_in_relative_order_after_visible() {
        let cards = vec![card("A", 0), card("B", 1), card("C", 2), card("D", 3), card("E", 4)];
        // only B and D are visible, D dragged above B
        let merged = reorder_cards(&cards, &["B", "D"], 1, 0).unwrap();
        assert_eq!(names(&merged), vec!["D", "B", "A", "C", "E"]);
        let orders: Vec<i64> = merged.iter().map(|c| c.order).collect();
        assert_eq!(orders, vec![0, 1, 2, 3, 4]);
        assert_eq!(
            ReorderCards::from_cards(&merged).order,
            vec!["D", "B", "A", "C", "E"]
        );
    }

    #[test]
    fn reorder_noop_cases() {
        let cards = vec![card("A", 0), card("B", 1)];
        assert!(reorder_cards(&cards, &["A", "B"], 1, 1).is_none());
        assert!(reorder_cards(&cards, &["A", "B"], 2, 0).is_none());
        assert!(reorder_cards(&cards, &["A", "B"], 0, 5).is_none());
    }

    #[test]
    fn card_payload_rules() {
        assert_eq!(
            AccessPayload::new_card("VPN", "", "x"),
            Err(ValidationError::Missing("field_name"))
        );
        assert!(RenameCard::new("VPN", " ").is_err());
        let multi = AccessPayload::multi("VPN", "hosts", vec!["a".into(), "b".into()]);
        let json = serde_json::to_value(multi).unwrap();
        assert_eq!(json["field_value"], serde_json::json!(["a", "b"]));
    }
}
