//! The closed set of registration fields and the snapshot of their values.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the registration form's input fields.
///
/// The string form of each variant (`as_str`) is the field id shared with
/// every collaborator, so it must never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldName {
    Name,
    Furigana,
    Email,
    Password,
    Phone,
    Postcode,
    Prefecture,
    City,
    Address,
    Remarks,
}

impl FieldName {
    /// All fields in form order.
    pub const ALL: [FieldName; 10] = [
        FieldName::Name,
        FieldName::Furigana,
        FieldName::Email,
        FieldName::Password,
        FieldName::Phone,
        FieldName::Postcode,
        FieldName::Prefecture,
        FieldName::City,
        FieldName::Address,
        FieldName::Remarks,
    ];

    /// Field id as used by the value source and error sink.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Furigana => "furigana",
            Self::Email => "email",
            Self::Password => "password",
            Self::Phone => "phone",
            Self::Postcode => "postcode",
            Self::Prefecture => "prefecture",
            Self::City => "city",
            Self::Address => "address",
            Self::Remarks => "remarks",
        }
    }

    /// Label shown next to the value on the confirmation screen.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Name => "会員名",
            Self::Furigana => "フリガナ",
            Self::Email => "メールアドレス",
            Self::Password => "パスワード",
            Self::Phone => "電話番号",
            Self::Postcode => "郵便番号",
            Self::Prefecture => "都道府県",
            Self::City => "市区町村",
            Self::Address => "番地・アパート名",
            Self::Remarks => "備考欄",
        }
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown field id.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown field '{0}'")]
pub struct UnknownField(pub String);

impl FromStr for FieldName {
    type Err = UnknownField;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldName::ALL
            .into_iter()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| UnknownField(s.to_string()))
    }
}

/// Field values captured at submission time.
///
/// Serializes as a JSON object keyed by field id. Fields that were never set
/// read as the empty string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FormSnapshot {
    values: BTreeMap<FieldName, String>,
}

impl FormSnapshot {
    /// Creates an empty snapshot.
    pub fn new() -> Self {
        Self::default()
    }

    /// Captures every field from a lookup function.
    pub fn capture(mut value_of: impl FnMut(FieldName) -> String) -> Self {
        let values = FieldName::ALL
            .into_iter()
            .map(|field| (field, value_of(field)))
            .collect();
        Self { values }
    }

    /// Sets a field value (builder style).
    pub fn with(mut self, field: FieldName, value: impl Into<String>) -> Self {
        self.values.insert(field, value.into());
        self
    }

    /// Returns the value of a field, or `""` if it was never set.
    pub fn get(&self, field: FieldName) -> &str {
        self.values.get(&field).map(String::as_str).unwrap_or("")
    }

    /// Iterates over every field in form order with its value.
    pub fn iter(&self) -> impl Iterator<Item = (FieldName, &str)> {
        FieldName::ALL.into_iter().map(|field| (field, self.get(field)))
    }
}

impl<S: Into<String>> FromIterator<(FieldName, S)> for FormSnapshot {
    fn from_iter<I: IntoIterator<Item = (FieldName, S)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(|(f, v)| (f, v.into())).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_ids_are_exact() {
        let ids: Vec<&str> = FieldName::ALL.iter().map(FieldName::as_str).collect();
        assert_eq!(
            ids,
            [
                "name",
                "furigana",
                "email",
                "password",
                "phone",
                "postcode",
                "prefecture",
                "city",
                "address",
                "remarks"
            ]
        );
    }

    #[test]
    fn parses_known_ids_only() {
        assert_eq!("postcode".parse::<FieldName>(), Ok(FieldName::Postcode));
        assert_eq!(
            "zipcode".parse::<FieldName>(),
            Err(UnknownField("zipcode".to_string()))
        );
    }

    #[test]
    fn snapshot_json_uses_field_ids() {
        let snapshot = FormSnapshot::new()
            .with(FieldName::Name, "田中 太郎")
            .with(FieldName::Remarks, "");
        let json = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(json["name"], "田中 太郎");
        assert_eq!(json["remarks"], "");

        let parsed: FormSnapshot =
            serde_json::from_str(r#"{"email": "user@example.com"}"#).unwrap();
        assert_eq!(parsed.get(FieldName::Email), "user@example.com");
        assert_eq!(parsed.get(FieldName::City), "");
    }
}
