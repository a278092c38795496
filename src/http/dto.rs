//! Request and response bodies.
//!
//! Request fields are optional at the serde level so that a missing field
//! is reported in the catalog's own error shape rather than as a
//! deserializer rejection.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::record::{NewRecord, Record};
use crate::types::{Gender, RecordId};

/// Body of `POST /cats/search`.
#[derive(Debug, Default, Deserialize)]
pub struct SearchRequest {
    pub name: Option<String>,
    #[serde(default)]
    pub genders: Vec<Gender>,
}

/// Query of `GET /cats/search-pattern`.
#[derive(Debug, Default, Deserialize)]
pub struct PrefixQuery {
    pub name: Option<String>,
    pub limit: Option<String>,
}

impl PrefixQuery {
    /// Parses the optional limit.
    pub fn limit(&self) -> Result<Option<usize>, ValidationError> {
        match self.limit.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(raw) => raw
                .parse()
                .map(Some)
                .map_err(|_| ValidationError::invalid_field("limit", format!("{raw:?} is not a number"))),
        }
    }
}

/// Body of `POST /cats/add`.
#[derive(Debug, Default, Deserialize)]
pub struct AddRequest {
    pub cats: Option<Vec<NewRecord>>,
}

/// Body of `POST /cats/save-description`.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SaveDescriptionRequest {
    pub cat_id: Option<RecordId>,
    pub cat_description: Option<String>,
}

/// Query carrying a record id.
#[derive(Debug, Default, Deserialize)]
pub struct IdQuery {
    pub id: Option<String>,
}

/// Query of `GET /cats/all`.
#[derive(Debug, Default, Deserialize)]
pub struct AllQuery {
    pub order: Option<String>,
    pub gender: Option<String>,
}

/// Query of `GET /cats/validation`.
#[derive(Debug, Default, Deserialize)]
pub struct RulesQuery {
    #[serde(rename = "type")]
    pub purpose: Option<String>,
}

/// A single record wrapped as `{cat}`.
#[derive(Debug, Serialize, Deserialize)]
pub struct CatResponse {
    pub cat: Record,
}

/// Returns the value, or `RequiredField` when it is absent or empty.
pub fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ValidationError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ValidationError::required_field(field)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_limit_parsing() {
        let query = |limit: Option<&str>| PrefixQuery {
            name: Some("an".into()),
            limit: limit.map(String::from),
        };
        assert_eq!(query(None).limit().unwrap(), None);
        assert_eq!(query(Some("")).limit().unwrap(), None);
        assert_eq!(query(Some("5")).limit().unwrap(), Some(5));
        assert!(query(Some("five")).limit().is_err());
        assert!(query(Some("-1")).limit().is_err());
    }

    #[test]
    fn test_required() {
        assert_eq!(required(&Some("Tom".into()), "name").unwrap(), "Tom");
        assert!(required(&Some(String::new()), "name").is_err());
        assert!(required(&None, "name").is_err());
    }

    #[test]
    fn test_add_request_shape() {
        let body: AddRequest = serde_json::from_str(
            r#"{"cats":[{"name":"Tom","gender":"male"},{"name":"Murka","description":"fluffy"}]}"#,
        )
        .unwrap();
        let cats = body.cats.unwrap();
        assert_eq!(cats[0].gender, Some(Gender::Male));
        assert_eq!(cats[1].description.as_deref(), Some("fluffy"));
    }

    #[test]
    fn test_save_description_shape() {
        let body: SaveDescriptionRequest =
            serde_json::from_str(r#"{"catId":3,"catDescription":"grey"}"#).unwrap();
        assert_eq!(body.cat_id, Some(RecordId(3)));
        assert_eq!(body.cat_description.as_deref(), Some("grey"));
    }
}
