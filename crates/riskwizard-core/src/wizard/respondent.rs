use serde::{Deserialize, Serialize};
use url::Url;

/// Who is filling in the assessment, as carried by the invitation link.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Respondent {
    pub email: String,
    pub client_id: String,
}

impl Respondent {
    pub fn new(email: impl Into<String>, client_id: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            client_id: client_id.into(),
        }
    }

    /// Read `email` and `ClientID` from a query string (leading `?` optional).
    /// Missing parameters become empty strings; the first occurrence wins.
    pub fn from_query(query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut email = None;
        let mut client_id = None;
        for (key, value) in url::form_urlencoded::parse(query.as_bytes()) {
            match key.as_ref() {
                "email" if email.is_none() => email = Some(value.into_owned()),
                "ClientID" if client_id.is_none() => client_id = Some(value.into_owned()),
                _ => {}
            }
        }
        Self {
            email: email.unwrap_or_default(),
            client_id: client_id.unwrap_or_default(),
        }
    }

    pub fn from_url(url: &Url) -> Self {
        Self::from_query(url.query().unwrap_or_default())
    }

    /// Email for display, with a placeholder when the link carried none.
    pub fn display_email(&self) -> &str {
        if self.email.is_empty() {
            "No email provided"
        } else {
            &self.email
        }
    }
}
