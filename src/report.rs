//! Display model: the ordered field list and the user-facing messages.

use serde::Serialize;
use std::fmt;

use crate::lookup::{LocationRecord, LookupOutcome, ValidationError};
use crate::mock::PersonalMock;

/// Shown for any location field the provider did not supply.
pub const NOT_AVAILABLE: &str = "Not Available";

pub const INVALID_FORMAT_MESSAGE: &str = "Invalid IPv4 format. Example: 192.168.1.1";
pub const RATE_LIMIT_MESSAGE: &str = "Rate limit exceeded. Please try again later.";
pub const UNAVAILABLE_MESSAGE: &str = "Could not retrieve data. Check connection / API.";

/// One labelled row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportField {
    pub label: &'static str,
    pub value: String,
}

/// A successful lookup merged with placeholder identity data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LookupReport {
    pub fields: Vec<ReportField>,
}

impl LookupReport {
    pub fn new(location: &LocationRecord, mock: &PersonalMock) -> Self {
        let loc = |v: &Option<String>| v.clone().unwrap_or_else(|| NOT_AVAILABLE.to_string());

        let rows: [(&'static str, String); 11] = [
            ("First Name", mock.first_name.clone()),
            ("Last Name", mock.last_name.clone()),
            ("Email", mock.email.clone()),
            ("Street", mock.street.clone()),
            ("Postal Code", loc(&location.postal_code)),
            ("City", loc(&location.city)),
            ("State / Region", loc(&location.region)),
            ("Country", loc(&location.country_name)),
            ("ISP / Organization", loc(&location.organization)),
            ("Timezone", loc(&location.timezone)),
            ("Phone", mock.phone.clone()),
        ];

        Self {
            fields: rows.into_iter().map(|(label, value)| ReportField { label, value }).collect(),
        }
    }

    /// Text for "Copy All": one `Label: Value` line per field.
    pub fn copy_all_text(&self) -> String {
        self.fields
            .iter()
            .map(|f| format!("{}: {}", f.label, f.value))
            .collect::<Vec<_>>()
            .join("\n")
            .trim()
            .to_string()
    }
}

impl fmt::Display for LookupReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let width = self.fields.iter().map(|r| r.label.len()).max().unwrap_or(0) + 1;
        for row in &self.fields {
            writeln!(f, "  {:<width$} {}", format!("{}:", row.label), row.value, width = width)?;
        }
        Ok(())
    }
}

/// The three error categories a front end can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    InvalidFormat,
    RateLimited,
    Unavailable,
}

impl FailureKind {
    pub fn message(self) -> &'static str {
        match self {
            Self::InvalidFormat => INVALID_FORMAT_MESSAGE,
            Self::RateLimited => RATE_LIMIT_MESSAGE,
            Self::Unavailable => UNAVAILABLE_MESSAGE,
        }
    }
}

impl From<&ValidationError> for FailureKind {
    fn from(_: &ValidationError) -> Self {
        Self::InvalidFormat
    }
}

/// Turn a finished lookup into either a report or a failure category.
pub fn render(
    result: Result<LookupOutcome, ValidationError>,
    mock: impl FnOnce() -> PersonalMock,
) -> Result<LookupReport, FailureKind> {
    match result {
        Ok(LookupOutcome::Success(location)) => Ok(LookupReport::new(&location, &mock())),
        Ok(LookupOutcome::RateLimited) => Err(FailureKind::RateLimited),
        Ok(LookupOutcome::Failure) => Err(FailureKind::Unavailable),
        Err(e) => Err(FailureKind::from(&e)),
    }
}
