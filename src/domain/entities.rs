//! Domain entities. A lead is one struct tagged with its variant.
//!
//! `LeadRecord` is the flat key-value shape shared by the JSON store and CSV export;
//! `Lead::from_record` is the only place a variant is chosen, always from the `type` tag.

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use super::{DomainError, Stage};

/// Discriminator value stored in `type` for qualified leads.
pub const QUALIFIED_TAG: &str = "qualified";

/// Minimum score for a qualified lead to count as high value.
pub const HIGH_VALUE_THRESHOLD: u8 = 80;

const MAX_SCORE: i64 = 100;

/// Variant of a lead. Qualified leads carry a score in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LeadKind {
    Regular,
    Qualified { score: u8 },
}

/// A recorded contact. Name and email are validated on every write through the setters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lead {
    name: String,
    email: String,
    company: String,
    stage: Stage,
    created: NaiveDate,
    kind: LeadKind,
}

impl Lead {
    /// Regular lead in stage `novo`, created today.
    pub fn new(
        name: impl AsRef<str>,
        email: impl AsRef<str>,
        company: impl AsRef<str>,
    ) -> Result<Self, DomainError> {
        Self::with_details(name, email, company, Stage::default(), None)
    }

    /// Regular lead with explicit stage and creation date (today when `None`).
    pub fn with_details(
        name: impl AsRef<str>,
        email: impl AsRef<str>,
        company: impl AsRef<str>,
        stage: Stage,
        created: Option<NaiveDate>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            name: validate_name(name.as_ref())?,
            email: validate_email(email.as_ref())?,
            company: company.as_ref().to_string(),
            stage,
            created: created.unwrap_or_else(today),
            kind: LeadKind::Regular,
        })
    }

    /// Qualified lead. Stage is fixed to `qualificado`; the score is clamped, never rejected.
    pub fn qualified(
        name: impl AsRef<str>,
        email: impl AsRef<str>,
        company: impl AsRef<str>,
        score: i64,
        created: Option<NaiveDate>,
    ) -> Result<Self, DomainError> {
        Ok(Self {
            name: validate_name(name.as_ref())?,
            email: validate_email(email.as_ref())?,
            company: company.as_ref().to_string(),
            stage: Stage::Qualificado,
            created: created.unwrap_or_else(today),
            kind: LeadKind::Qualified {
                score: clamp_score(score),
            },
        })
    }

    /// Qualified copy of this lead keeping name, email, company and creation date.
    pub fn to_qualified(&self, score: i64) -> Result<Self, DomainError> {
        Self::qualified(
            &self.name,
            &self.email,
            &self.company,
            score,
            Some(self.created),
        )
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, value: &str) -> Result<(), DomainError> {
        self.name = validate_name(value)?;
        Ok(())
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn set_email(&mut self, value: &str) -> Result<(), DomainError> {
        self.email = validate_email(value)?;
        Ok(())
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }

    pub fn created(&self) -> NaiveDate {
        self.created
    }

    pub fn kind(&self) -> LeadKind {
        self.kind
    }

    pub fn is_qualified(&self) -> bool {
        matches!(self.kind, LeadKind::Qualified { .. })
    }

    /// Score of a qualified lead; `None` for regular leads.
    pub fn score(&self) -> Option<u8> {
        match self.kind {
            LeadKind::Qualified { score } => Some(score),
            LeadKind::Regular => None,
        }
    }

    /// True for qualified leads scoring at least [`HIGH_VALUE_THRESHOLD`].
    pub fn is_high_value(&self) -> bool {
        self.score().is_some_and(|s| s >= HIGH_VALUE_THRESHOLD)
    }

    /// Case-insensitive email comparison (identity across the system).
    pub fn has_email(&self, email: &str) -> bool {
        self.email.to_lowercase() == email.to_lowercase()
    }

    /// Case-insensitive substring match over name, company and email.
    /// An empty query matches nothing.
    pub fn matches(&self, query: &str) -> bool {
        if query.is_empty() {
            return false;
        }
        let haystack = format!("{} {} {}", self.name, self.company, self.email).to_lowercase();
        haystack.contains(&query.to_lowercase())
    }

    pub fn to_record(&self) -> LeadRecord {
        let (score, kind) = match self.kind {
            LeadKind::Qualified { score } => {
                (Some(i64::from(score)), Some(QUALIFIED_TAG.to_string()))
            }
            LeadKind::Regular => (None, None),
        };
        LeadRecord {
            name: self.name.clone(),
            company: self.company.clone(),
            email: self.email.clone(),
            stage: Some(self.stage.as_str().to_string()),
            created: Some(self.created.format("%Y-%m-%d").to_string()),
            score,
            kind,
        }
    }

    /// Rebuild a lead from its record. The variant comes from the `type` tag only;
    /// a `score` on an untagged record is ignored.
    pub fn from_record(record: &LeadRecord) -> Result<Self, DomainError> {
        let created = record.created.as_deref().map(parse_created).transpose()?;

        if record.kind.as_deref() == Some(QUALIFIED_TAG) {
            return Self::qualified(
                &record.name,
                &record.email,
                &record.company,
                record.score.unwrap_or(0),
                created,
            );
        }

        let stage = match record.stage.as_deref() {
            Some(raw) => raw.parse()?,
            None => Stage::default(),
        };
        Self::with_details(&record.name, &record.email, &record.company, stage, created)
    }
}

impl TryFrom<&LeadRecord> for Lead {
    type Error = DomainError;

    fn try_from(record: &LeadRecord) -> Result<Self, Self::Error> {
        Lead::from_record(record)
    }
}

impl From<&Lead> for LeadRecord {
    fn from(lead: &Lead) -> Self {
        lead.to_record()
    }
}

impl fmt::Display for Lead {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            LeadKind::Qualified { score } => write!(
                f,
                "QualifiedLead: {} - Score: {}/100 - {}",
                self.name, score, self.company
            ),
            LeadKind::Regular => write!(
                f,
                "Lead: {} ({}) - {} - {}",
                self.name, self.email, self.company, self.stage
            ),
        }
    }
}

/// Stored shape of a lead. Field order is the on-disk order.
///
/// Decoding is lenient: `null` text fields read as empty, and `score` accepts
/// integers, floats (truncated) or numeric strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeadRecord {
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub company: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stage: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient_score",
        skip_serializing_if = "Option::is_none"
    )]
    pub score: Option<i64>,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum StoredScore {
    Int(i64),
    Float(f64),
    Text(String),
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<StoredScore>::deserialize(deserializer)? {
        Some(StoredScore::Int(n)) => Some(n),
        Some(StoredScore::Float(f)) => Some(f as i64),
        Some(StoredScore::Text(s)) => s.trim().parse::<f64>().ok().map(|f| f as i64),
        None => None,
    })
}

/// ISO date, or the date part of an ISO date-time.
fn parse_created(raw: &str) -> Result<NaiveDate, DomainError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .or_else(|_| raw.parse::<NaiveDateTime>().map(|dt| dt.date()))
        .or_else(|_| DateTime::parse_from_rfc3339(raw).map(|dt| dt.date_naive()))
        .map_err(|e| DomainError::Validation(format!("invalid created date {:?}: {}", raw, e)))
}

fn validate_name(value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("name must not be empty"));
    }
    Ok(trimmed.to_string())
}

fn validate_email(value: &str) -> Result<String, DomainError> {
    let trimmed = value.trim();
    if !trimmed.contains('@') {
        return Err(DomainError::validation("email must contain @"));
    }
    Ok(trimmed.to_string())
}

fn clamp_score(score: i64) -> u8 {
    score.clamp(0, MAX_SCORE) as u8
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}
