use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::common::ReportId;

/// The three report collections submitted through the public forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportKind {
    Lost,
    Found,
    Abuse,
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error("Unknown report type: {0}")]
pub struct UnknownReportKind(pub String);

impl ReportKind {
    pub const ALL: [ReportKind; 3] = [ReportKind::Lost, ReportKind::Found, ReportKind::Abuse];

    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Lost => "lost",
            ReportKind::Found => "found",
            ReportKind::Abuse => "abuse",
        }
    }

    /// Document collection name as exposed to clients.
    pub fn collection(&self) -> &'static str {
        match self {
            ReportKind::Lost => "reports-lost",
            ReportKind::Found => "reports-found",
            ReportKind::Abuse => "reports-abuse",
        }
    }

    /// Backing SQL table. Also the payload of `reports_changed` notifications.
    pub fn table(&self) -> &'static str {
        match self {
            ReportKind::Lost => "reports_lost",
            ReportKind::Found => "reports_found",
            ReportKind::Abuse => "reports_abuse",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReportKind {
    type Err = UnknownReportKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lost" => Ok(ReportKind::Lost),
            "found" => Ok(ReportKind::Found),
            "abuse" => Ok(ReportKind::Abuse),
            other => Err(UnknownReportKind(other.to_string())),
        }
    }
}

/// Kind-specific part of a report. Each variant carries only its own
/// location field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ReportDetails {
    Lost {
        #[serde(rename = "lastSeenLocation", default)]
        last_seen_location: Option<String>,
    },
    Found {
        #[serde(rename = "foundLocation", default)]
        found_location: Option<String>,
    },
    Abuse {
        #[serde(rename = "incidentLocation", default)]
        incident_location: Option<String>,
    },
}

impl ReportDetails {
    pub fn new(kind: ReportKind, location: Option<String>) -> Self {
        match kind {
            ReportKind::Lost => ReportDetails::Lost {
                last_seen_location: location,
            },
            ReportKind::Found => ReportDetails::Found {
                found_location: location,
            },
            ReportKind::Abuse => ReportDetails::Abuse {
                incident_location: location,
            },
        }
    }

    pub fn kind(&self) -> ReportKind {
        match self {
            ReportDetails::Lost { .. } => ReportKind::Lost,
            ReportDetails::Found { .. } => ReportKind::Found,
            ReportDetails::Abuse { .. } => ReportKind::Abuse,
        }
    }

    pub fn location(&self) -> Option<&str> {
        match self {
            ReportDetails::Lost { last_seen_location } => last_seen_location.as_deref(),
            ReportDetails::Found { found_location } => found_location.as_deref(),
            ReportDetails::Abuse { incident_location } => incident_location.as_deref(),
        }
    }
}

/// A lost, found or abuse report as read from its collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub id: ReportId,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub details: ReportDetails,
}

/// Row shape shared by the three report tables.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ReportRow {
    pub id: ReportId,
    pub location: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ReportRow {
    pub fn into_report(self, kind: ReportKind) -> Report {
        Report {
            id: self.id,
            created_at: self.created_at,
            details: ReportDetails::new(kind, self.location),
        }
    }
}

impl Report {
    pub fn new(kind: ReportKind, location: Option<&str>, created_at: DateTime<Utc>) -> Self {
        Self {
            id: ReportId::new(),
            created_at,
            details: ReportDetails::new(kind, location.map(str::to_string)),
        }
    }

    pub fn kind(&self) -> ReportKind {
        self.details.kind()
    }

    /// The kind-specific location field, if one was submitted.
    pub fn location(&self) -> Option<&str> {
        self.details.location()
    }

    /// Full snapshot of one collection, oldest first.
    pub async fn find_all(kind: ReportKind, pool: &PgPool) -> Result<Vec<Self>> {
        let rows = sqlx::query_as::<_, ReportRow>(&format!(
            "SELECT id, location, created_at FROM {} ORDER BY created_at ASC, id ASC",
            kind.table()
        ))
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(|row| row.into_report(kind)).collect())
    }

    pub async fn insert(&self, pool: &PgPool) -> Result<()> {
        sqlx::query(&format!(
            "INSERT INTO {} (id, location, created_at) VALUES ($1, $2, $3)",
            self.kind().table()
        ))
        .bind(self.id)
        .bind(self.location())
        .bind(self.created_at)
        .execute(pool)
        .await?;
        Ok(())
    }

    /// Returns `false` when no report with that id exists in the collection.
    pub async fn delete(kind: ReportKind, id: ReportId, pool: &PgPool) -> Result<bool> {
        let result = sqlx::query(&format!("DELETE FROM {} WHERE id = $1", kind.table()))
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn count(kind: ReportKind, pool: &PgPool) -> Result<i64> {
        let (count,) =
            sqlx::query_as::<_, (i64,)>(&format!("SELECT COUNT(*) FROM {}", kind.table()))
                .fetch_one(pool)
                .await?;
        Ok(count)
    }
}
