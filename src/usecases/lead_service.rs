//! Lead business rules on top of the repository port.
//!
//! - Email identity: no two stored leads share an email (case-insensitive)
//! - Promotion replaces a regular lead with a qualified copy
//! - Statistics are computed in one pass over the stored collection

use crate::domain::{DomainError, Lead};
use crate::ports::LeadRepoPort;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

/// Lead service. The only surface the shell talks to.
pub struct LeadService {
    repo: Arc<dyn LeadRepoPort>,
}

impl LeadService {
    pub fn new(repo: Arc<dyn LeadRepoPort>) -> Self {
        Self { repo }
    }

    /// Create and persist a lead; qualified when `qualify` is set.
    ///
    /// Fails with `Validation` on a blank name, an email without `@`, or an email
    /// already in use.
    pub async fn create_lead(
        &self,
        name: &str,
        email: &str,
        company: &str,
        qualify: bool,
        score: i64,
    ) -> Result<Lead, DomainError> {
        let name = name.trim();
        let email = email.trim();
        if name.is_empty() {
            return Err(DomainError::validation("name is required"));
        }
        if !email.contains('@') {
            return Err(DomainError::validation("a valid email is required"));
        }

        if self.repo.get_by_email(email).await?.is_some() {
            return Err(DomainError::Validation(format!(
                "lead already exists with email {}",
                email
            )));
        }

        let lead = if qualify {
            Lead::qualified(name, email, company.trim(), score, None)?
        } else {
            Lead::new(name, email, company.trim())?
        };
        self.repo.add(&lead).await?;
        info!(email = %lead.email(), qualified = lead.is_qualified(), "lead created");
        Ok(lead)
    }

    pub async fn list_all(&self) -> Result<Vec<Lead>, DomainError> {
        self.repo.list_all().await
    }

    /// Only the qualified leads, filtered from the full collection.
    pub async fn list_qualified(&self) -> Result<Vec<Lead>, DomainError> {
        let leads = self.repo.list_all().await?;
        Ok(leads.into_iter().filter(Lead::is_qualified).collect())
    }

    pub async fn search(&self, query: &str) -> Result<Vec<Lead>, DomainError> {
        self.repo.search(query).await
    }

    pub async fn get_stats(&self) -> Result<LeadStats, DomainError> {
        let leads = self.repo.list_all().await?;
        Ok(LeadStats::from_leads(&leads))
    }

    /// Replace a regular lead with a qualified copy scored `score`.
    ///
    /// The existence check matches email case-insensitively, while the removal of the
    /// old entry matches the stored email exactly as typed.
    pub async fn promote_lead(&self, email: &str, score: i64) -> Result<Lead, DomainError> {
        let lead = self
            .repo
            .get_by_email(email)
            .await?
            .ok_or_else(|| DomainError::validation("lead not found"))?;
        if lead.is_qualified() {
            return Err(DomainError::validation("lead is already qualified"));
        }

        let mut leads = self.repo.list_all().await?;
        leads.retain(|l| l.email() != email);

        let qualified = lead.to_qualified(score)?;
        leads.push(qualified.clone());
        self.repo.save_all(&leads).await?;

        info!(email = %qualified.email(), score = ?qualified.score(), "lead promoted");
        Ok(qualified)
    }

    /// Export to the repository's default CSV path. `None` when the file is not writable.
    pub async fn export_to_csv(&self) -> Result<Option<PathBuf>, DomainError> {
        self.repo.export_csv(None).await
    }
}

/// Aggregate counts over the stored leads.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LeadStats {
    pub total: usize,
    pub qualified: usize,
    pub regular: usize,
    pub high_value: usize,
}

impl LeadStats {
    pub fn from_leads(leads: &[Lead]) -> Self {
        let mut stats = Self::default();
        for lead in leads {
            stats.total += 1;
            if lead.is_qualified() {
                stats.qualified += 1;
                if lead.is_high_value() {
                    stats.high_value += 1;
                }
            }
        }
        stats.regular = stats.total - stats.qualified;
        stats
    }

    /// Percentage of qualified leads; `None` when there are no leads.
    pub fn qualification_rate(&self) -> Option<f64> {
        self.rate(self.qualified)
    }

    /// Percentage of high-value leads; `None` when there are no leads.
    pub fn high_value_rate(&self) -> Option<f64> {
        self.rate(self.high_value)
    }

    fn rate(&self, part: usize) -> Option<f64> {
        (self.total > 0).then(|| part as f64 * 100.0 / self.total as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_from_leads() {
        let leads = vec![
            Lead::new("A", "a@x.io", "").unwrap(),
            Lead::new("B", "b@x.io", "").unwrap(),
            Lead::new("C", "c@x.io", "").unwrap(),
            Lead::qualified("D", "d@x.io", "", 90, None).unwrap(),
            Lead::qualified("E", "e@x.io", "", 50, None).unwrap(),
        ];
        let stats = LeadStats::from_leads(&leads);
        assert_eq!(
            stats,
            LeadStats {
                total: 5,
                qualified: 2,
                regular: 3,
                high_value: 1,
            }
        );
        assert_eq!(stats.qualification_rate(), Some(40.0));
        assert_eq!(stats.high_value_rate(), Some(20.0));
    }

    #[test]
    fn test_empty_stats_have_no_rates() {
        let stats = LeadStats::from_leads(&[]);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.qualification_rate(), None);
    }
}
