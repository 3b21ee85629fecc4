//! Implements InputPort. Inquire-based menu loop over the lead service.
//!
//! All prompting and table rendering lives here; business rules stay in LeadService.

use crate::domain::{DomainError, Lead, LeadKind};
use crate::ports::InputPort;
use crate::usecases::LeadService;
use async_trait::async_trait;
use inquire::ui::{Color, RenderConfig, Styled};
use inquire::{InquireError, Select, Text};
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// Applies the neon prompt theme globally (same purple and green as the banner).
pub fn apply_theme() {
    let purple = Color::Rgb {
        r: 0xbc,
        g: 0x13,
        b: 0xfe,
    };
    let green = Color::Rgb {
        r: 0x0f,
        g: 0xf0,
        b: 0xfc,
    };
    let config = RenderConfig::default()
        .with_prompt_prefix(Styled::new("?").with_fg(purple))
        .with_highlighted_option_prefix(Styled::new(">").with_fg(green));
    inquire::set_global_render_config(config);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum MenuAction {
    AddLead,
    AddQualifiedLead,
    ListAll,
    ListQualified,
    Search,
    Stats,
    Promote,
    ExportCsv,
    Exit,
}

impl MenuAction {
    const ALL: [MenuAction; 9] = [
        MenuAction::AddLead,
        MenuAction::AddQualifiedLead,
        MenuAction::ListAll,
        MenuAction::ListQualified,
        MenuAction::Search,
        MenuAction::Stats,
        MenuAction::Promote,
        MenuAction::ExportCsv,
        MenuAction::Exit,
    ];
}

impl fmt::Display for MenuAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            MenuAction::AddLead => "Add lead",
            MenuAction::AddQualifiedLead => "Add qualified lead",
            MenuAction::ListAll => "List all leads",
            MenuAction::ListQualified => "List qualified leads",
            MenuAction::Search => "Search leads",
            MenuAction::Stats => "Statistics",
            MenuAction::Promote => "Promote lead to qualified",
            MenuAction::ExportCsv => "Export to CSV",
            MenuAction::Exit => "Exit",
        };
        f.write_str(label)
    }
}

/// Parse a typed score: digits only, anything else is 0; result clamped to 0..=100.
pub fn parse_score(input: &str) -> i64 {
    input
        .trim()
        .parse::<u64>()
        .map(|n| n.min(100) as i64)
        .unwrap_or(0)
}

/// Render leads as a fixed-width table with a trailing total line.
pub fn format_table(leads: &[Lead]) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:>2} | {:<11} | {:<20} | {:<18} | {:<24} | {:<10}\n",
        "#", "Type", "Name", "Company", "Email", "Info"
    ));
    out.push_str(&"-".repeat(100));
    out.push('\n');
    for (i, lead) in leads.iter().enumerate() {
        let (kind, info) = match lead.kind() {
            LeadKind::Qualified { score } => ("Qualified", format!("Score: {}", score)),
            LeadKind::Regular => ("Regular", lead.stage().display_name().to_string()),
        };
        out.push_str(&format!(
            "{:02} | {:<11} | {:<20} | {:<18} | {:<24} | {:<10}\n",
            i,
            kind,
            lead.name(),
            lead.company(),
            lead.email(),
            info
        ));
    }
    out.push_str(&format!("\nTotal: {} lead(s)", leads.len()));
    out
}

/// Outcome of a prompt: a value, or the user backed out of the action.
enum Prompted<T> {
    Value(T),
    Cancelled,
}

fn prompt_text(message: &str) -> Result<Prompted<String>, DomainError> {
    match Text::new(message).prompt() {
        Ok(v) => Ok(Prompted::Value(v.trim().to_string())),
        Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
            Ok(Prompted::Cancelled)
        }
        Err(e) => Err(DomainError::Ui(e.to_string())),
    }
}

macro_rules! prompt_or_return {
    ($msg:expr) => {
        match prompt_text($msg)? {
            Prompted::Value(v) => v,
            Prompted::Cancelled => {
                println!("Cancelled.");
                return Ok(());
            }
        }
    };
}

/// TUI adapter. Inquire prompts.
pub struct TuiInputPort {
    service: Arc<LeadService>,
}

impl TuiInputPort {
    pub fn new(service: Arc<LeadService>) -> Self {
        Self { service }
    }

    async fn add_lead(&self, qualified: bool) -> Result<(), DomainError> {
        println!(
            "\nAdd {}",
            if qualified { "qualified lead" } else { "lead" }
        );
        let name = prompt_or_return!("Name:");
        let company = prompt_or_return!("Company:");
        let email = prompt_or_return!("Email:");
        let score = if qualified {
            parse_score(&prompt_or_return!("Score (0-100):"))
        } else {
            0
        };

        let lead = self
            .service
            .create_lead(&name, &email, &company, qualified, score)
            .await?;
        match lead.score() {
            Some(score) => println!("Qualified lead added! Score: {}/100", score),
            None => println!("Lead added."),
        }
        println!("Details: {}", lead);
        Ok(())
    }

    async fn list_leads(&self, qualified_only: bool) -> Result<(), DomainError> {
        let leads = if qualified_only {
            self.service.list_qualified().await?
        } else {
            self.service.list_all().await?
        };
        if leads.is_empty() {
            println!(
                "No {}leads found.",
                if qualified_only { "qualified " } else { "" }
            );
            return Ok(());
        }
        let title = if qualified_only {
            "QUALIFIED LEADS"
        } else {
            "ALL LEADS"
        };
        println!("\n{}\n{}", title, "=".repeat(100));
        println!("{}", format_table(&leads));
        Ok(())
    }

    async fn search(&self) -> Result<(), DomainError> {
        let query = prompt_or_return!("Search (name, company or email):");
        if query.is_empty() {
            println!("Type a term to search for.");
            return Ok(());
        }
        let results = self.service.search(&query).await?;
        if results.is_empty() {
            println!("No leads match '{}'.", query);
            return Ok(());
        }
        println!("\nSEARCH RESULTS: '{}'\n{}", query, "=".repeat(60));
        for (i, lead) in results.iter().enumerate() {
            let tag = if lead.is_qualified() { "[Q]" } else { "[R]" };
            println!(
                "{:2}. {} {} | {} | {}",
                i + 1,
                tag,
                lead.name(),
                lead.company(),
                lead.email()
            );
        }
        println!("\nFound: {} lead(s)", results.len());
        Ok(())
    }

    async fn show_stats(&self) -> Result<(), DomainError> {
        let stats = self.service.get_stats().await?;
        println!("\nLEAD STATISTICS\n{}", "=".repeat(30));
        println!("Total leads:      {}", stats.total);
        println!("Regular leads:    {}", stats.regular);
        println!("Qualified leads:  {}", stats.qualified);
        println!("High-value leads: {}", stats.high_value);
        if let (Some(q), Some(h)) = (stats.qualification_rate(), stats.high_value_rate()) {
            println!("Qualification rate: {:.1}%", q);
            println!("High-value rate:    {:.1}%", h);
        }
        Ok(())
    }

    async fn promote(&self) -> Result<(), DomainError> {
        let email = prompt_or_return!("Email of the lead to promote:");
        if email.is_empty() {
            println!("Email is required.");
            return Ok(());
        }
        let score = parse_score(&prompt_or_return!("Score (0-100):"));
        let lead = self.service.promote_lead(&email, score).await?;
        println!("Lead promoted to qualified!");
        println!("Details: {}", lead);
        Ok(())
    }

    async fn export_csv(&self) -> Result<(), DomainError> {
        match self.service.export_to_csv().await? {
            Some(path) => println!("Exported to: {}", path.display()),
            None => println!("Could not write the CSV. Check whether the file is open elsewhere."),
        }
        Ok(())
    }

    async fn dispatch(&self, action: MenuAction) -> Result<(), DomainError> {
        match action {
            MenuAction::AddLead => self.add_lead(false).await,
            MenuAction::AddQualifiedLead => self.add_lead(true).await,
            MenuAction::ListAll => self.list_leads(false).await,
            MenuAction::ListQualified => self.list_leads(true).await,
            MenuAction::Search => self.search().await,
            MenuAction::Stats => self.show_stats().await,
            MenuAction::Promote => self.promote().await,
            MenuAction::ExportCsv => self.export_csv().await,
            MenuAction::Exit => Ok(()),
        }
    }
}

#[async_trait]
impl InputPort for TuiInputPort {
    async fn run(&self) -> Result<(), DomainError> {
        loop {
            let action = match Select::new("Choose an option", MenuAction::ALL.to_vec()).prompt() {
                Ok(action) => action,
                Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                    println!("\nInterrupted by user.");
                    break;
                }
                Err(e) => return Err(DomainError::Ui(e.to_string())),
            };
            if action == MenuAction::Exit {
                println!("\nGoodbye!");
                break;
            }

            debug!(?action, "menu action");
            if let Err(e) = self.dispatch(action).await {
                println!("{}", e);
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_score() {
        assert_eq!(parse_score("85"), 85);
        assert_eq!(parse_score(" 100 "), 100);
        assert_eq!(parse_score("150"), 100);
        assert_eq!(parse_score("-5"), 0);
        assert_eq!(parse_score("abc"), 0);
        assert_eq!(parse_score(""), 0);
    }

    #[test]
    fn test_format_table() {
        let leads = vec![
            Lead::new("Ana", "ana@acme.com", "Acme").unwrap(),
            Lead::qualified("Bia", "bia@acme.com", "Acme", 90, None).unwrap(),
        ];
        let table = format_table(&leads);
        assert!(table.contains("00 | Regular"));
        assert!(table.contains("Novo Lead"));
        assert!(table.contains("01 | Qualified"));
        assert!(table.contains("Score: 90"));
        assert!(table.ends_with("Total: 2 lead(s)"));
    }

    #[test]
    fn test_menu_lists_every_action_once() {
        assert_eq!(MenuAction::ALL.len(), 9);
        assert_eq!(MenuAction::ALL.last(), Some(&MenuAction::Exit));
    }
}
