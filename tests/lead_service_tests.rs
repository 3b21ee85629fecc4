use lead_tracker::adapters::persistence::JsonLeadRepo;
use lead_tracker::domain::{DomainError, LeadKind, Stage};
use lead_tracker::ports::LeadRepoPort;
use lead_tracker::usecases::{LeadService, LeadStats};
use std::sync::Arc;
use tempfile::TempDir;

fn setup(dir: &TempDir) -> (LeadService, Arc<dyn LeadRepoPort>) {
    let repo: Arc<dyn LeadRepoPort> = Arc::new(JsonLeadRepo::new(dir.path().join("data")));
    (LeadService::new(Arc::clone(&repo)), repo)
}

#[tokio::test]
async fn test_create_then_get_by_email() {
    let dir = TempDir::new().unwrap();
    let (service, repo) = setup(&dir);

    let created = service
        .create_lead(" Ana ", "ana@acme.com", "Acme", false, 0)
        .await
        .unwrap();
    assert_eq!(created.name(), "Ana");

    let found = repo.get_by_email("ana@acme.com").await.unwrap().unwrap();
    assert_eq!(found.name(), "Ana");
    assert_eq!(found.email(), "ana@acme.com");
    assert_eq!(found.stage(), Stage::Novo);
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_create_rejects_invalid_input() {
    let dir = TempDir::new().unwrap();
    let (service, repo) = setup(&dir);

    let err = service
        .create_lead("  ", "ana@acme.com", "", false, 0)
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation(_)));

    let err = service
        .create_lead("Ana", "ana.acme.com", "", false, 0)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert_eq!(repo.count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_case_insensitively() {
    let dir = TempDir::new().unwrap();
    let (service, repo) = setup(&dir);

    service
        .create_lead("Ana", "ana@acme.com", "", false, 0)
        .await
        .unwrap();
    let err = service
        .create_lead("Other Ana", "ANA@Acme.com", "", true, 90)
        .await
        .unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("already exists"));
    assert_eq!(repo.count().await.unwrap(), 1);
}

#[tokio::test]
async fn test_qualified_creation_clamps_score() {
    let dir = TempDir::new().unwrap();
    let (service, _repo) = setup(&dir);

    let lead = service
        .create_lead("Bia", "bia@acme.com", "", true, 150)
        .await
        .unwrap();
    assert_eq!(lead.kind(), LeadKind::Qualified { score: 100 });
    assert_eq!(lead.stage(), Stage::Qualificado);

    let qualified = service.list_qualified().await.unwrap();
    assert_eq!(qualified.len(), 1);
    assert_eq!(qualified[0].score(), Some(100));
}

#[tokio::test]
async fn test_stats_on_mixed_collection() {
    let dir = TempDir::new().unwrap();
    let (service, _repo) = setup(&dir);

    for (name, email) in [("A", "a@x.io"), ("B", "b@x.io"), ("C", "c@x.io")] {
        service.create_lead(name, email, "", false, 0).await.unwrap();
    }
    service
        .create_lead("D", "d@x.io", "", true, 90)
        .await
        .unwrap();
    service
        .create_lead("E", "e@x.io", "", true, 50)
        .await
        .unwrap();

    let stats = service.get_stats().await.unwrap();
    assert_eq!(
        stats,
        LeadStats {
            total: 5,
            qualified: 2,
            regular: 3,
            high_value: 1,
        }
    );
    assert_eq!(service.list_qualified().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_promote_replaces_regular_lead() {
    let dir = TempDir::new().unwrap();
    let (service, repo) = setup(&dir);

    let original = service
        .create_lead("Ana", "ana@acme.com", "Acme", false, 0)
        .await
        .unwrap();
    service
        .create_lead("Caio", "caio@globex.com", "Globex", false, 0)
        .await
        .unwrap();

    let promoted = service.promote_lead("ana@acme.com", 85).await.unwrap();
    assert_eq!(promoted.kind(), LeadKind::Qualified { score: 85 });
    assert_eq!(promoted.name(), original.name());
    assert_eq!(promoted.company(), original.company());
    assert_eq!(promoted.created(), original.created());

    let all = service.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    let anas: Vec<_> = all.iter().filter(|l| l.email() == "ana@acme.com").collect();
    assert_eq!(anas.len(), 1);
    assert!(anas[0].is_qualified());
    assert!(repo.get_by_email("ana@acme.com").await.unwrap().unwrap().is_high_value());
}

#[tokio::test]
async fn test_promote_failures() {
    let dir = TempDir::new().unwrap();
    let (service, _repo) = setup(&dir);

    let err = service.promote_lead("ghost@acme.com", 50).await.unwrap_err();
    assert!(err.is_validation());

    service
        .create_lead("Bia", "bia@acme.com", "", true, 60)
        .await
        .unwrap();
    let err = service.promote_lead("bia@acme.com", 90).await.unwrap_err();
    assert!(err.is_validation());
    assert!(err.to_string().contains("already qualified"));
}

#[tokio::test]
async fn test_promote_with_different_casing_keeps_stale_entry() {
    let dir = TempDir::new().unwrap();
    let (service, _repo) = setup(&dir);

    service
        .create_lead("Ana", "ana@acme.com", "", false, 0)
        .await
        .unwrap();
    service.promote_lead("ANA@ACME.COM", 70).await.unwrap();

    // Lookup is case-insensitive but removal is exact, so the regular entry survives.
    let all = service.list_all().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all.iter().filter(|l| l.is_qualified()).count(), 1);
}

#[tokio::test]
async fn test_search_through_service() {
    let dir = TempDir::new().unwrap();
    let (service, _repo) = setup(&dir);

    service
        .create_lead("Ana Souza", "ana@acme.com", "Acme", false, 0)
        .await
        .unwrap();
    service
        .create_lead("Caio", "caio@globex.com", "Globex", true, 40)
        .await
        .unwrap();

    assert!(service.search("").await.unwrap().is_empty());
    assert_eq!(service.search("souza").await.unwrap().len(), 1);
    assert_eq!(service.search("GLOBEX").await.unwrap().len(), 1);
    assert_eq!(service.search(".com").await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_export_to_csv_columns_follow_contents() {
    let dir = TempDir::new().unwrap();
    let (service, _repo) = setup(&dir);

    service
        .create_lead("Ana", "ana@acme.com", "Acme", false, 0)
        .await
        .unwrap();
    let path = service.export_to_csv().await.unwrap().unwrap();
    let csv = std::fs::read_to_string(&path).unwrap();
    assert!(csv.starts_with("name,company,email,stage,created\n"));

    service
        .create_lead("Bia", "bia@acme.com", "Acme", true, 88)
        .await
        .unwrap();
    let path = service.export_to_csv().await.unwrap().unwrap();
    let csv = std::fs::read_to_string(&path).unwrap();
    assert!(csv.starts_with("name,company,email,stage,created,score,type\n"));
    assert!(csv.contains(",88,qualified"));
}

#[tokio::test]
async fn test_malformed_storage_loads_as_empty() {
    let dir = TempDir::new().unwrap();
    let (service, _repo) = setup(&dir);
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    std::fs::write(dir.path().join("data").join("leads.json"), "not json at all").unwrap();

    assert!(service.list_all().await.unwrap().is_empty());
    assert_eq!(service.get_stats().await.unwrap(), LeadStats::default());

    // The next write replaces the unreadable file with valid content.
    service
        .create_lead("Ana", "ana@acme.com", "", false, 0)
        .await
        .unwrap();
    assert_eq!(service.list_all().await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_loosely_typed_storage_keeps_leads_and_duplicate_check() {
    let dir = TempDir::new().unwrap();
    let (service, _repo) = setup(&dir);
    std::fs::create_dir_all(dir.path().join("data")).unwrap();
    let raw = r#"[
        {"name": "Ana", "company": "Acme", "email": "ana@acme.com", "stage": "novo", "created": "2024-01-01"},
        {"name": "Bia", "company": "Acme", "email": "bia@acme.com", "stage": "novo", "created": "2024-01-02T10:00:00"},
        {"name": "Caio", "company": null, "email": "caio@globex.com", "stage": "qualificado",
         "created": "2024-01-03", "score": 85.5, "type": "qualified"}
    ]"#;
    std::fs::write(dir.path().join("data").join("leads.json"), raw).unwrap();

    let err = service
        .create_lead("Caio Again", "CAIO@globex.com", "", false, 0)
        .await
        .unwrap_err();
    assert!(err.is_validation());

    service
        .create_lead("Dan", "dan@acme.com", "", false, 0)
        .await
        .unwrap();
    let all = service.list_all().await.unwrap();
    assert_eq!(all.len(), 4);
    assert!(all.iter().any(|l| l.email() == "bia@acme.com"));
    assert_eq!(service.get_stats().await.unwrap().high_value, 1);
}
