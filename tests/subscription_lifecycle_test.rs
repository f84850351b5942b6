use std::sync::Arc;
use subscription_ledger::{
    ErrorKind, InMemoryStore, RawReportFilter, RawSubscription, ReportEngine, SubscriptionService,
};
use tokio_test::{assert_err, assert_ok};

fn raw(user: &str, provider: &str, price: u64, start: &str, end: Option<&str>) -> RawSubscription {
    RawSubscription {
        id: None,
        user_id: Some(user.to_string()),
        provider: Some(provider.to_string()),
        price: Some(price),
        start: Some(start.to_string()),
        end: end.map(str::to_string),
    }
}

fn setup() -> (SubscriptionService<InMemoryStore>, ReportEngine<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    (
        SubscriptionService::new(Arc::clone(&store)),
        ReportEngine::new(store),
    )
}

#[tokio::test]
async fn test_full_crud_flow() {
    let (service, _) = setup();

    let created = assert_ok!(
        service
            .create(raw(
                "60601fee-2bf1-4721-ae6f-7636e79a0cba",
                "Yandex Plus",
                400,
                "07-2025",
                None
            ))
            .await
    );
    let id = created.id.expect("id assigned on create");

    let fetched = assert_ok!(service.get_by_id(id).await);
    assert_eq!(fetched.provider.as_deref(), Some("Yandex Plus"));
    assert_eq!(fetched.start.as_deref(), Some("07-2025"));
    assert_eq!(fetched.end, None);

    let listed = assert_ok!(service.get_all().await);
    assert_eq!(listed, vec![fetched]);

    assert_ok!(service.delete_by_id(id).await);
    let err = assert_err!(service.get_by_id(id).await);
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_overlapping_create_is_rejected() {
    let (service, _) = setup();
    assert_ok!(service.create(raw("U", "P", 100, "06-2025", None)).await);

    let err = assert_err!(service.create(raw("U", "P", 100, "07-2025", None)).await);
    assert_eq!(err.kind(), ErrorKind::AlreadyExists);
}

#[tokio::test]
async fn test_non_overlapping_create_succeeds() {
    let (service, _) = setup();
    assert_ok!(service.create(raw("U", "P", 100, "06-2025", Some("06-2025"))).await);
    assert_ok!(service.create(raw("U", "P", 100, "07-2025", None)).await);
    assert_eq!(assert_ok!(service.get_all().await).len(), 2);
}

#[tokio::test]
async fn test_update_price_only() {
    let (service, _) = setup();
    let created = assert_ok!(
        service
            .create(raw("user1", "Netflix", 300, "06-2025", Some("12-2025")))
            .await
    );
    let id = created.id.unwrap();

    let patch = RawSubscription {
        price: Some(450),
        ..Default::default()
    };
    let updated = assert_ok!(service.update_by_id(patch, &id.to_string()).await);
    assert_eq!(updated.price, Some(450));

    let stored = assert_ok!(service.get_by_id(id).await);
    assert_eq!(stored.price, Some(450));
    assert_eq!(stored.user_id.as_deref(), Some("user1"));
    assert_eq!(stored.provider.as_deref(), Some("Netflix"));
    assert_eq!(stored.start.as_deref(), Some("06-2025"));
    assert_eq!(stored.end.as_deref(), Some("12-2025"));
}

#[tokio::test]
async fn test_update_with_bad_date_changes_nothing() {
    let (service, _) = setup();
    let id = assert_ok!(service.create(raw("user1", "Netflix", 300, "06-2025", None)).await)
        .id
        .unwrap();

    let patch = RawSubscription {
        price: Some(1),
        start: Some("June".to_string()),
        ..Default::default()
    };
    let err = assert_err!(service.update_by_id(patch, &id.to_string()).await);
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
    assert_eq!(assert_ok!(service.get_by_id(id).await).price, Some(300));
}

#[tokio::test]
async fn test_delete_missing_is_not_found() {
    let (service, _) = setup();
    let err = assert_err!(service.delete_by_id(subscription_ledger::SubscriptionId(77)).await);
    assert_eq!(err.kind(), ErrorKind::NotFound);
}

#[tokio::test]
async fn test_create_missing_user_leaves_store_unchanged() {
    let store = Arc::new(InMemoryStore::new());
    let service = SubscriptionService::new(Arc::clone(&store));
    assert!(store.is_empty().await);

    assert_ok!(service.create(raw("user1", "Netflix", 300, "06-2025", None)).await);
    assert_eq!(store.len().await, 1);

    let err = assert_err!(service.create(raw("", "Spotify", 200, "05-2025", None)).await);
    assert_eq!(err.kind(), ErrorKind::MissingField);

    assert_eq!(store.len().await, 1);
    assert_eq!(assert_ok!(service.get_all().await).len(), 1);
}

#[tokio::test]
async fn test_user_id_is_matched_exactly() {
    let (service, reports) = setup();
    let created = assert_ok!(service.create(raw(" user1", "Netflix", 300, "06-2025", None)).await);
    assert_eq!(created.user_id.as_deref(), Some(" user1"));

    // a differently spaced id is another user, so no overlap
    assert_ok!(service.create(raw("user1", "Netflix", 100, "06-2025", None)).await);

    let exact = assert_ok!(
        reports
            .report(RawReportFilter {
                period: "07-2025".to_string(),
                user_id: Some(" user1".to_string()),
                provider: None,
            })
            .await
    );
    assert_eq!(exact.total, 300);

    let plain = assert_ok!(
        reports
            .report(RawReportFilter {
                period: "07-2025".to_string(),
                user_id: Some("user1".to_string()),
                provider: None,
            })
            .await
    );
    assert_eq!(plain.total, 100);
}

#[tokio::test]
async fn test_empty_store_lists_nothing() {
    let (service, _) = setup();
    assert!(assert_ok!(service.get_all().await).is_empty());
}

#[tokio::test]
async fn test_report_for_july() {
    let (service, reports) = setup();
    assert_ok!(service.create(raw("user1", "Netflix", 300, "06-2025", None)).await);
    assert_ok!(
        service
            .create(raw("user1", "Spotify", 200, "05-2025", Some("07-2025")))
            .await
    );

    let filtered = assert_ok!(
        reports
            .report(RawReportFilter {
                period: "07-2025".to_string(),
                user_id: Some("user1".to_string()),
                provider: Some("Netflix".to_string()),
            })
            .await
    );
    assert_eq!(filtered.total, 300);

    let by_user = assert_ok!(
        reports
            .report(RawReportFilter {
                period: "07-2025".to_string(),
                user_id: Some("user1".to_string()),
                provider: None,
            })
            .await
    );
    assert_eq!(by_user.total, 500);

    let empty = assert_ok!(
        reports
            .report(RawReportFilter {
                period: "01-2030".to_string(),
                user_id: Some("nobody".to_string()),
                provider: None,
            })
            .await
    );
    assert_eq!(empty.total, 0);
}

#[tokio::test]
async fn test_report_requires_valid_period() {
    let (_, reports) = setup();
    let err = assert_err!(
        reports
            .report(RawReportFilter {
                period: "7/2025".to_string(),
                ..Default::default()
            })
            .await
    );
    assert_eq!(err.kind(), ErrorKind::InvalidFormat);
}
