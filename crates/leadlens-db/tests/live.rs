//! Live integration tests for leadlens-db using `#[sqlx::test]`.
//!
//! Each test gets a fresh, fully-migrated Postgres database spun up by the
//! sqlx test harness. The `migrations` path is relative to the crate root
//! (`crates/leadlens-db/`), so `"../../migrations"` resolves to the
//! workspace migration directory.

use chrono::Utc;
use leadlens_core::{AiInsights, ContactSet, KeyPerson, LeadSnapshot, SocialPosts};
use leadlens_db::{
    count_leads, delete_lead, get_lead, insert_lead, insert_webhook_log, lead_stats, list_leads,
    list_webhook_logs, update_lead, update_social_posts, webhook_stats, DbError, LeadFilter,
    LeadSort,
};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn make_snapshot(url: &str, company_name: &str, score: f64) -> LeadSnapshot {
    LeadSnapshot {
        url: url.to_string(),
        company_name: company_name.to_string(),
        industry: "SaaS".to_string(),
        company_size: "50-200 employees".to_string(),
        location: "Springfield, USA".to_string(),
        summary: "Builds widgets.".to_string(),
        lead_score: score,
        contacts: ContactSet {
            emails: vec!["jane@acme.com".to_string()],
            phones: vec!["555-123-4567".to_string()],
            social_links: vec!["https://linkedin.com/company/acme".to_string()],
        },
        key_people: vec![KeyPerson {
            name: "Jane Roe".to_string(),
            role: "CEO".to_string(),
            link: "https://linkedin.com/in/jane".to_string(),
        }],
        tech_stack: vec!["Rust".to_string(), "Postgres".to_string()],
        services: vec!["Widgets".to_string()],
        pain_points: vec!["Slow delivery".to_string()],
        ai_insights: AiInsights {
            target_audience: Some("SMBs".to_string()),
            rating: Some(4.5),
            reviews: Some(120),
            ..AiInsights::default()
        },
        social_posts: SocialPosts::default(),
        scraped_title: "Acme Corp".to_string(),
        scraped_description: "Widgets for everyone".to_string(),
        analyzed_at: Utc::now(),
    }
}

// ---------------------------------------------------------------------------
// Section 1: Lead round-trip and ownership
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn lead_round_trip_preserves_every_field(pool: sqlx::PgPool) {
    let snapshot = make_snapshot("https://acme.example", "Acme Corp", 8.5);
    let owner = Uuid::new_v4();

    let inserted = insert_lead(&pool, Some(owner), &snapshot)
        .await
        .expect("insert_lead failed");
    assert_eq!(inserted.owner_id, Some(owner));

    let fetched = get_lead(&pool, inserted.id, Some(owner))
        .await
        .expect("get_lead failed")
        .expect("lead should exist");

    let restored = fetched.snapshot();
    assert_eq!(restored.url, snapshot.url);
    assert_eq!(restored.company_name, snapshot.company_name);
    assert_eq!(restored.industry, snapshot.industry);
    assert_eq!(restored.company_size, snapshot.company_size);
    assert_eq!(restored.location, snapshot.location);
    assert_eq!(restored.summary, snapshot.summary);
    assert!((restored.lead_score - 8.5).abs() < f64::EPSILON);
    assert_eq!(restored.contacts, snapshot.contacts);
    assert_eq!(restored.key_people, snapshot.key_people);
    assert_eq!(restored.tech_stack, snapshot.tech_stack);
    assert_eq!(restored.services, snapshot.services);
    assert_eq!(restored.pain_points, snapshot.pain_points);
    assert_eq!(restored.ai_insights, snapshot.ai_insights);
    assert_eq!(restored.social_posts, snapshot.social_posts);
    assert_eq!(restored.scraped_title, snapshot.scraped_title);
    assert_eq!(restored.scraped_description, snapshot.scraped_description);
}

#[sqlx::test(migrations = "../../migrations")]
async fn get_lead_respects_owner_filter(pool: sqlx::PgPool) {
    let snapshot = make_snapshot("https://acme.example", "Acme Corp", 7.0);
    let owner = Uuid::new_v4();
    let inserted = insert_lead(&pool, Some(owner), &snapshot)
        .await
        .expect("insert_lead failed");

    let other = get_lead(&pool, inserted.id, Some(Uuid::new_v4()))
        .await
        .expect("get_lead failed");
    assert!(other.is_none(), "another owner must not see the lead");

    let unfiltered = get_lead(&pool, inserted.id, None)
        .await
        .expect("get_lead failed");
    assert!(unfiltered.is_some(), "no owner filter sees all leads");
}

#[sqlx::test(migrations = "../../migrations")]
async fn delete_lead_reports_whether_anything_matched(pool: sqlx::PgPool) {
    let snapshot = make_snapshot("https://acme.example", "Acme Corp", 7.0);
    let inserted = insert_lead(&pool, None, &snapshot)
        .await
        .expect("insert_lead failed");

    assert!(delete_lead(&pool, inserted.id, None)
        .await
        .expect("delete_lead failed"));
    assert!(!delete_lead(&pool, inserted.id, None)
        .await
        .expect("delete_lead failed"));
    assert!(get_lead(&pool, inserted.id, None)
        .await
        .expect("get_lead failed")
        .is_none());
}

// ---------------------------------------------------------------------------
// Section 2: Listing, filtering, stats
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn list_leads_filters_and_sorts(pool: sqlx::PgPool) {
    insert_lead(&pool, None, &make_snapshot("https://acme.example", "Acme Corp", 9.0))
        .await
        .expect("insert failed");
    insert_lead(&pool, None, &make_snapshot("https://beta.example", "Beta LLC", 6.0))
        .await
        .expect("insert failed");
    let mut other = make_snapshot("https://gamma.example", "Gamma Inc", 7.5);
    other.industry = "Retail".to_string();
    insert_lead(&pool, None, &other).await.expect("insert failed");

    let by_score = list_leads(
        &pool,
        &LeadFilter {
            sort: LeadSort::ScoreHigh,
            page: 1,
            limit: 10,
            ..LeadFilter::default()
        },
    )
    .await
    .expect("list_leads failed");
    assert_eq!(by_score.len(), 3);
    assert_eq!(by_score[0].company_name, "Acme Corp");
    assert_eq!(by_score[2].company_name, "Beta LLC");

    let searched = list_leads(
        &pool,
        &LeadFilter {
            search: Some("beta".to_string()),
            page: 1,
            limit: 10,
            ..LeadFilter::default()
        },
    )
    .await
    .expect("list_leads failed");
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].company_name, "Beta LLC");

    let retail = LeadFilter {
        industry: Some("retail".to_string()),
        page: 1,
        limit: 10,
        ..LeadFilter::default()
    };
    assert_eq!(
        list_leads(&pool, &retail).await.expect("list failed").len(),
        1
    );

    let scored = LeadFilter {
        min_score: Some(7.0),
        max_score: Some(8.0),
        page: 1,
        limit: 10,
        ..LeadFilter::default()
    };
    let in_range = list_leads(&pool, &scored).await.expect("list failed");
    assert_eq!(in_range.len(), 1);
    assert_eq!(in_range[0].company_name, "Gamma Inc");
    assert_eq!(count_leads(&pool, &scored).await.expect("count failed"), 1);
}

#[sqlx::test(migrations = "../../migrations")]
async fn list_leads_paginates(pool: sqlx::PgPool) {
    for i in 0..5 {
        insert_lead(
            &pool,
            None,
            &make_snapshot(&format!("https://c{i}.example"), &format!("Company {i}"), 6.0),
        )
        .await
        .expect("insert failed");
    }

    let filter = LeadFilter {
        sort: LeadSort::Name,
        page: 2,
        limit: 2,
        ..LeadFilter::default()
    };
    let page = list_leads(&pool, &filter).await.expect("list failed");
    assert_eq!(page.len(), 2);
    assert_eq!(page[0].company_name, "Company 2");
    assert_eq!(count_leads(&pool, &filter).await.expect("count failed"), 5);
}

#[sqlx::test(migrations = "../../migrations")]
async fn lead_stats_counts_high_scores(pool: sqlx::PgPool) {
    insert_lead(&pool, None, &make_snapshot("https://a.example", "A", 9.0))
        .await
        .expect("insert failed");
    insert_lead(&pool, None, &make_snapshot("https://b.example", "B", 8.0))
        .await
        .expect("insert failed");
    insert_lead(&pool, None, &make_snapshot("https://c.example", "C", 5.0))
        .await
        .expect("insert failed");

    let stats = lead_stats(&pool, None).await.expect("lead_stats failed");
    assert_eq!(stats.total, 3);
    assert_eq!(stats.high_score_count, 2);
    let avg = stats.avg_score.expect("avg should exist");
    assert!((avg - 22.0 / 3.0).abs() < 1e-9);

    let empty = lead_stats(&pool, Some(Uuid::new_v4()))
        .await
        .expect("lead_stats failed");
    assert_eq!(empty.total, 0);
    assert!(empty.avg_score.is_none());
}

// ---------------------------------------------------------------------------
// Section 3: Updates
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn update_lead_writes_merged_snapshot_back(pool: sqlx::PgPool) {
    let inserted = insert_lead(&pool, None, &make_snapshot("https://acme.example", "Acme", 7.0))
        .await
        .expect("insert failed");

    let mut snapshot = inserted.snapshot();
    snapshot.location = "Berlin, Germany".to_string();
    snapshot.key_people.push(KeyPerson {
        name: "John Doe".to_string(),
        role: "Founder".to_string(),
        link: String::new(),
    });
    snapshot.ai_insights.rating = Some(4.9);

    let updated = update_lead(&pool, inserted.id, &snapshot)
        .await
        .expect("update_lead failed");
    assert_eq!(updated.location, "Berlin, Germany");
    assert_eq!(updated.key_people.0.len(), 2);
    assert_eq!(updated.ai_insights.0.rating, Some(4.9));
    // url is not updatable.
    assert_eq!(updated.url, "https://acme.example");
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_lead_missing_row_is_not_found(pool: sqlx::PgPool) {
    let snapshot = make_snapshot("https://acme.example", "Acme", 7.0);
    let err = update_lead(&pool, Uuid::new_v4(), &snapshot)
        .await
        .expect_err("should fail");
    assert!(matches!(err, DbError::NotFound), "got {err:?}");
}

#[sqlx::test(migrations = "../../migrations")]
async fn update_social_posts_respects_ownership(pool: sqlx::PgPool) {
    let owner = Uuid::new_v4();
    let inserted = insert_lead(&pool, Some(owner), &make_snapshot("https://acme.example", "Acme", 7.0))
        .await
        .expect("insert failed");

    let posts = SocialPosts {
        linkedin: Some("A post".to_string()),
        twitter: Some("A tweet".to_string()),
    };

    let err = update_social_posts(&pool, inserted.id, Some(Uuid::new_v4()), &posts)
        .await
        .expect_err("other owner should not update");
    assert!(matches!(err, DbError::NotFound), "got {err:?}");

    let updated = update_social_posts(&pool, inserted.id, Some(owner), &posts)
        .await
        .expect("update_social_posts failed");
    assert_eq!(updated.social_posts.0.linkedin.as_deref(), Some("A post"));
}

// ---------------------------------------------------------------------------
// Section 4: Webhook logs
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../migrations")]
async fn webhook_logs_insert_list_and_stats(pool: sqlx::PgPool) {
    let payload = serde_json::json!({ "event": "lead_analyzed", "data": { "companyName": "Acme" } });

    insert_webhook_log(&pool, "lead_analyzed", "https://hooks.example/a", &payload, "success", 120, None)
        .await
        .expect("insert log failed");
    insert_webhook_log(
        &pool,
        "high_score_lead",
        "https://hooks.example/b",
        &payload,
        "failed",
        5000,
        Some("timeout"),
    )
    .await
    .expect("insert log failed");

    let all = list_webhook_logs(&pool, None, None, 50)
        .await
        .expect("list failed");
    assert_eq!(all.len(), 2);

    let failed = list_webhook_logs(&pool, None, Some("failed"), 50)
        .await
        .expect("list failed");
    assert_eq!(failed.len(), 1);
    assert_eq!(failed[0].event, "high_score_lead");
    assert_eq!(failed[0].error_detail.as_deref(), Some("timeout"));

    let by_event = list_webhook_logs(&pool, Some("lead_analyzed"), None, 50)
        .await
        .expect("list failed");
    assert_eq!(by_event.len(), 1);
    assert_eq!(by_event[0].outcome, "success");

    let stats = webhook_stats(&pool).await.expect("stats failed");
    assert_eq!(stats.total, 2);
    assert_eq!(stats.success_count, 1);
    assert_eq!(stats.failed_count, 1);
    // Average latency covers successful deliveries only.
    let avg = stats.avg_latency_ms.expect("avg latency should exist");
    assert!((avg - 120.0).abs() < 1e-9);
}
