//! Integration tests for history reconstruction
//!
//! These tests use wiremock to stand in for both the capture index and the
//! capture store, and run the archive client and coordinator end-to-end.

use robots_history::archive::{
    build_http_client, CaptureQuery, FetchOutcome, SnapshotIndex, SnapshotSource,
};
use robots_history::config::UserAgentConfig;
use robots_history::history::{Coordinator, Limit, Mode, NoProgress, PipelineOptions, SelectionPolicy};
use robots_history::output::JsonDirectorySink;
use robots_history::robots::{render_robots, AgentRules, Directive, RuleSet};
use robots_history::{HistoryError, SnapshotId, WaybackClient};
use std::sync::Arc;
use tempfile::TempDir;
use wiremock::matchers::{method, path, path_regex, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const SITE: &str = "https://example.com";

fn create_client(server: &MockServer) -> WaybackClient {
    let client = build_http_client(&UserAgentConfig::default(), 5).expect("Failed to build client");
    WaybackClient::new(
        client,
        format!("{}/cdx", server.uri()),
        format!("{}/web", server.uri()),
    )
}

fn create_coordinator(server: &MockServer, policy: SelectionPolicy) -> Coordinator<WaybackClient> {
    Coordinator::new(
        create_client(server),
        policy,
        PipelineOptions {
            workers: 4,
            keep_raw: true,
        },
    )
    .with_progress(Arc::new(NoProgress))
}

fn unlimited() -> SelectionPolicy {
    SelectionPolicy {
        limit: Limit::Unlimited,
        recent: false,
        year: None,
    }
}

/// Builds a CDX JSON response listing the given timestamps
fn cdx_body(timestamps: &[&str]) -> String {
    let mut rows = vec![r#"["timestamp"]"#.to_string()];
    rows.extend(timestamps.iter().map(|ts| format!(r#"["{}"]"#, ts)));
    format!("[{}]", rows.join(","))
}

async fn mount_index(server: &MockServer, timestamps: &[&str]) {
    Mock::given(method("GET"))
        .and(path("/cdx"))
        .and(query_param("url", "https://example.com/robots.txt"))
        .respond_with(ResponseTemplate::new(200).set_body_string(cdx_body(timestamps)))
        .mount(server)
        .await;
}

async fn mount_capture(server: &MockServer, timestamp: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path_regex(format!(r"^/web/{}if_/", timestamp)))
        .respond_with(ResponseTemplate::new(200).set_body_string(body.to_string()))
        .mount(server)
        .await;
}

fn agent(name: &str, paths: &[(&str, Directive)]) -> (String, RuleSet) {
    let set = paths
        .iter()
        .map(|(path, directive)| (format!("{}{}", SITE, path), *directive))
        .collect();
    (name.to_string(), set)
}

fn rules(agents: Vec<(String, RuleSet)>) -> AgentRules {
    agents.into_iter().collect()
}

#[tokio::test]
async fn test_index_query_parameters() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cdx"))
        .and(query_param("url", "https://example.com/robots.txt"))
        .and(query_param("output", "json"))
        .and(query_param("fl", "timestamp"))
        .and(query_param("filter", "statuscode:200"))
        .and(query_param("collapse", "digest"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_string(cdx_body(&["20200101000000", "20210101000000"])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let captures = create_client(&server)
        .list_captures(&CaptureQuery::all(SITE))
        .await
        .expect("Index lookup failed");

    assert_eq!(
        captures,
        vec![
            SnapshotId::new("20200101000000"),
            SnapshotId::new("20210101000000")
        ]
    );
}

#[tokio::test]
async fn test_recent_mode_sends_negative_limit() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cdx"))
        .and(query_param("limit", "-3"))
        .respond_with(ResponseTemplate::new(200).set_body_string(cdx_body(&["20230101000000"])))
        .expect(1)
        .mount(&server)
        .await;

    let captures = create_client(&server)
        .list_captures(&CaptureQuery::most_recent(SITE, 3))
        .await
        .expect("Index lookup failed");

    assert_eq!(captures.len(), 1);
}

#[tokio::test]
async fn test_year_mode_sends_range() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cdx"))
        .and(query_param("from", "20190101000000"))
        .and(query_param("to", "20191231235959"))
        .respond_with(ResponseTemplate::new(200).set_body_string("[]"))
        .expect(1)
        .mount(&server)
        .await;

    let query = CaptureQuery::for_year(SITE, 2019).expect("Valid year");
    let captures = create_client(&server)
        .list_captures(&query)
        .await
        .expect("Index lookup failed");

    assert!(captures.is_empty());
}

#[tokio::test]
async fn test_capture_fetch_outcomes() {
    let server = MockServer::start().await;
    mount_capture(&server, "20200101000000", "User-agent: *\nDisallow: /a\n").await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/web/20200201000000if_/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let client = create_client(&server);

    let found = client
        .fetch_snapshot(&SnapshotId::new("20200101000000"), SITE)
        .await;
    assert_eq!(
        found,
        FetchOutcome::Content("User-agent: *\nDisallow: /a\n".to_string())
    );

    let missing = client
        .fetch_snapshot(&SnapshotId::new("20200201000000"), SITE)
        .await;
    assert!(matches!(missing, FetchOutcome::Unavailable { .. }));
}

#[tokio::test]
async fn test_missing_capture_is_dropped_from_paths() {
    let server = MockServer::start().await;
    mount_index(&server, &["20200101000000", "20200201000000", "20200301000000"]).await;
    mount_capture(&server, "20200101000000", "User-agent: *\nDisallow: /a\n").await;
    mount_capture(&server, "20200301000000", "User-agent: *\nDisallow: /c\n").await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/web/20200201000000if_/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;

    let paths = create_coordinator(&server, unlimited())
        .collect_paths(SITE)
        .await
        .expect("History lookup failed");

    let paths: Vec<&str> = paths.iter().map(String::as_str).collect();
    assert_eq!(paths, vec!["https://example.com/a", "https://example.com/c"]);
}

#[tokio::test]
async fn test_index_failure_reports_site() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/cdx"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let result = create_coordinator(&server, unlimited())
        .collect_paths(SITE)
        .await;

    match result {
        Err(HistoryError::IndexLookup { site, .. }) => assert_eq!(site, SITE),
        other => panic!("Expected IndexLookup error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_timeline_end_to_end() {
    let server = MockServer::start().await;

    let first = rules(vec![agent("*", &[("/private", Directive::Disallow)])]);
    let second = rules(vec![
        agent("*", &[("/private", Directive::Allow)]),
        agent("BadBot", &[("/", Directive::Disallow)]),
    ]);
    let third = second.clone();
    let fourth = rules(vec![agent(
        "*",
        &[("/private", Directive::Allow), ("/tmp", Directive::Disallow)],
    )]);

    let captures = [
        ("20180101000000", render_robots(&first)),
        ("20190101000000", render_robots(&second)),
        ("20200101000000", render_robots(&third)),
        ("20210101000000", render_robots(&fourth)),
    ];

    let timestamps: Vec<&str> = captures.iter().map(|(ts, _)| *ts).collect();
    mount_index(&server, &timestamps).await;
    for (ts, body) in &captures {
        mount_capture(&server, ts, body).await;
    }

    let timeline = create_coordinator(&server, unlimited())
        .build_timeline(SITE)
        .await
        .expect("Timeline failed");

    let events: Vec<&str> = timeline.events.iter().map(|e| e.snapshot.as_str()).collect();
    assert_eq!(events, vec!["20180101000000", "20190101000000", "20210101000000"]);

    let initial = &timeline.events[0];
    assert!(initial.initial);
    assert_eq!(initial.agents_added[0].diff.added_disallow, vec!["https://example.com/private"]);

    let flip = &timeline.events[1];
    assert_eq!(flip.agents_added[0].user_agent, "BadBot");
    let diff = &flip.rule_changes[0].diff;
    assert_eq!(diff.added_allow, vec!["https://example.com/private"]);
    assert_eq!(diff.removed_disallow, vec!["https://example.com/private"]);

    let last = &timeline.events[2];
    assert_eq!(last.agents_removed, vec!["BadBot"]);
    assert_eq!(last.rule_changes[0].diff.added_disallow, vec!["https://example.com/tmp"]);

    assert_eq!(timeline.raw_captures.len(), 3);
}

#[tokio::test]
async fn test_bounded_selection_fetches_sampled_captures() {
    let server = MockServer::start().await;
    let timestamps: Vec<String> = (0..10).map(|i| format!("20{:02}0101000000", i + 10)).collect();
    let borrowed: Vec<&str> = timestamps.iter().map(String::as_str).collect();
    mount_index(&server, &borrowed).await;

    Mock::given(method("GET"))
        .and(path_regex(r"^/web/\d{14}if_/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /\n"))
        .expect(4)
        .mount(&server)
        .await;

    let policy = SelectionPolicy {
        limit: Limit::Max(4),
        recent: false,
        year: None,
    };
    let timeline = create_coordinator(&server, policy)
        .build_timeline(SITE)
        .await
        .expect("Timeline failed");

    // Identical captures collapse into the initial event
    assert_eq!(timeline.events.len(), 1);
    assert_eq!(timeline.events[0].snapshot.as_str(), "20100101000000");
}

#[tokio::test]
async fn test_run_writes_json_and_continues_after_failure() {
    let server = MockServer::start().await;
    mount_index(&server, &["20200101000000"]).await;
    mount_capture(&server, "20200101000000", "User-agent: *\nDisallow: /a\n").await;

    Mock::given(method("GET"))
        .and(path("/cdx"))
        .and(query_param("url", "https://down.example/robots.txt"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let temp = TempDir::new().expect("Failed to create temp dir");
    let sink = JsonDirectorySink::new(temp.path());

    let summary = create_coordinator(&server, unlimited())
        .run(["down.example", "example.com"], Mode::Timeline, &sink)
        .await;

    assert_eq!(summary.processed, 1);
    assert_eq!(summary.failed.len(), 1);
    assert_eq!(summary.failed[0].0, "https://down.example");

    let dir = temp.path().join("example.com");
    assert!(dir.join("timeline.json").exists());
    assert!(dir.join("robots_20200101000000.txt").exists());
    assert!(!temp.path().join("down.example").exists());
}
