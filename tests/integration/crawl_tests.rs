//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full harvest cycle end-to-end.

use qa_harvest::config::{Config, CrawlerConfig, FetchConfig, OutputConfig};
use qa_harvest::crawler::{harvest, render_from_checkpoint, Termination};
use qa_harvest::output::{read_csv, read_jsonl};
use qa_harvest::validate::Verdict;
use qa_harvest::{HarvestError, OutputFormat, QARecord};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use tempfile::TempDir;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration writing into `dir`
fn create_test_config(dir: &Path) -> Config {
    Config {
        crawler: CrawlerConfig {
            request_delay_ms: 0,
            respect_robots_txt: false,
            ..CrawlerConfig::default()
        },
        fetch: FetchConfig {
            max_attempts: 1,
            ..FetchConfig::default()
        },
        output: OutputConfig {
            directory: dir.display().to_string(),
            ..OutputConfig::default()
        },
        ..Config::default()
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(
        format!("<html><head><title>Test</title></head><body>{}</body></html>", body),
        "text/html",
    )
}

fn faq_entry(question: &str, answer: &str) -> String {
    format!("<div class=\"faq\"><h3>{}</h3><p>{}</p></div>", question, answer)
}

const PAGER: &str = r#"<nav class="pager">
    <a href="/faq?page=1">1</a> <a href="/faq?page=2">2</a> <a href="/faq?page=3">3</a>
</nav>"#;

const PASSWORD_Q: &str = "How do I reset my password?";
const PASSWORD_A: &str = "Open the account settings and choose the reset option.";
const EXPORT_Q: &str = "Can I export my data to a spreadsheet?";
const EXPORT_A: &str = "Yes, every report has a download button for CSV files.";

/// Mounts a three-page FAQ where page 3 repeats page 1's pair
async fn mount_paginated_faq(server: &MockServer) {
    let pages = [
        ("1", faq_entry(PASSWORD_Q, PASSWORD_A)),
        ("2", faq_entry(EXPORT_Q, EXPORT_A)),
        ("3", faq_entry(PASSWORD_Q, PASSWORD_A)),
    ];

    for (page, entry) in pages {
        Mock::given(method("GET"))
            .and(path("/faq"))
            .and(query_param("page", page))
            .respond_with(html(&format!("<h1>FAQ</h1>{}{}", entry, PAGER)))
            .mount(server)
            .await;
    }
}

fn read_qa_jsonl(path: &Path) -> Vec<QARecord> {
    read_jsonl(BufReader::new(File::open(path).unwrap())).unwrap()
}

#[tokio::test]
async fn test_paginated_faq_end_to_end() {
    let server = MockServer::start().await;
    mount_paginated_faq(&server).await;
    let dir = TempDir::new().unwrap();

    let seed = format!("{}/faq?page=1", server.uri());
    let outcome = harvest(create_test_config(dir.path()), &seed, true)
        .await
        .unwrap();

    assert_eq!(outcome.termination, Some(Termination::Exhausted));
    assert_eq!(outcome.statistics.pages_parsed(), 3);
    assert_eq!(outcome.statistics.qa_extracted, 3);
    assert_eq!(outcome.statistics.qa_accepted, 2);
    assert_eq!(outcome.statistics.duplicates_dropped(), 1);

    let records = read_qa_jsonl(&outcome.paths.qa);
    assert_eq!(records.len(), 2);
    assert_eq!(records[0].question, PASSWORD_Q);
    assert_eq!(records[0].answer, PASSWORD_A);
    assert_eq!(records[0].source, seed);
    assert_eq!(records[1].question, EXPORT_Q);

    assert_eq!(outcome.validation.total, 2);
    assert_eq!(outcome.validation.verdict, Verdict::Pass);

    // Final files supersede the checkpoint
    assert!(!dir.path().join("data_qa_intermediate.jsonl").exists());
    assert!(!dir.path().join("crawl_state.json").exists());
}

#[tokio::test]
async fn test_next_link_cycle_terminates() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/a"))
        .respond_with(html(r#"<p>First page</p><a rel="next" href="/b">Next</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/b"))
        .respond_with(html(r#"<p>Second page</p><a href="/a">Next</a>"#))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let outcome = harvest(
        create_test_config(dir.path()),
        &format!("{}/a", server.uri()),
        true,
    )
    .await
    .unwrap();

    assert_eq!(outcome.termination, Some(Termination::Exhausted));
    assert_eq!(outcome.statistics.total_pages(), 2);
    // No pairs at all is reported, not fatal
    assert_eq!(outcome.validation.verdict, Verdict::Empty);
}

#[tokio::test]
async fn test_external_links_not_followed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(
            r#"<a href="https://external.example.org/faq">Elsewhere</a> <a href="/about">About</a>"#,
        ))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/about"))
        .respond_with(html("<p>About us</p>"))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let outcome = harvest(create_test_config(dir.path()), &server.uri(), true)
        .await
        .unwrap();

    assert_eq!(outcome.statistics.total_pages(), 2);
    assert_eq!(outcome.statistics.pages_parsed(), 2);
    assert_eq!(outcome.statistics.pages_failed(), 0);
}

#[tokio::test]
async fn test_failed_page_does_not_stop_crawl() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(&format!(
            r#"{}<a href="/missing">Gone</a> <a href="/broken">Broken</a>"#,
            faq_entry(PASSWORD_Q, PASSWORD_A)
        )))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let outcome = harvest(create_test_config(dir.path()), &server.uri(), true)
        .await
        .unwrap();

    assert_eq!(outcome.statistics.total_pages(), 3);
    assert_eq!(outcome.statistics.pages_failed(), 2);
    assert_eq!(read_qa_jsonl(&outcome.paths.qa).len(), 1);
}

#[tokio::test]
async fn test_unreachable_seed_is_fatal() {
    let server = MockServer::start().await;
    let dir = TempDir::new().unwrap();

    let result = harvest(
        create_test_config(dir.path()),
        &format!("{}/nothing-here", server.uri()),
        true,
    )
    .await;

    assert!(matches!(result, Err(HarvestError::SeedUnreachable { .. })));
    assert!(!dir.path().join("data_qa.jsonl").exists());
}

#[tokio::test]
async fn test_malformed_seed_is_fatal() {
    let dir = TempDir::new().unwrap();
    let result = harvest(create_test_config(dir.path()), "not a url", true).await;
    assert!(matches!(result, Err(HarvestError::UrlError(_))));
}

#[tokio::test]
async fn test_robots_disallowed_pages_are_skipped() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/robots.txt"))
        .respond_with(
            ResponseTemplate::new(200).set_body_string("User-agent: *\nDisallow: /private\n"),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(html(r#"<a href="/private/notes">Notes</a>"#))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/private/notes"))
        .respond_with(html("<p>Should never be fetched</p>"))
        .expect(0)
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let mut config = create_test_config(dir.path());
    config.crawler.respect_robots_txt = true;

    let outcome = harvest(config, &server.uri(), true).await.unwrap();

    assert_eq!(outcome.statistics.total_pages(), 2);
    assert_eq!(outcome.statistics.pages_skipped(), 1);
}

#[tokio::test]
async fn test_checkpoint_holds_first_pages() {
    let server = MockServer::start().await;
    mount_paginated_faq(&server).await;
    let dir = TempDir::new().unwrap();

    let mut config = create_test_config(dir.path());
    config.crawler.max_pages = Some(2);
    config.output.keep_checkpoint = true;

    let seed = format!("{}/faq?page=1", server.uri());
    let outcome = harvest(config.clone(), &seed, true).await.unwrap();
    assert_eq!(outcome.termination, Some(Termination::PageLimit(2)));
    let accepted = read_qa_jsonl(&outcome.paths.qa);
    assert_eq!(accepted.len(), 2);

    // The intermediate store alone reproduces the same records
    let checkpointed = read_qa_jsonl(&dir.path().join("data_qa_intermediate.jsonl"));
    assert_eq!(checkpointed, accepted);

    config.output.format = OutputFormat::Csv;
    let rendered = render_from_checkpoint(&config).unwrap();
    assert!(rendered.paths.qa.ends_with("data_qa.csv"));
    let from_csv: Vec<QARecord> = read_csv(File::open(&rendered.paths.qa).unwrap()).unwrap();
    assert_eq!(from_csv, accepted);
}

#[tokio::test]
async fn test_resume_continues_without_duplicates() {
    let server = MockServer::start().await;
    mount_paginated_faq(&server).await;
    let dir = TempDir::new().unwrap();
    let seed = format!("{}/faq?page=1", server.uri());

    let mut first = create_test_config(dir.path());
    first.crawler.max_pages = Some(1);
    first.output.keep_checkpoint = true;
    let outcome = harvest(first, &seed, true).await.unwrap();
    assert_eq!(read_qa_jsonl(&outcome.paths.qa).len(), 1);

    let outcome = harvest(create_test_config(dir.path()), &seed, false)
        .await
        .unwrap();

    // Pages 2 and 3 only; page 3 repeats a pair accepted by the first run
    assert_eq!(outcome.statistics.total_pages(), 2);
    assert_eq!(outcome.statistics.qa_extracted, 2);
    assert_eq!(outcome.statistics.qa_accepted, 1);

    let records = read_qa_jsonl(&outcome.paths.qa);
    let questions: Vec<&str> = records.iter().map(|r| r.question.as_str()).collect();
    assert_eq!(questions, vec![PASSWORD_Q, EXPORT_Q]);
}

#[tokio::test]
async fn test_discussion_thread_output() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/forum/thread"))
        .respond_with(html(
            r#"<article>
                 <h2>Choosing a database for a small project</h2>
                 <div class="post"><p>I am starting a hobby app and want something simple.</p></div>
                 <div class="post"><p>SQLite is hard to beat for a single user.</p></div>
               </article>"#,
        ))
        .mount(&server)
        .await;
    let dir = TempDir::new().unwrap();

    let mut config = create_test_config(dir.path());
    config.output.format = OutputFormat::Txt;

    let outcome = harvest(config, &format!("{}/forum/thread", server.uri()), true)
        .await
        .unwrap();

    assert_eq!(outcome.statistics.discussions_accepted, 1);
    let text = std::fs::read_to_string(&outcome.paths.discussions).unwrap();
    assert!(text.starts_with("Title: Choosing a database for a small project\nContent: "));
    assert!(text.contains("I am starting a hobby app and want something simple.\n\nSQLite"));
}
