//! Integration tests for ADS Metrics
//!
//! These tests drive the fetch, normalize, aggregate and export pipeline end
//! to end, against the mock source and a local mock HTTP server.

use ads_metrics::config::ApiConfig;
use ads_metrics::metrics::{
    align, fetch_all, normalize, parse_bibcodes, parse_records, publication_counts,
    publication_histogram, time_series, MetricsError, Normalized, RawPayload,
};
use ads_metrics::models::{IndicatorSet, Library, LibraryContents, PivotField, YearSeries};
use ads_metrics::sources::{AdsClient, MockSource, Resource, LIBRARY_PAGE_SIZE};
use ads_metrics::utils::{self, ProgressReporter};
use mockito::Matcher;
use serde_json::{json, Value};
use std::collections::BTreeMap;
use tokio_util::sync::CancellationToken;

fn article(i: usize) -> Value {
    let year = 2015 + (i % 5);
    json!({
        "bibcode": format!("{}ApJ..{:03}A", year, i),
        "year": year.to_string(),
        "property": if i % 2 == 0 { json!(["REFEREED", "ARTICLE"]) } else { json!(["NOT REFEREED"]) },
        "citation_count": (i % 7) as u64,
        "read_count": (i * 3) as u64,
    })
}

async fn fetch(source: &MockSource, total: usize, page_size: usize) -> Result<Vec<Value>, MetricsError> {
    fetch_all(
        source,
        &Resource::records("orcid:0000-0001-2345-6789"),
        total,
        page_size,
        &ProgressReporter::quiet("test", 0),
        &CancellationToken::new(),
    )
    .await
}

#[tokio::test]
async fn test_paginated_fetch_covers_every_offset() {
    let source = MockSource::with_documents(55);
    let items = fetch(&source, 55, 25).await.unwrap();

    assert_eq!(items.len(), 55);
    let requests = source.requests();
    assert_eq!(requests.len(), 3);
    assert_eq!(
        requests.iter().map(|p| p.start).collect::<Vec<_>>(),
        vec![0, 25, 50]
    );
    assert!(requests.iter().all(|p| p.rows == 25 && p.total == 55));
}

#[tokio::test]
async fn test_records_pipeline() {
    let source = MockSource::new((0..40).map(article).collect());
    let docs = fetch(&source, 40, 15).await.unwrap();
    let records = parse_records(&docs).unwrap();
    assert_eq!(records.len(), 40);
    assert_eq!(records[0].bibcode, "2015ApJ..000A");

    let counts = publication_counts(&records);
    assert_eq!(counts.years, vec![2015, 2016, 2017, 2018, 2019]);
    assert_eq!(counts.total.iter().sum::<u64>(), 40);
    assert_eq!(counts.refereed.iter().sum::<u64>(), 20);

    let series: YearSeries = counts.into();
    let path = series.step("total", 1.0, false).unwrap().unwrap();
    assert_eq!(path.len(), 2 * series.len() + 2);
    assert_eq!(path.x.last(), Some(&2020.0));

    let all = IndicatorSet::from_records(&records, 2020);
    let refereed = IndicatorSet::refereed_from_records(&records, 2020);
    assert_eq!(all.paper_count, 40);
    assert_eq!(refereed.paper_count, 20);
    assert!(refereed.h <= all.h);
    assert!(all.h <= 6);
}

#[tokio::test]
async fn test_library_export_round_trip() {
    let bibcodes: Vec<Value> = (0..30).map(|i| json!(format!("2020Lib{:02}", i))).collect();
    let source = MockSource::new(bibcodes);

    let docs = fetch_all(
        &source,
        &Resource::Library("abc123".to_string()),
        30,
        LIBRARY_PAGE_SIZE,
        &ProgressReporter::quiet("library", 2),
        &CancellationToken::new(),
    )
    .await
    .unwrap();
    assert_eq!(source.requests().len(), 2);

    let contents = LibraryContents {
        library: Library {
            id: "abc123".to_string(),
            name: "Thesis, chapter 2".to_string(),
            num_documents: 30,
            description: String::new(),
        },
        bibcodes: parse_bibcodes(&docs).unwrap(),
    };

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("libraries.csv");
    utils::save_libraries(&path, &[contents]).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let mut lines = content.lines();
    assert_eq!(lines.next(), Some("#name,num_documents,bibcodes"));
    let row = lines.next().unwrap();
    assert!(row.starts_with("Thesis; chapter 2,30,2020Lib00\t2020Lib01"));
    assert_eq!(row.matches('\t').count(), 29);
}

#[test]
fn test_facet_round_trip_with_only_refereed() {
    let entries = vec![json!({
        "value": "refereed",
        "count": 3,
        "pivot": [{"field": "year", "value": "2020", "count": 3}]
    })];

    let series = match normalize(RawPayload::FacetPivot {
        field: PivotField::Year,
        entries,
    })
    .unwrap()
    {
        Normalized::Series(series) => series,
        other => panic!("expected series, got {:?}", other),
    };

    assert_eq!(series.value_at("refereed", 2020), Some(3.0));
    assert_eq!(series.value_at("unrefereed", 2020), Some(0.0));
}

#[test]
fn test_align_twice_is_stable() {
    let first = align([
        ("a", BTreeMap::from([(2019, 3.0)])),
        ("b", BTreeMap::from([(2020, 5.0)])),
    ]);
    assert_eq!(first.years(), &[2019, 2020]);
    assert_eq!(first.channel("a"), Some(&[3.0, 0.0][..]));
    assert_eq!(first.channel("b"), Some(&[0.0, 5.0][..]));

    let again = align(first.channels().iter().map(|c| {
        (
            c.name.clone(),
            first
                .years()
                .iter()
                .copied()
                .zip(c.values.iter().copied())
                .collect::<BTreeMap<_, _>>(),
        )
    }));
    assert_eq!(first, again);
}

#[test]
fn test_facet_exports() {
    let citations = match normalize(RawPayload::FacetPivot {
        field: PivotField::CitationCount,
        entries: vec![
            json!({"value": "refereed", "pivot": [{"value": "12", "count": 1}, {"value": "3", "count": 2}]}),
            json!({"value": "notrefereed", "pivot": [{"value": "1", "count": 1}]}),
        ],
    })
    .unwrap()
    {
        Normalized::Distribution(values) => values,
        other => panic!("expected distribution, got {:?}", other),
    };
    assert_eq!(citations, vec![12, 3, 3, 1]);

    let indicators = IndicatorSet::from_counts(&citations, &[5, 5, 5, 5]);
    assert_eq!(indicators.h, 3);
    assert_eq!(indicators.m, 0.0);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("citation_count.csv");
    utils::save_distribution(&path, "citation_count", &citations).unwrap();
    assert_eq!(
        std::fs::read_to_string(&path).unwrap(),
        "#index,citation_count\n0,12\n1,3\n2,3\n3,1\n"
    );
}

#[tokio::test]
async fn test_metrics_endpoint_to_exports() {
    let mut server = mockito::Server::new_async().await;
    let body = json!({
        "basic stats": {"number of papers": 3, "normalized paper count": 1.5},
        "basic stats refereed": {"number of papers": 2},
        "indicators": {"h": 2, "m": 0.25, "read10": 4.2},
        "histograms": {
            "publications": {
                "all publications": {"2018": 1, "2019": 0, "2020": 2},
                "refereed publications": {"2018": 1, "2020": 1}
            }
        },
        "time series": {
            "h": {"2019": 1, "2020": 2},
            "read10": {"2019": 20, "2020": 35}
        }
    });
    let _mock = server
        .mock("POST", "/metrics")
        .match_header("authorization", "Bearer integration")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .create_async()
        .await;

    let config = ApiConfig {
        endpoint: server.url(),
        token: Some("integration".to_string()),
        ..ApiConfig::default()
    };
    let client = AdsClient::new(&config).unwrap();
    let raw = client
        .metrics(&["2018A".to_string(), "2020B".to_string(), "2020C".to_string()])
        .await
        .unwrap();

    let publications = publication_histogram(&raw).unwrap();
    assert_eq!(publications.years(), &[2018, 2019, 2020]);
    assert_eq!(
        publications.channel("refereed publications"),
        Some(&[1.0, 0.0, 1.0][..])
    );

    let indices = time_series(&raw).unwrap();
    assert_eq!(indices.channel("read10"), Some(&[2.0, 3.5][..]));

    let summary: ads_metrics::models::MetricsSummary = serde_json::from_value(raw).unwrap();
    let dir = tempfile::tempdir().unwrap();
    utils::save_series(&dir.path().join("publications.csv"), &publications).unwrap();
    utils::save_summary(&dir.path().join("metrics.txt"), &summary).unwrap();

    let csv = std::fs::read_to_string(dir.path().join("publications.csv")).unwrap();
    assert_eq!(
        csv,
        "#year,all publications,refereed publications\n2018,1,1\n2019,0,0\n2020,2,1\n"
    );
    let text = std::fs::read_to_string(dir.path().join("metrics.txt")).unwrap();
    assert!(text.lines().any(|l| l.starts_with("h-index") && l.contains('2')));
}

#[tokio::test]
async fn test_transport_failure_aborts_fetch() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/search/query")
        .match_query(Matcher::Any)
        .with_status(500)
        .with_body("Internal Server Error")
        .create_async()
        .await;

    let config = ApiConfig {
        endpoint: server.url(),
        token: Some("integration".to_string()),
        ..ApiConfig::default()
    };
    let client = AdsClient::new(&config).unwrap();
    let result = fetch_all(
        &client,
        &Resource::records("star"),
        10,
        5,
        &ProgressReporter::quiet("test", 2),
        &CancellationToken::new(),
    )
    .await;

    assert!(matches!(result, Err(MetricsError::Transport(_))));
}
