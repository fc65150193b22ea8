//! End-to-end: ingest files, then query them over HTTP

mod common;

use anyhow::Result;
use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use common::{memory_store, pipeline, write_vcf, TestDirs};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use vcfdb_server::{api::create_router, config::Config};

async fn get_json(app: axum::Router, uri: &str, key: Option<&str>) -> Result<(StatusCode, Value)> {
    let mut request = Request::builder().uri(uri);
    if let Some(key) = key {
        request = request.header("X-API-Key", key);
    }

    let response = app.oneshot(request.body(Body::empty())?).await?;
    let status = response.status();
    let bytes = response.into_body().collect().await?.to_bytes();
    Ok((status, serde_json::from_slice(&bytes)?))
}

#[tokio::test]
async fn test_ingested_variants_are_queryable() -> Result<()> {
    let store = memory_store().await?;
    let dirs = TestDirs::new()?;

    write_vcf(&dirs.raw, "s1.vcf", "sample1", &[("chr1", 100, "A", "G", "0/1:30:99")])?;
    write_vcf(&dirs.raw, "s2.vcf", "sample2", &[("chr1", 100, "A", "G", "1/1:12:40")])?;
    write_vcf(&dirs.raw, "s3.vcf", "sample3", &[("chr9", 7, "T", "A", "0/1")])?;
    let report = pipeline(&store, &dirs, "v1").run_batch().await?;
    assert_eq!(report.inserted(), 3);

    let mut config = Config::default();
    config.auth.api_key = Some("k".to_string());
    let app = create_router(store, &config);

    let (status, body) = get_json(app.clone(), "/variant_public?chr=chr1&pos=100", None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({
            "chr": "chr1",
            "pos": 100,
            "count": 2,
            "distinct_files": 3,
            "heterozygous": 1,
            "homozygous": 1,
            "other_genotypes": 0
        })
    );

    let (status, body) = get_json(app.clone(), "/variant?chr=chr1&pos=100", Some("k")).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 2);

    let (status, body) = get_json(app, "/variant?chr=chr1&pos=100", Some("wrong")).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["success"], false);

    Ok(())
}
