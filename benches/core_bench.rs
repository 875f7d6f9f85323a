//! Benchmarks for template parsing, table ordering, and command rendering.
//!
//! Run with: cargo bench
//!
//! Results include 95% confidence intervals via Criterion.

use cfn2ddb::core::types::{CyclePolicy, TableResource};
use cfn2ddb::core::{codegen, parser, resolver};
use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use serde_json::{json, Map, Value};
use std::path::Path;

/// A template of `n` tables where each table depends on the one after it,
/// so the first table listed is created last.
fn chain_template(n: usize) -> Value {
    let mut resources = Map::new();
    for i in 0..n {
        let depends_on = if i + 1 < n {
            json!(format!("table{:04}", i + 1))
        } else {
            Value::Null
        };
        resources.insert(
            format!("table{i:04}"),
            json!({
                "Type": "AWS::DynamoDB::Table",
                "DependsOn": depends_on,
                "Properties": {
                    "TableName": format!("table{i:04}"),
                    "AttributeDefinitions": [{"AttributeName": "id", "AttributeType": "S"}],
                    "KeySchema": [{"AttributeName": "id", "KeyType": "HASH"}],
                    "ProvisionedThroughput": {"ReadCapacityUnits": "5", "WriteCapacityUnits": "5"}
                }
            }),
        );
    }
    json!({ "Resources": resources })
}

fn bench_yaml_parse(c: &mut Criterion) {
    let yaml = r#"
AWSTemplateFormatVersion: "2010-09-09"
Resources:
  albums:
    Type: AWS::DynamoDB::Table
    Properties:
      TableName: albums
      AttributeDefinitions:
        - AttributeName: artist
          AttributeType: S
        - AttributeName: title
          AttributeType: S
      KeySchema:
        - AttributeName: artist
          KeyType: HASH
        - AttributeName: title
          KeyType: RANGE
      GlobalSecondaryIndexes:
        - IndexName: by_title
          KeySchema:
            - AttributeName: title
              KeyType: HASH
          Projection:
            ProjectionType: ALL
          ProvisionedThroughput:
            ReadCapacityUnits: "2"
            WriteCapacityUnits: "2"
      ProvisionedThroughput:
        ReadCapacityUnits: 5
        WriteCapacityUnits: 5
  sales:
    Type: AWS::DynamoDB::Table
    DependsOn: albums
    Properties:
      TableName: !Sub "${AWS::StackName}-sales"
      AttributeDefinitions: []
      KeySchema: []
"#;

    c.bench_function("yaml_parse_template", |b| {
        b.iter(|| {
            let doc = parser::parse_template(black_box(yaml), Path::new("bench.yaml")).unwrap();
            black_box(doc);
        });
    });
}

fn bench_order(c: &mut Criterion) {
    let mut group = c.benchmark_group("order_chain");
    for n in [10, 50, 100] {
        let doc = chain_template(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &doc, |b, doc| {
            b.iter(|| {
                let order = resolver::order(black_box(doc), CyclePolicy::Truncate).unwrap();
                black_box(order.len());
            });
        });
    }
    group.finish();
}

fn bench_render(c: &mut Criterion) {
    let doc = chain_template(1);
    let body = doc["Resources"]["table0000"].as_object().unwrap();
    let table = TableResource::new("table0000", body);

    c.bench_function("render_table", |b| {
        b.iter(|| {
            let command =
                codegen::render(black_box(&table), "us-east-1", "http://localhost:8000").unwrap();
            black_box(command);
        });
    });
}

criterion_group!(benches, bench_yaml_parse, bench_order, bench_render);
criterion_main!(benches);
