//! cfn2ddb - CloudFormation DynamoDB tables to DynamoDB Local.
//!
//! Loads a JSON or YAML template, orders its `AWS::DynamoDB::Table`
//! resources so every `DependsOn` target comes first, and renders one
//! `aws dynamodb create-table` command per table.

pub mod cli;
pub mod core;
