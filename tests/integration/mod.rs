//! Integration Tests Module
//!
//! End-to-end tests for Test Triage: record store to analysis result,
//! response parsing properties, provider construction, dashboard data, and
//! the scenario runner writing the records the analyzers read.

// Shared mock provider and fixtures
mod common;

// Record store -> engine -> parsed result
mod analysis_pipeline_test;

// Response parser properties
mod response_parser_test;

// Provider factory and configuration
mod provider_factory_test;

// Dashboard data over a written store
mod dashboard_test;

// Scenario runner feeding the analyzers
mod scenario_test;
