//! Integration tests for QA-Harvest

mod crawl_tests;
