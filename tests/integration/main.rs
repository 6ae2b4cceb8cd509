//! Integration tests

mod support;

mod collector_test;
mod config_test;
mod http_test;
