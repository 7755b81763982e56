#![doc = "azkit-core: core utility library for azkit."]

//! This crate contains the reusable logic behind the `azkit` CLI: document
//! projection, blob storage, environment lookups, sample data, manifest
//! parsing and timezone helpers.
//!
//! # Usage
//! Add this as a dependency for any tool that filters documents or moves
//! them in and out of blob storage. The CLI crate only adds argument parsing,
//! config loading and tracing setup on top.

pub mod app;
pub mod contract;
pub mod data_gen;
pub mod doc_filter;
pub mod env;
pub mod local_store;
pub mod pyproject;
pub mod storage;
pub mod tz;

pub use doc_filter::{DocFilter, Document, FilterConfig, FilterError};
