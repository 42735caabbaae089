//! Survey Synth - synthetic survey responses from schema documents.
//!
//! This crate flattens nested survey schemas (multiple-choice, free-text and
//! matrix questions) into flat question records, answers each record with an
//! LLM acting as a respondent, and records the answers per session.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
