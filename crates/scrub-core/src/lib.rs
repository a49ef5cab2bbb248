//! Scrub Core Types and Definitions
//!
//! This crate provides the foundational types shared by the Scrub crates:
//!
//! - **Identifiers**: Per-document object identifiers ([`identifier::LocalId`])
//! - **Documents**: Line-oriented, byte-faithful views of serialized documents ([`document`] module)
//! - **Spans**: Byte ranges into document sources ([`span::Span`])
//! - **Graph**: The live object graph oracle and an in-memory implementation ([`graph`] module)

pub mod document;
pub mod graph;
pub mod identifier;
pub mod span;
