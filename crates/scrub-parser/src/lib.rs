//! # Scrub Parser
//!
//! Partial parser for serialized scene and prefab documents. It understands
//! just enough of the format to scrub missing components:
//!
//! - [`header`] recognizes `--- !u!<class> &<id>` block headers
//! - [`block`] splits a document into header-delimited blocks
//! - [`fields`] reads single-line `key: value` fields and `{fileID: N}` references
//! - [`index`] builds the ownership index mapping entities to their components
//!
//! Anomalies never abort parsing; they are reported as [`error::Diagnostic`]s.
//!
//! ## Usage
//!
//! ```
//! use scrub_core::{document::Document, identifier::LocalId};
//! use scrub_parser::build_index;
//!
//! let source = "\
//! --- !u!1 &100
//! GameObject:
//!   m_Component:
//!   - component: {fileID: 200}
//!   - component: {fileID: 201}
//!   m_Layer: 0
//! ";
//!
//! let (index, diagnostics) = build_index(&Document::new(source));
//! assert!(diagnostics.is_empty());
//! assert_eq!(
//!     index.get(LocalId::new(100)),
//!     Some(&[LocalId::new(200), LocalId::new(201)][..])
//! );
//! ```

pub mod block;
pub mod error;
pub mod fields;
pub mod header;
pub mod index;

pub use index::{OwnershipIndex, build_index};
pub use scrub_core::span::Span;
