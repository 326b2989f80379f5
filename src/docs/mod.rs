//! # Docs Module
//!
//! Cache-first retrieval of shadcn-svelte documentation pages and the MCP
//! tools built on top of it.
//!
//! - [`candidates`] - Ordered URL templates per lookup kind
//! - [`retriever`] - Cache-first lookup orchestration
//! - [`discovery`] - Site map and listing of available pages
//! - [`outputs`] - Text rendering of lookup outcomes
//! - [`tools`] - Tool parameters and handlers

pub mod candidates;
pub mod discovery;
pub mod outputs;
pub mod retriever;
pub mod tools;

pub use candidates::CandidateResolver;
pub use discovery::{SiteDirectory, SiteIndex};
pub use retriever::DocRetriever;
