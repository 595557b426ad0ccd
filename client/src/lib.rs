// src/lib.rs

//! Client side of Stockroom.
//!
//! Records enter through [`ingest`] (a CSV file) or [`entry`] (one hand-typed
//! record). Both validate every row with the shared rules from
//! `stockroom_core::schema` and hand a batch to a [`BatchSubmitter`]; the
//! [`store::ProductStoreClient`] is the submitter that talks to the API.

pub mod entry;
pub mod identity;
pub mod ingest;
pub mod rows;
pub mod store;
pub mod table;

pub use entry::{EntryError, EntryForm};
pub use identity::{IdentityError, IdentityStore};
pub use ingest::{CsvIngestor, CsvUpload, IngestError, IngestReport};
pub use rows::TextRow;
pub use store::{BatchSubmitter, ProductStoreClient, StoreError};
pub use table::{paginate, render_page, Page};

/// API location used when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:4000/api/v1";
