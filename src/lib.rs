//! `lumberjack` — interactive alignment of text fragments with an audio
//! recording.
//!
//! This crate provides:
//! - Document-order extraction of annotatable units from an EPUB3 package or
//!   a bare (TEI) XML document
//! - An interactive synchronization session that turns keypresses into an
//!   append-only, crash-safe timestamp log
//! - Generators that convert a completed log into EPUB3 Media-Overlay (SMIL)
//!   documents or a single TEI timeline document
//!
//! The library is designed to be used by the CLI and by tests alike: audio
//! playback and terminal input sit behind traits, and the log file is the
//! durable contract between the session and the generators.

// High-level API (most consumers should start here).
pub mod lumberjack;
pub mod opts;

// Unit extraction from the input container.
pub mod indexer;
pub mod unit;

// The durable log: record format and store.
pub mod log_store;
pub mod record;

// The interactive session and its collaborators.
pub mod audio;
pub mod input;
pub mod session;

// Output selection and the log-to-document generators.
pub mod output_type;
pub mod smil_encoder;
pub mod tei_encoder;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

mod xml_text;

pub mod error;
pub use error::{Error, Result};
