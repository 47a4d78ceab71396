//! # scout-drive
//!
//! Saves a research run to Google Drive.
//!
//! [`PersistenceLayer`] resolves the root and per-run company folders and
//! writes the overview, competitor list and extracted articles through a
//! [`StorageApi`]. [`DriveClient`] is the Drive v3 implementation.

pub mod api;
pub mod client;
pub mod error;
pub mod persist;

pub use api::{FOLDER_MIME_TYPE, StorageApi, UploadedFile};
pub use client::DriveClient;
pub use error::{PersistError, StorageError};
pub use persist::PersistenceLayer;
