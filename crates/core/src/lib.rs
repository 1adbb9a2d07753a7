//! s3kit-core: Core library for s3kit
//!
//! This crate provides the SDK-independent parts of s3kit:
//! - Object-store URI parsing
//! - Local naming for downloads, including batch collision handling
//! - Configuration and profile management
//! - ObjectStore trait and the transfer helpers built on it
//! - Scratch working directories

pub mod config;
pub mod error;
pub mod naming;
pub mod profile;
pub mod traits;
pub mod transfer;
pub mod uri;
pub mod workdir;

pub use config::{Config, ConfigManager};
pub use error::{Error, Result};
pub use naming::{base_name, resolve_batch_names, NameRegistry, ResolvedName};
pub use profile::{Profile, ProfileManager};
pub use traits::{ObjectInfo, ObjectStore};
pub use transfer::{KeyFilter, Transfer, TransferOptions};
pub use uri::{parse, ObjectPath};
pub use workdir::{delete_working_dir, generate_working_dir};
