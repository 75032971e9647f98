//! OTU Loader Library
//!
//! Upload pages that relay Newick trees and NexSON documents to a local
//! graph database. The server binary is in main.rs.
//!
//! # Modules
//!
//! - `upload`: submission modes, envelopes and normalizers
//! - `form`: multipart boundary parse
//! - `relay`: dispatcher producing a `RelayResult`
//! - `remote`: remote repository listing client
//! - `backend`: graph database client
//! - `html`: page templates and presenter
//! - `routes`: HTTP surface

pub mod backend;
pub mod config;
pub mod error;
pub mod form;
pub mod html;
pub mod relay;
pub mod remote;
pub mod routes;
pub mod state;
pub mod upload;

#[cfg(test)]
mod testing;
