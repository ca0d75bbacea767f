//! # speech-analysis-client
//!
//! HTTP backend for `speech-capture-core`'s analysis boundary.
//!
//! Implements [`speech_capture_core::AnalysisClient`] with a blocking
//! multipart upload to one of the three analysis endpoints (general
//! feature extraction, vowel formants, diadochokinetic timing) and parses
//! the per-endpoint result shapes.
//!
//! ## Usage
//! ```ignore
//! use speech_analysis_client::HttpAnalysisClient;
//! use speech_capture_core::{CaptureSession, SessionConfig};
//! use std::sync::Arc;
//!
//! let client = HttpAnalysisClient::new("http://localhost:8000")?;
//! let mut session = CaptureSession::new(provider, SessionConfig::default());
//! session.set_analysis_client(Arc::new(client));
//! ```

pub mod client;

pub use client::HttpAnalysisClient;
