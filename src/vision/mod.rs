//! Google Cloud Vision API によるOCRバックエンド

mod auth;
mod client;

pub use client::VisionClient;
