pub mod client;
pub mod request;

pub use client::{HarmonyClient, JobId, JobService, JobStatus};
pub use request::{BoundingBox, ExtractionRequest};
