//! Object storage for report photos
//!
//! MinIO/S3-compatible bucket client plus the AWS Signature v4 signer used
//! for the bucket-policy call that rust-s3 does not cover.

mod object_store;
mod sigv4;

pub use object_store::ObjectStore;
