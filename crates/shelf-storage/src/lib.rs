//! # shelf-storage
//!
//! Object storage for Shelf RS.
//!
//! - `ObjectStorage`: bucket/path interface with public URLs
//! - `SupabaseStorage`: the hosted storage REST API
//! - `MemoryStorage`: in-process backend for tests and local development
//! - Image cropping and the profile picture upload/delete flow

pub mod crop;
pub mod memory;
pub mod profile_picture;
pub mod storage;
pub mod supabase;

pub use crop::{crop_image, CropOptions, CroppedImage};
pub use memory::{MemoryStorage, StoredObject};
pub use profile_picture::{
    profile_picture_filename, resolve_content_type, ProfilePictureService, UploadRequest,
};
pub use storage::{ObjectStorage, StorageError, StorageResult, UploadOptions};
pub use supabase::SupabaseStorage;
