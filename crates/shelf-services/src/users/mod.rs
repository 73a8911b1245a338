//! User services

mod profile_picture;
mod update;

pub use profile_picture::ReplaceProfilePictureService;
pub use update::UpdateUserService;
