pub mod photo_dto;

pub use photo_dto::{
    extension_for, remaining_capacity, validate_photo, AttachPhotosResultDto, PhotoResponseDto,
    PhotoUpload, UploadPhotosDto,
};
