pub mod setting_dto;

pub use setting_dto::{SetSettingDto, SettingResponseDto};
