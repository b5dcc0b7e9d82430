mod drive_dto;

pub use drive_dto::*;
