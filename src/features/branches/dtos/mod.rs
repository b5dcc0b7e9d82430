mod branch_dto;

pub use branch_dto::*;
