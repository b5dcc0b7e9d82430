mod drive_service;

pub use drive_service::DriveService;
