pub mod student_handler;

pub use student_handler::{
    __path_download_my_resume, __path_download_student_resume, __path_get_my_profile,
    __path_upload_resume, __path_upsert_my_profile, download_my_resume, download_student_resume,
    get_my_profile, upload_resume, upsert_my_profile,
};
