pub mod application_handler;

pub use application_handler::{
    __path_apply_to_job, __path_list_job_applications, __path_list_my_applications,
    __path_update_application_status, __path_withdraw_application, apply_to_job,
    list_job_applications, list_my_applications, update_application_status,
    withdraw_application,
};
