pub mod job_handler;

pub use job_handler::{
    __path_browse_jobs, __path_create_job, __path_get_job, __path_list_my_jobs, __path_update_job,
    browse_jobs, create_job, get_job, list_my_jobs, update_job,
};
