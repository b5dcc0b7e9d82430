pub mod dashboard_handler;

pub use dashboard_handler::{
    __path_get_recruiter_dashboard, __path_get_student_dashboard, __path_get_summary,
    get_recruiter_dashboard, get_student_dashboard, get_summary,
};
