pub mod admin_handlers;

pub use admin_handlers::{
    __path_get_admin_dashboard, __path_get_statistics, __path_list_students,
    __path_update_student_placement, get_admin_dashboard, get_statistics, list_students,
    update_student_placement,
};
