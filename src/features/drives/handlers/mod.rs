pub mod drive_handler;

pub use drive_handler::{
    __path_add_drive_company, __path_create_drive, __path_get_drive, __path_list_active_drives,
    __path_list_all_drives, __path_remove_drive_company, __path_set_drive_active,
    add_drive_company, create_drive, get_drive, list_active_drives, list_all_drives,
    remove_drive_company, set_drive_active,
};
