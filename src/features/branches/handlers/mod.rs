pub mod branch_handler;

pub use branch_handler::{__path_create_branch, __path_list_branches, create_branch, list_branches};
