pub mod company_handler;

pub use company_handler::{
    __path_create_company, __path_list_all_companies, __path_list_approved_companies,
    __path_list_my_companies, __path_set_company_approval, __path_update_company, create_company,
    list_all_companies, list_approved_companies, list_my_companies, set_company_approval,
    update_company,
};
