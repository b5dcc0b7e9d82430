mod company;

pub use company::{Company, COMPANY_COLUMNS};
