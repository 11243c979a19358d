//! Multi-tenancy: companies, roles, and which transactions a user may see.

mod company;
mod members_page;
mod provision;
mod role;
mod viewer;

pub use company::{
    Company, CompanyID, add_company_user, create_company, create_company_tables, get_company,
    get_company_id_for_user,
};
pub use members_page::{add_member_endpoint, get_members_page};
pub use provision::{add_member, register_account};
pub use role::{Role, create_profile, create_profile_table, get_role};
pub use viewer::{Owner, TransactionScope, Viewer, get_viewer};
