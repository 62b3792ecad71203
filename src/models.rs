pub mod auth;
pub mod company;
pub mod complaint;
pub mod dashboard;
pub mod event;
pub mod nc_workflow;
pub mod nonconformity;
pub mod organization;
