pub mod attachment_service;
pub mod auth;
pub mod company_service;
pub mod complaint_service;
pub mod nonconformity_service;
