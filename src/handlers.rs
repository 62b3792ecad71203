pub mod auth;
pub mod companies;
pub mod complaints;
pub mod dashboard;
pub mod events;
pub mod nonconformities;
pub mod notifications;
pub mod organization;
pub mod uploads;
pub mod users;
