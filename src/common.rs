pub mod anonymize;
pub mod attachments;
pub mod db_utils;
pub mod error;
pub mod slug;
