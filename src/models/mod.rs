pub mod question;
pub mod result;
pub mod word;
