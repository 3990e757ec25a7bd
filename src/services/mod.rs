//! Upstream integrations
//!
//! Email relay, country list and GitHub projects. Content operations live on
//! the storage backend and are called directly by the CMS handlers.

pub mod contact;
pub mod countries;
pub mod github;
pub mod http;

pub use contact::{
    ContactReceipt, ContactRequest, ContactService, HttpMailer, MailTransport, OutgoingEmail,
};
pub use countries::{CountriesService, Country, transform_countries};
pub use github::GithubService;
