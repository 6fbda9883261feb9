//! API surface: request/response models and error payloads.

pub mod api;

pub use api::{
    decide_application, list_by_requester, list_by_resource, submit_application,
    DecideApplication, ErrorResponse, SubmitApplication,
};
