//! Resume CRUD, PDF export and the template catalog endpoints.

pub mod handlers;
