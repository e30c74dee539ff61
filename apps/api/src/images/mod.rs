//! Profile image uploads, stored under `images/` in the blob store.

pub mod handlers;
