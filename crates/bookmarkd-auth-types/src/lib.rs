//! Auth types shared across Bookmarkd services.
//!
//! Credentials are verified by the gateway; services only read the identity it injects.

pub mod identity;
