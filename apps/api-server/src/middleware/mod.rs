//! Middleware modules.

pub mod admission;

pub use admission::AdmissionMiddleware;
