//! Effect Studio
//!
//! Client for a hosted image/video effects service. An image is uploaded to
//! object storage through a pre-signed URL, a generation job is submitted
//! for it, and the job is polled until a result can be rendered and
//! downloaded. The UI layer plugs in through [`presenter::Presenter`].

pub mod app_state;
pub mod config;
pub mod error;
pub mod models;
pub mod presenter;
pub mod services;
pub mod workflow;
