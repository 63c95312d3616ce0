//! The ring layer built on top of tokio's [io_uring] crate. This module exposes the
//! [RingFacility] contract that the [crate::Manager] drives along with [Uring], the binding of
//! that contract to a real `io_uring` instance.
//!
//! Alongside the facility itself live the value types that cross it:
//! - [Token], the correlation tag stamped into every submission's `user_data`.
//! - [Buffer], the heap memory a read lands in or a write is sourced from.
//! - [CompletionEvent], one raw completion queue entry.
//! - [Completion], the typed outcome handed back to callers once a completion is consumed.

mod buffer;
mod config;
mod error;
pub(crate) mod facility;
mod result;
mod ring;
mod token;

pub use buffer::Buffer;
pub use config::{RingConfig, RingConfigBuilder};
pub use error::{Error, Result};
pub use facility::{CompletionEvent, RingFacility};
pub use result::{Completion, ReadResult, WriteResult};
pub use ring::Uring;
pub use token::Token;
