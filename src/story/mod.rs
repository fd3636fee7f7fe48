//! Request side of the story generation endpoint: body parsing,
//! validation, and the error envelope shared by the HTTP handlers.

pub mod error;
pub mod request;

pub use error::{require_method, ApiError, ErrorBody};
pub use request::{StoryLength, StoryRequest, ValidatedStoryRequest};
