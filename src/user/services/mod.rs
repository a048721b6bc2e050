//! Application services for user signup and lookup.

mod user;

pub use user::{
    GetUserRequest, SignUpRequest, UserService, UserServiceError, UserServiceResult,
};
