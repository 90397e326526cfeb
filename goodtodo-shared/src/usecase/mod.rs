/// Use-case interactors
///
/// Each interactor orchestrates repositories and services for one area:
///
/// - [`AuthInteractor`]: registration, login, email verification, token refresh
/// - [`UserInteractor`]: the caller's own profile
/// - [`TodoInteractor`]: todo CRUD with ownership checks
///
/// Protected operations take the authenticated [`crate::auth::Principal`]
/// explicitly; its tenant id scopes every repository call.
pub mod auth;
pub mod error;
pub mod todo;
pub mod user;

pub use auth::{
    AuthInteractor, LoginInput, LoginOutput, RefreshOutput, RegisterInput, RegisterOutput,
    VerifyEmailOutput,
};
pub use error::{UseCaseError, UseCaseResult};
pub use todo::{CreateTodoInput, TodoInteractor, UpdateTodoInput};
pub use user::{UpdateMeInput, UserInteractor};
