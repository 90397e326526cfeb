/// Database models
///
/// Each model owns its SQL. Functions take any [`sqlx::PgExecutor`] so callers
/// can run them on the pool or inside a tenant-scoped transaction.
///
/// - [`tenant::Tenant`]: isolated organization namespace
/// - [`user::User`]: a person within a tenant
/// - [`todo::Todo`]: a todo item owned by a user
pub mod tenant;
pub mod todo;
pub mod user;

pub use tenant::{NewTenant, Tenant};
pub use todo::{NewTodo, Todo};
pub use user::{NewUser, User, UserRole};
