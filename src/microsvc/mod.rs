//! microsvc: convention-based command handler framework.
//!
//! A `Service<L>` routes named commands to handler functions. Each handler
//! receives a `Context<L>` with the input payload, the session variables and
//! the lifecycle the service was built around. The dataset registry's own
//! handlers live in [`crate::handlers`].
//!
//! ## Handler Convention
//!
//! ```ignore
//! // src/handlers/dataset_get.rs
//!
//! pub const COMMAND: &str = "dataset.get";
//!
//! pub fn guard<L>(ctx: &Context<L>) -> bool {
//!     ctx.has_fields(&["name"])
//! }
//!
//! pub fn handle<S: MetadataStore, C: DatasetCache + 'static>(
//!     ctx: &Context<DatasetLifecycle<S, C>>,
//! ) -> Result<Value, HandlerError> {
//!     let input = ctx.input::<NameInput>()?;
//!     Ok(serde_json::to_value(ctx.lifecycle().get(&input.name)?)?)
//! }
//! ```

mod context;
mod error;
mod service;
mod session;

pub use context::Context;
pub use error::HandlerError;
pub use service::{CommandRequest, CommandResponse, Service};
pub use session::{Session, IDENTITY_VAR};

// HTTP transport (requires "http" feature)
#[cfg(feature = "http")]
mod http;
#[cfg(feature = "http")]
pub use http::{router, serve};

/// Register handler modules with a service using the convention pattern.
///
/// Each handler module must export:
/// - `COMMAND: &str`: the command name
/// - `guard(ctx) -> bool`: input validation
/// - `handle(ctx) -> Result<Value, HandlerError>`: the handler
///
/// # Example
/// ```ignore
/// let service = dataset_registry::register_handlers!(
///     microsvc::Service::new(lifecycle),
///     handlers::dataset_create,
///     handlers::dataset_get,
/// );
/// ```
#[macro_export]
macro_rules! register_handlers {
    ($service:expr, $( $($seg:ident)::+ ),+ $(,)?) => {
        $service
        $(
            .command_guarded(
                $($seg)::+::COMMAND,
                $($seg)::+::guard,
                $($seg)::+::handle,
            )
        )+
    };
}
