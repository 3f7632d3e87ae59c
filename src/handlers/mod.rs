//! Dataset registry command handlers.
//!
//! One file per command, each exporting `COMMAND`, `guard` and `handle`
//! for [`register_handlers!`](crate::register_handlers). The mutating commands
//! pass every payload through `guard` and check it in `handle` after the
//! access gate.

use serde::Deserialize;

use crate::cache::DatasetCache;
use crate::lifecycle::DatasetLifecycle;
use crate::microsvc::{Context, HandlerError, Service};
use crate::store::MetadataStore;

pub mod dataset_create;
pub mod dataset_delete;
pub mod dataset_get;
pub mod dataset_list;
pub mod dataset_reconcile;
pub mod dataset_resync;
pub mod dataset_status;
pub mod dataset_update;
pub mod skill_type_list;

/// Input of the commands addressing one dataset by name.
#[derive(Debug, Deserialize)]
pub struct NameInput {
    #[serde(alias = "dataset_name")]
    pub name: String,
}

/// Input guard shared by the by-name commands.
pub(crate) fn has_name<L>(ctx: &Context<L>) -> bool {
    ctx.str_field("name").or_else(|| ctx.str_field("dataset_name")).is_some()
}

/// Input guard of the commands taking a whole record.
pub(crate) fn has_record<L>(ctx: &Context<L>) -> bool {
    has_name(ctx) && ctx.has_fields(&["skill_type", "metric", "mapping"])
}

/// Guard of the mutating commands: the access gate runs first, so an unknown
/// caller is refused before its payload is looked at.
pub(crate) fn authorized<S, C>(
    ctx: &Context<DatasetLifecycle<S, C>>,
    input_ok: impl FnOnce(&Context<DatasetLifecycle<S, C>>) -> bool,
) -> Result<(), HandlerError>
where
    S: MetadataStore,
    C: DatasetCache + 'static,
{
    ctx.lifecycle().authorize(ctx.identity())?;
    if !input_ok(ctx) {
        return Err(HandlerError::GuardRejected(ctx.command_name().to_string()));
    }
    Ok(())
}

/// A service with every dataset registry command registered.
pub fn dataset_service<S, C>(lifecycle: DatasetLifecycle<S, C>) -> Service<DatasetLifecycle<S, C>>
where
    S: MetadataStore + 'static,
    C: DatasetCache + 'static,
{
    crate::register_handlers!(
        Service::new(lifecycle),
        dataset_create,
        dataset_update,
        dataset_delete,
        dataset_get,
        dataset_list,
        dataset_status,
        dataset_resync,
        dataset_reconcile,
        skill_type_list,
    )
}
