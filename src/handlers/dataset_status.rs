//! Handler: dataset.status

use serde_json::{json, Value};

use super::NameInput;
use crate::cache::DatasetCache;
use crate::lifecycle::DatasetLifecycle;
use crate::microsvc::{Context, HandlerError};
use crate::store::MetadataStore;

pub const COMMAND: &str = "dataset.status";

pub fn guard<L>(ctx: &Context<L>) -> bool {
    super::has_name(ctx)
}

pub fn handle<S, C>(ctx: &Context<DatasetLifecycle<S, C>>) -> Result<Value, HandlerError>
where
    S: MetadataStore,
    C: DatasetCache + 'static,
{
    let input = ctx.input::<NameInput>()?;
    let state = ctx.lifecycle().sync_status(&input.name)?;
    Ok(json!({ "name": input.name, "status": state }))
}
