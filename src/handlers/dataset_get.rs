//! Handler: dataset.get

use serde_json::Value;

use super::NameInput;
use crate::cache::DatasetCache;
use crate::lifecycle::DatasetLifecycle;
use crate::microsvc::{Context, HandlerError};
use crate::store::MetadataStore;

pub const COMMAND: &str = "dataset.get";

pub fn guard<L>(ctx: &Context<L>) -> bool {
    super::has_name(ctx)
}

pub fn handle<S, C>(ctx: &Context<DatasetLifecycle<S, C>>) -> Result<Value, HandlerError>
where
    S: MetadataStore,
    C: DatasetCache + 'static,
{
    let input = ctx.input::<NameInput>()?;
    let record = ctx.lifecycle().get(&input.name)?;
    Ok(serde_json::to_value(record)?)
}
