//! Handler: dataset.delete

use serde_json::{json, Value};

use super::NameInput;
use crate::cache::DatasetCache;
use crate::lifecycle::DatasetLifecycle;
use crate::microsvc::{Context, HandlerError};
use crate::store::MetadataStore;

pub const COMMAND: &str = "dataset.delete";

pub fn guard<L>(_ctx: &Context<L>) -> bool {
    true
}

pub fn handle<S, C>(ctx: &Context<DatasetLifecycle<S, C>>) -> Result<Value, HandlerError>
where
    S: MetadataStore,
    C: DatasetCache + 'static,
{
    super::authorized(ctx, super::has_name)?;
    let input = ctx.input::<NameInput>()?;
    ctx.lifecycle().delete(&input.name, ctx.identity())?;
    Ok(json!({ "name": input.name, "deleted": true }))
}
