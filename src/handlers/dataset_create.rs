//! Handler: dataset.create

use serde_json::{json, Value};

use crate::cache::DatasetCache;
use crate::dataset::DatasetMetadata;
use crate::lifecycle::DatasetLifecycle;
use crate::microsvc::{Context, HandlerError};
use crate::store::MetadataStore;

pub const COMMAND: &str = "dataset.create";

pub fn guard<L>(_ctx: &Context<L>) -> bool {
    true
}

pub fn handle<S, C>(ctx: &Context<DatasetLifecycle<S, C>>) -> Result<Value, HandlerError>
where
    S: MetadataStore,
    C: DatasetCache + 'static,
{
    super::authorized(ctx, super::has_record)?;
    let record = ctx.input::<DatasetMetadata>()?;
    let name = ctx.lifecycle().create(record, ctx.identity())?;
    Ok(json!({ "name": name, "sync": "scheduled" }))
}
