//! Handler: dataset.update
//!
//! Whole-record replace. Fields absent from the payload are not merged in
//! from the stored record.

use serde_json::{json, Value};

use crate::cache::DatasetCache;
use crate::dataset::DatasetMetadata;
use crate::lifecycle::DatasetLifecycle;
use crate::microsvc::{Context, HandlerError};
use crate::store::MetadataStore;

pub const COMMAND: &str = "dataset.update";

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
    let name = record.name.clone();
    ctx.lifecycle().update(record, ctx.identity())?;
    Ok(json!({ "name": name, "sync": "scheduled" }))
}
