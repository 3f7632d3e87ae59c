//! Handler: dataset.list

use serde_json::{json, Value};

use crate::cache::DatasetCache;
use crate::lifecycle::DatasetLifecycle;
use crate::microsvc::{Context, HandlerError};
use crate::store::MetadataStore;

pub const COMMAND: &str = "dataset.list";

pub fn guard<L>(_ctx: &Context<L>) -> bool {
    true
}

pub fn handle<S, C>(ctx: &Context<DatasetLifecycle<S, C>>) -> Result<Value, HandlerError>
where
    S: MetadataStore,
    C: DatasetCache + 'static,
{
    let names = ctx.lifecycle().list()?;
    Ok(json!({ "datasets": names }))
}
