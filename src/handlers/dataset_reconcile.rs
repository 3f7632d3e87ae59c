//! Handler: dataset.reconcile
//!
//! Re-schedules a download for every dataset whose cache diverged from its
//! metadata, and reports the recorded failures seen before scheduling.

use serde_json::{json, Value};

use crate::cache::DatasetCache;
use crate::lifecycle::DatasetLifecycle;
use crate::microsvc::{Context, HandlerError};
use crate::store::MetadataStore;

pub const COMMAND: &str = "dataset.reconcile";

pub fn guard<L>(_ctx: &Context<L>) -> bool {
    true
}

pub fn handle<S, C>(ctx: &Context<DatasetLifecycle<S, C>>) -> Result<Value, HandlerError>
where
    S: MetadataStore,
    C: DatasetCache + 'static,
{
    super::authorized(ctx, |_| true)?;
    let lifecycle = ctx.lifecycle();
    let failures: Vec<Value> = lifecycle
        .sync_failures()
        .into_iter()
        .map(|(name, record)| json!({ "name": name, "last": record }))
        .collect();
    let scheduled = lifecycle.reconcile(ctx.identity())?;
    Ok(json!({ "scheduled": scheduled, "failures": failures }))
}
