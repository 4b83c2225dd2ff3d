//! Process-wide codec contexts.
//!
//! The host calls [`on_load`] once at startup and [`on_unload`] once at exit.
//! In between, [`compress`] and [`decompress`] serve calls from the shared
//! pair of contexts. Both entry points treat `None` data as "nothing to do".

use std::sync::{Arc, PoisonError, RwLock};

use tracing::{debug, error, warn};

use flate_core::{Flate, FlateConfig, FlateError};

use crate::initialize;

static CONTEXTS: RwLock<Option<Arc<Flate>>> = RwLock::new(None);

/// Initialize the shared contexts. Calling it again while loaded is a no-op.
pub fn on_load(config: &FlateConfig) -> Result<(), FlateError> {
    let mut slot = CONTEXTS.write().unwrap_or_else(PoisonError::into_inner);
    if slot.is_some() {
        warn!("codec contexts already loaded");
        return Ok(());
    }

    let flate = initialize(config).map_err(|err| {
        error!(%err, "codec context initialization failed");
        err
    })?;
    *slot = Some(Arc::new(flate));
    debug!(?config, "codec contexts loaded");
    Ok(())
}

/// Tear down the shared contexts.
///
/// A call still in flight keeps its own handle; the engines are released when
/// it returns.
pub fn on_unload() {
    let taken = CONTEXTS
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .take();
    match taken.map(Arc::try_unwrap) {
        Some(Ok(flate)) => flate.shutdown(),
        Some(Err(_)) => debug!("codec contexts still in use; released after the last call"),
        None => debug!("codec contexts were not loaded"),
    }
}

pub fn is_loaded() -> bool {
    CONTEXTS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .is_some()
}

fn current() -> Result<Arc<Flate>, FlateError> {
    CONTEXTS
        .read()
        .unwrap_or_else(PoisonError::into_inner)
        .clone()
        .ok_or(FlateError::NotLoaded)
}

/// Compress `data` through the shared compression context.
pub fn compress(
    data: Option<&[u8]>,
    dictionary: Option<&[u8]>,
    level: Option<i32>,
) -> Result<Option<Vec<u8>>, FlateError> {
    if data.is_none() {
        return Ok(None);
    }
    current()?.compress(data, dictionary, level)
}

/// Decompress `data` through the shared decompression context.
pub fn decompress(
    data: Option<&[u8]>,
    dictionary: Option<&[u8]>,
) -> Result<Option<Vec<u8>>, FlateError> {
    if data.is_none() {
        return Ok(None);
    }
    current()?.decompress(data, dictionary)
}
