use crate::dynamo::ItemStore;

/// Shared application state
///
/// Built once at startup and borrowed by every invocation. The table name is
/// injected here so no operation reads the environment at request time.
#[derive(Clone)]
pub struct AppState<S: ItemStore> {
    pub store: S,
    pub table_name: String,
}
