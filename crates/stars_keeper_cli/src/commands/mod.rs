pub(crate) mod meta;
pub(crate) mod migrate;
pub(crate) mod purge;
pub(crate) mod sync;
