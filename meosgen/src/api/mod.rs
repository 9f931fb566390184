pub(crate) mod builder;
pub(crate) mod declaration;
pub(crate) mod destination;
pub(crate) mod record;
pub(crate) mod source;
