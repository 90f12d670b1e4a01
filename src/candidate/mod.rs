//! Peak selection and neighborhood suppression on the vote volume.

pub(crate) mod peak;
pub(crate) mod suppress;
