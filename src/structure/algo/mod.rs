pub(crate) mod reduction;
pub(crate) mod holohedry;
pub(crate) mod distance;
pub(crate) mod primitive;
pub(crate) mod search;
pub(crate) mod group;
