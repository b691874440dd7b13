pub(crate) mod lattice;
pub(crate) mod cell;
