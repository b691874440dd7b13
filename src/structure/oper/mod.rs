pub(crate) mod symmops;
