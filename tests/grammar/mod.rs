//! Grammar graph tests: construction through the public builder and the
//! structure analysis relies on.
