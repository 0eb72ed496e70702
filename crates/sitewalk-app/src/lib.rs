// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod datefmt;
pub mod draft;
pub mod ids;
pub mod model;
pub mod query;
pub mod state;

pub use draft::*;
pub use ids::*;
pub use model::*;
pub use query::*;
pub use state::*;
