pub mod policy;

pub use policy::{FirstLegalPolicy, PolicyKind, RandomPolicy, build_policy};
