//! Statement synthesis (deterministic JSON generation, apart from random sids)

pub mod statement_builder;

pub use statement_builder::{
    build_source_account_statement, build_source_arn_statement, expand_bulk_targets,
};
