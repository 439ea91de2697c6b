//! Built-in ROXX operators

pub mod comparison;
pub mod datetime;
pub mod logical;
pub mod semver;
pub mod string;

use std::sync::Arc;

use super::OperatorTableBuilder;
use crate::config::EngineConfig;

/// Install every built-in operator
pub fn register_builtins(builder: &mut OperatorTableBuilder, config: &EngineConfig) {
    builder
        .register_fn("and", logical::and)
        .register_fn("or", logical::or)
        .register_fn("not", logical::not)
        .register_fn("ifThen", logical::if_then)
        .register_fn("isUndefined", logical::is_undefined);

    builder
        .register_fn("eq", comparison::eq)
        .register_fn("ne", comparison::ne)
        .register_fn("lt", comparison::lt)
        .register_fn("lte", comparison::lte)
        .register_fn("gt", comparison::gt)
        .register_fn("gte", comparison::gte)
        .register_fn("numeq", comparison::numeq)
        .register_fn("numneq", comparison::numneq)
        .register_fn("inArray", comparison::in_array);

    semver::register(builder);

    builder
        .register_fn("md5", string::md5)
        .register_fn("concat", string::concat)
        .register_fn("b64d", string::b64d)
        .register(
            "match",
            Arc::new(string::MatchOperator::new(config.regex_cache_capacity)),
        );

    builder
        .register_fn("now", datetime::now)
        .register_fn("tsToNum", datetime::ts_to_num);
}
