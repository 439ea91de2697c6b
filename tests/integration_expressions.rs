//! End-to-end expression behaviour through a fully wired parser

mod utils;

use pretty_assertions::assert_eq;
use roxx_engine::{
    Context, CustomProperty, EvaluationFrame, RoxxError, RoxxValue, TargetGroupModel,
    TargetingExtension, tokenize,
};
use rstest::rstest;
use std::sync::Arc;
use utils::TestEnvironment;

#[rstest]
#[case(r#"md5(concat("st", "am"))"#, RoxxValue::from("07915255d64730d06d2349d11ac3bfd8"))]
#[case(r#"semverLt("1.1.0", "1.1")"#, RoxxValue::Boolean(false))]
#[case(r#"semverGte("1.1.0", "1.1")"#, RoxxValue::Boolean(true))]
#[case(r#"flagValue("unregistered-untargeted")"#, RoxxValue::from("false"))]
#[case(r#"isInTargetGroup("nonexistent")"#, RoxxValue::Boolean(false))]
#[case(r#"ifThen(and(true, isInPercentage("device2.seed2", 0.5)), "B", "A")"#, RoxxValue::from("B"))]
#[case(r#"inArray("b", ["a", "b", "c"])"#, RoxxValue::Boolean(true))]
#[case(r#"eq(3, "3")"#, RoxxValue::Boolean(false))]
#[case(r#"lt("2", 10)"#, RoxxValue::Boolean(true))]
#[case(r#"match("Hello", "^hello$", "i")"#, RoxxValue::Boolean(true))]
#[case(r#"b64d("aGVsbG8gcm94eA==")"#, RoxxValue::from("hello roxx"))]
fn testable_properties(#[case] expression: &str, #[case] expected: RoxxValue) {
    let env = TestEnvironment::new();
    assert_eq!(env.eval(expression, &Context::empty()).into_value(), expected);
}

#[test]
fn malformed_expressions_degrade_to_undefined() {
    let env = TestEnvironment::new();
    for expression in [
        "eq(-., 1)",
        r#"eq("unterminated, 1)"#,
        "and(true)",
        r#"not("text")"#,
        "[1, 2",
    ] {
        assert!(
            env.eval(expression, &Context::empty()).is_undefined(),
            "'{expression}' should be undefined"
        );
    }
}

#[test]
fn tokenizer_reports_what_evaluation_swallows() {
    let env = TestEnvironment::new();
    let err = tokenize("eq(-., 1)", env.parser.operators()).unwrap_err();
    assert_eq!(
        err,
        RoxxError::MalformedNumber {
            token: "-.".to_string()
        }
    );

    let mut frame = EvaluationFrame::new(8);
    let err = env
        .parser
        .try_evaluate("and(true)", &Context::empty(), &mut frame)
        .unwrap_err();
    assert_eq!(err, RoxxError::stack_underflow("and"));
}

#[test]
fn target_groups_compose_with_properties() {
    let env = TestEnvironment::new();
    env.properties.add_custom_property(CustomProperty::computed(
        "country",
        roxx_engine::CustomPropertyType::String,
        |ctx| ctx.get("country").cloned().unwrap_or_default(),
    ));
    env.properties
        .add_custom_property(CustomProperty::semver("app_version", "2.4.1"));
    env.target_groups.set_target_groups(vec![
        TargetGroupModel::new("eu", r#"inArray(property("country"), ["NL", "DE", "FR"])"#),
        TargetGroupModel::new(
            "eu-modern",
            r#"and(isInTargetGroup("eu"), semverGte(property("app_version"), "2.4"))"#,
        ),
    ]);

    let nl = Context::builder().with("country", "NL").build();
    let us = Context::builder().with("country", "US").build();
    assert!(env.eval(r#"isInTargetGroup("eu-modern")"#, &nl).as_bool());
    assert!(!env.eval(r#"isInTargetGroup("eu-modern")"#, &us).as_bool());
}

#[test]
fn deep_target_group_chain_hits_recursion_limit() {
    let env = TestEnvironment::new();
    let depth = env.parser.config().max_recursion_depth + 4;
    let groups = (0..depth).map(|i| {
        let condition = if i + 1 == depth {
            "true".to_string()
        } else {
            format!(r#"isInTargetGroup("g{}")"#, i + 1)
        };
        TargetGroupModel::new(format!("g{i}"), condition)
    });
    env.target_groups.set_target_groups(groups);

    assert!(!env.eval(r#"isInTargetGroup("g0")"#, &Context::empty()).as_bool());
    let last = format!(r#"isInTargetGroup("g{}")"#, depth - 1);
    assert!(env.eval(&last, &Context::empty()).as_bool());
}

#[test]
fn context_merge_prefers_local() {
    let global = Context::builder().with("a", 1).with("g", "global").build();
    let local = Context::builder().with("a", 2).build();
    let merged = Context::merge(&global, &local);

    assert_eq!(merged.get("a"), Some(&RoxxValue::Integer(2)));
    assert_eq!(merged.get("g"), Some(&RoxxValue::from("global")));
    assert_eq!(global.get("a"), Some(&RoxxValue::Integer(1)));
}

#[test]
fn host_operator_overrides_extension() {
    let env = TestEnvironment::new();
    let parser = roxx_engine::Parser::builder()
        .with_targeting(TargetingExtension::new(
            Arc::clone(&env.target_groups),
            Arc::clone(&env.flags),
            Arc::clone(&env.experiments),
        ))
        .add_operator("isInPercentage", |stack, _| {
            stack.pop("isInPercentage")?;
            stack.pop("isInPercentage")?;
            stack.push(true);
            Ok(())
        })
        .build();

    assert!(
        parser
            .evaluate_expression(r#"isInPercentage("device2.seed2", 0)"#, &Context::empty())
            .as_bool()
    );
}
