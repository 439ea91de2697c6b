//! `property(name)` operator backed by the custom property repository

use parking_lot::RwLock;
use std::sync::Arc;

use crate::error::Result;
use crate::evaluator::{EvalStack, EvaluationScope};
use crate::model::{Context, DynamicPropertyRule, RoxxValue};
use crate::registry::{Operator, OperatorTableBuilder, RoxxExtension};
use crate::repository::CustomPropertyRepository;

/// Resolves `property(name)` against registered custom properties
///
/// A registered property wins. Otherwise the dynamic rule, when installed, is asked.
/// Anything else resolves to `undefined`.
#[derive(Clone)]
pub struct PropertyExtension {
    properties: Arc<CustomPropertyRepository>,
    dynamic_rule: Arc<RwLock<Option<DynamicPropertyRule>>>,
}

impl PropertyExtension {
    /// Create the extension without a dynamic rule
    pub fn new(properties: Arc<CustomPropertyRepository>) -> Self {
        Self {
            properties,
            dynamic_rule: Arc::new(RwLock::new(None)),
        }
    }

    /// Install a dynamic rule at construction
    pub fn with_dynamic_rule(self, rule: DynamicPropertyRule) -> Self {
        self.set_dynamic_rule(Some(rule));
        self
    }

    /// Replace or clear the dynamic rule
    ///
    /// Takes effect for parsers already built from this extension.
    pub fn set_dynamic_rule(&self, rule: Option<DynamicPropertyRule>) {
        *self.dynamic_rule.write() = rule;
    }

    /// Repository this extension reads from
    pub fn properties(&self) -> &Arc<CustomPropertyRepository> {
        &self.properties
    }

    /// Resolve a property name against a context
    pub fn resolve(&self, name: &str, context: &Context) -> RoxxValue {
        if let Some(property) = self.properties.get_custom_property(name) {
            return property.value(context);
        }

        let rule = self.dynamic_rule.read().clone();
        rule.and_then(|rule| rule(name, context))
            .unwrap_or(RoxxValue::Undefined)
    }
}

impl RoxxExtension for PropertyExtension {
    fn name(&self) -> &'static str {
        "property"
    }

    fn register_operators(&self, builder: &mut OperatorTableBuilder) {
        builder.register("property", Arc::new(self.clone()));
    }
}

impl Operator for PropertyExtension {
    fn execute(&self, stack: &mut EvalStack, scope: &mut EvaluationScope<'_>) -> Result<()> {
        let name = stack.pop("property")?;
        let value = match name.as_str() {
            Some(name) => self.resolve(name, scope.context()),
            None => RoxxValue::Undefined,
        };
        stack.push(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{CustomProperty, CustomPropertyType, context_value_rule};
    use crate::Parser;

    fn parser(extension: &PropertyExtension) -> Parser {
        Parser::builder().with_properties(extension.clone()).build()
    }

    #[test]
    fn test_registered_property_wins() {
        let repository = Arc::new(CustomPropertyRepository::new());
        repository.add_custom_property(CustomProperty::string("platform", "ios"));
        let extension = PropertyExtension::new(Arc::clone(&repository))
            .with_dynamic_rule(Arc::new(|_, _| Some(RoxxValue::from("dynamic"))));
        let parser = parser(&extension);

        let ctx = Context::empty();
        assert_eq!(
            parser.evaluate_expression(r#"property("platform")"#, &ctx).into_value(),
            RoxxValue::from("ios")
        );
        assert_eq!(
            parser.evaluate_expression(r#"property("other")"#, &ctx).into_value(),
            RoxxValue::from("dynamic")
        );
    }

    #[test]
    fn test_computed_property_sees_context() {
        let repository = Arc::new(CustomPropertyRepository::new());
        repository.add_custom_property(CustomProperty::computed(
            "age",
            CustomPropertyType::Integer,
            |ctx| ctx.get("age").cloned().unwrap_or_default(),
        ));
        let parser = parser(&PropertyExtension::new(repository));

        let ctx = Context::builder().with("age", 30).build();
        assert!(
            parser
                .evaluate_expression(r#"gte(property("age"), 18)"#, &ctx)
                .as_bool()
        );
        assert!(
            !parser
                .evaluate_expression(r#"gte(property("age"), 18)"#, &Context::empty())
                .as_bool()
        );
    }

    #[test]
    fn test_unknown_property_is_undefined() {
        let extension = PropertyExtension::new(Arc::new(CustomPropertyRepository::new()));
        let parser = parser(&extension);
        let ctx = Context::builder().with("country", "NL").build();

        assert!(
            parser
                .evaluate_expression(r#"isUndefined(property("country"))"#, &ctx)
                .as_bool()
        );
        assert!(parser.evaluate_expression("property(5)", &ctx).is_undefined());

        extension.set_dynamic_rule(Some(context_value_rule()));
        assert_eq!(
            parser.evaluate_expression(r#"property("country")"#, &ctx).into_value(),
            RoxxValue::from("NL")
        );
    }
}
