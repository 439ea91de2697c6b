//! Shared test environment: repositories, parser and flag setter wired together

#![allow(dead_code)]

use parking_lot::Mutex;
use roxx_engine::{
    Context, CustomPropertyRepository, ExperimentRepository, FlagRepository, FlagSetter,
    Impression, Parser, PropertyExtension, TargetGroupRepository, TargetingExtension,
};
use std::sync::Arc;

/// Everything an SDK wires up at startup
pub struct TestEnvironment {
    pub flags: Arc<FlagRepository>,
    pub experiments: Arc<ExperimentRepository>,
    pub target_groups: Arc<TargetGroupRepository>,
    pub properties: Arc<CustomPropertyRepository>,
    pub parser: Arc<Parser>,
    pub setter: FlagSetter,
    pub impressions: Arc<Mutex<Vec<Impression>>>,
}

impl TestEnvironment {
    /// Environment with an empty global context
    pub fn new() -> Self {
        Self::with_global_context(Context::empty())
    }

    /// Environment whose flags see `global` under every call-site context
    pub fn with_global_context(global: Context) -> Self {
        let flags = Arc::new(FlagRepository::new());
        let experiments = Arc::new(ExperimentRepository::new());
        let target_groups = Arc::new(TargetGroupRepository::new());
        let properties = Arc::new(CustomPropertyRepository::new());

        let parser = Arc::new(
            Parser::builder()
                .with_targeting(TargetingExtension::new(
                    Arc::clone(&target_groups),
                    Arc::clone(&flags),
                    Arc::clone(&experiments),
                ))
                .with_properties(PropertyExtension::new(Arc::clone(&properties)))
                .build(),
        );

        let impressions = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&impressions);
        let setter = FlagSetter::builder(
            Arc::clone(&flags),
            Arc::clone(&experiments),
            Arc::clone(&parser),
        )
        .with_impression_invoker(move |impression: &Impression| {
            sink.lock().push(impression.clone());
        })
        .with_global_context(global)
        .build();

        Self {
            flags,
            experiments,
            target_groups,
            properties,
            parser,
            setter,
            impressions,
        }
    }

    /// Evaluate an expression with this environment's parser
    pub fn eval(&self, expression: &str, context: &Context) -> roxx_engine::EvaluationResult {
        self.parser.evaluate_expression(expression, context)
    }

    /// Flag names of the impressions reported so far
    pub fn impression_log(&self) -> Vec<(String, String)> {
        self.impressions
            .lock()
            .iter()
            .map(|impression| (impression.flag_name.clone(), impression.value.clone()))
            .collect()
    }
}
