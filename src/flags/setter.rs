//! Binds experiments from the experiment repository to registered flags

use rustc_hash::FxHashSet;
use std::sync::Arc;

use super::impression::ImpressionInvoker;
use super::variant::{Variant, VariantBinding};
use crate::evaluator::Parser;
use crate::model::{Context, ExperimentModel};
use crate::repository::{ExperimentRepository, FlagRepository};

/// Keeps flag bindings in step with the experiment set
///
/// [`FlagSetter::set_experiments`] rebinds every registered flag from scratch.
/// Flags registered later are bound on arrival through the flag repository's
/// flag-added handler, which holds only a weak reference back to the setter.
pub struct FlagSetter {
    inner: Arc<SetterInner>,
}

struct SetterInner {
    flags: Arc<FlagRepository>,
    experiments: Arc<ExperimentRepository>,
    parser: Arc<Parser>,
    impression_invoker: Option<Arc<dyn ImpressionInvoker>>,
    global_context: Context,
}

impl SetterInner {
    fn binding_for(&self, experiment: &Arc<ExperimentModel>) -> VariantBinding {
        let mut binding = VariantBinding::new(experiment.condition.clone(), &self.parser)
            .with_experiment(Arc::clone(experiment))
            .with_global_context(self.global_context.clone());
        if let Some(invoker) = &self.impression_invoker {
            binding = binding.with_impression_invoker(Arc::clone(invoker));
        }
        binding
    }

    fn bind_added(&self, name: &str, variant: &Arc<Variant>) {
        if let Some(experiment) = self.experiments.get_experiment_by_flag(name) {
            log::debug!("Binding late flag '{name}' to experiment '{}'", experiment.id);
            variant.bind(self.binding_for(&experiment));
        }
    }
}

impl FlagSetter {
    /// Start configuring a setter
    pub fn builder(
        flags: Arc<FlagRepository>,
        experiments: Arc<ExperimentRepository>,
        parser: Arc<Parser>,
    ) -> FlagSetterBuilder {
        FlagSetterBuilder {
            flags,
            experiments,
            parser,
            impression_invoker: None,
            global_context: Context::empty(),
        }
    }

    /// Rebind every registered flag to the current experiment set
    ///
    /// A flag targeted by several experiments follows the first one. Flags no
    /// experiment targets lose their binding. A variant registered under several
    /// names is bound through whichever of its names an experiment targets first.
    pub fn set_experiments(&self) {
        let inner = &self.inner;
        let mut claimed = FxHashSet::default();
        let mut bound = FxHashSet::default();

        for experiment in inner.experiments.get_all_experiments() {
            for flag_name in &experiment.flags {
                if !claimed.insert(flag_name.clone()) {
                    continue;
                }
                let Some(variant) = inner.flags.get_flag(flag_name) else {
                    continue;
                };
                if bound.insert(Arc::as_ptr(&variant)) {
                    variant.bind(inner.binding_for(&experiment));
                }
            }
        }

        for (_, variant) in inner.flags.entries() {
            if !bound.contains(&Arc::as_ptr(&variant)) {
                variant.unbind();
            }
        }
        log::debug!("Bound {} flags to experiments", bound.len());
    }

    /// Parser used by every binding
    pub fn parser(&self) -> &Arc<Parser> {
        &self.inner.parser
    }
}

impl std::fmt::Debug for FlagSetter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FlagSetter")
            .field("flags", &self.inner.flags.len())
            .field("global_context", &self.inner.global_context)
            .finish_non_exhaustive()
    }
}

/// Builder for [`FlagSetter`]
pub struct FlagSetterBuilder {
    flags: Arc<FlagRepository>,
    experiments: Arc<ExperimentRepository>,
    parser: Arc<Parser>,
    impression_invoker: Option<Arc<dyn ImpressionInvoker>>,
    global_context: Context,
}

impl FlagSetterBuilder {
    /// Receiver of impressions for every bound flag
    pub fn with_impression_invoker(mut self, invoker: impl ImpressionInvoker + 'static) -> Self {
        self.impression_invoker = Some(Arc::new(invoker));
        self
    }

    /// Process-wide context merged under every call-site context
    pub fn with_global_context(mut self, context: Context) -> Self {
        self.global_context = context;
        self
    }

    /// Create the setter and subscribe it to flag registrations
    pub fn build(self) -> FlagSetter {
        let inner = Arc::new(SetterInner {
            flags: self.flags,
            experiments: self.experiments,
            parser: self.parser,
            impression_invoker: self.impression_invoker,
            global_context: self.global_context,
        });

        let weak = Arc::downgrade(&inner);
        inner.flags.register_flag_added_handler(move |name, variant| {
            if let Some(inner) = weak.upgrade() {
                inner.bind_added(name, variant);
            }
        });

        FlagSetter { inner }
    }
}
