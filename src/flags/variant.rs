//! Variants: flag values with a default, an option set and an optional binding
//!
//! A [`Variant`] is one of four sealed kinds (see [`VariantKind`]). Its default and
//! options are fixed at construction. The [`VariantBinding`] is replaced as a whole
//! by [`FlagSetter`](crate::flags::FlagSetter) on every configuration refresh, so a
//! reader sees either the previous binding or the new one, never a mix.
//!
//! Evaluation merges the binding's global context under the caller's context, runs
//! the bound condition and accepts the result only if it matches the variant's kind.
//! A missing binding, an undefined result and a kind mismatch all serve the default
//! and fire no impression.

use parking_lot::RwLock;
use std::fmt;
use once_cell::sync::OnceCell;
use std::sync::{Arc, Weak};

use super::impression::{Impression, ImpressionInvoker, dispatch};
use crate::evaluator::{EvaluationFrame, Parser, ReferenceKind};
use crate::model::{Context, ExperimentModel, RoxxValue};

/// The sealed kinds of variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VariantKind {
    /// Boolean flag with options `false` and `true`
    Flag,
    /// Free-form string
    String,
    /// 64-bit integer
    Int,
    /// Floating point
    Double,
}

impl VariantKind {
    /// Wire name of the kind
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Flag => "bool",
            Self::String => "string",
            Self::Int => "int",
            Self::Double => "double",
        }
    }

    /// Convert a condition result into a value of this kind, if the types agree
    pub fn accept(&self, value: &RoxxValue) -> Option<VariantValue> {
        match (self, value) {
            (Self::Flag, RoxxValue::Boolean(b)) => Some(VariantValue::Bool(*b)),
            (Self::Flag, RoxxValue::String(s)) => match s.as_ref() {
                "true" => Some(VariantValue::Bool(true)),
                "false" => Some(VariantValue::Bool(false)),
                _ => None,
            },
            (Self::String, RoxxValue::String(s)) if !s.is_empty() => {
                Some(VariantValue::String(s.to_string()))
            }
            (Self::String, RoxxValue::Boolean(b)) => Some(VariantValue::String(b.to_string())),
            (Self::Int, RoxxValue::Integer(i)) => Some(VariantValue::Int(*i)),
            (Self::Int, RoxxValue::Float(f))
                if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 =>
            {
                Some(VariantValue::Int(*f as i64))
            }
            (Self::Double, RoxxValue::Integer(i)) => Some(VariantValue::Double(*i as f64)),
            (Self::Double, RoxxValue::Float(f)) => Some(VariantValue::Double(*f)),
            _ => None,
        }
    }
}

impl fmt::Display for VariantKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

/// A value served by a variant
#[derive(Debug, Clone, PartialEq)]
pub enum VariantValue {
    /// Served by [`VariantKind::Flag`]
    Bool(bool),
    /// Served by [`VariantKind::String`]
    String(String),
    /// Served by [`VariantKind::Int`]
    Int(i64),
    /// Served by [`VariantKind::Double`]
    Double(f64),
}

impl VariantValue {
    /// Kind this value belongs to
    pub fn kind(&self) -> VariantKind {
        match self {
            Self::Bool(_) => VariantKind::Flag,
            Self::String(_) => VariantKind::String,
            Self::Int(_) => VariantKind::Int,
            Self::Double(_) => VariantKind::Double,
        }
    }

    /// Boolean payload
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// String payload
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Integer payload
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            _ => None,
        }
    }

    /// Floating point payload
    pub fn as_double(&self) -> Option<f64> {
        match self {
            Self::Double(d) => Some(*d),
            _ => None,
        }
    }
}

impl fmt::Display for VariantValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(b) => write!(f, "{b}"),
            Self::String(s) => f.write_str(s),
            Self::Int(i) => write!(f, "{i}"),
            Self::Double(d) => write!(f, "{d}"),
        }
    }
}

impl From<bool> for VariantValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for VariantValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for VariantValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<i64> for VariantValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for VariantValue {
    fn from(value: f64) -> Self {
        Self::Double(value)
    }
}

/// Everything a variant needs to evaluate its condition
///
/// Holds only a weak reference to the parser: the parser reaches the flag repository
/// through `flagValue`, and the repository owns the variants.
#[derive(Clone)]
pub struct VariantBinding {
    condition: String,
    parser: Weak<Parser>,
    experiment: Option<Arc<ExperimentModel>>,
    impression_invoker: Option<Arc<dyn ImpressionInvoker>>,
    global_context: Context,
}

impl VariantBinding {
    /// Bind `condition` to be evaluated by `parser`
    pub fn new(condition: impl Into<String>, parser: &Arc<Parser>) -> Self {
        Self {
            condition: condition.into(),
            parser: Arc::downgrade(parser),
            experiment: None,
            impression_invoker: None,
            global_context: Context::empty(),
        }
    }

    /// Experiment reported with impressions
    pub fn with_experiment(mut self, experiment: Arc<ExperimentModel>) -> Self {
        self.experiment = Some(experiment);
        self
    }

    /// Receiver of impressions
    pub fn with_impression_invoker(mut self, invoker: Arc<dyn ImpressionInvoker>) -> Self {
        self.impression_invoker = Some(invoker);
        self
    }

    /// Context merged under every call-site context
    pub fn with_global_context(mut self, context: Context) -> Self {
        self.global_context = context;
        self
    }

    /// Bound condition
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Bound experiment
    pub fn experiment(&self) -> Option<&Arc<ExperimentModel>> {
        self.experiment.as_ref()
    }
}

impl fmt::Debug for VariantBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VariantBinding")
            .field("condition", &self.condition)
            .field("experiment", &self.experiment.as_ref().map(|e| &e.id))
            .field("has_impression_invoker", &self.impression_invoker.is_some())
            .finish_non_exhaustive()
    }
}

/// A flag value with its default, options and current binding
pub struct Variant {
    name: OnceCell<String>,
    kind: VariantKind,
    default_value: VariantValue,
    options: Vec<VariantValue>,
    binding: RwLock<Option<Arc<VariantBinding>>>,
}

impl Variant {
    /// Boolean flag
    pub fn flag(default: bool) -> Self {
        Self::with_options(VariantKind::Flag, default.into(), vec![false.into(), true.into()])
    }

    /// String variant
    pub fn string(default: impl Into<String>, options: impl IntoIterator<Item = impl Into<String>>) -> Self {
        let options = options.into_iter().map(|o| VariantValue::String(o.into())).collect();
        Self::with_options(VariantKind::String, VariantValue::String(default.into()), options)
    }

    /// Integer variant
    pub fn int(default: i64, options: impl IntoIterator<Item = i64>) -> Self {
        let options = options.into_iter().map(VariantValue::Int).collect();
        Self::with_options(VariantKind::Int, VariantValue::Int(default), options)
    }

    /// Floating point variant
    pub fn double(default: f64, options: impl IntoIterator<Item = f64>) -> Self {
        let options = options.into_iter().map(VariantValue::Double).collect();
        Self::with_options(VariantKind::Double, VariantValue::Double(default), options)
    }

    fn with_options(kind: VariantKind, default_value: VariantValue, candidates: Vec<VariantValue>) -> Self {
        let mut options = vec![default_value.clone()];
        for option in candidates {
            if !options.contains(&option) {
                options.push(option);
            }
        }
        Self {
            name: OnceCell::new(),
            kind,
            default_value,
            options,
            binding: RwLock::new(None),
        }
    }

    /// Registered name, empty until the variant is added to a repository
    pub fn name(&self) -> &str {
        self.name.get().map_or("", String::as_str)
    }

    /// Set the name on first registration; false if it already has a different one
    pub(crate) fn assign_name(&self, name: &str) -> bool {
        self.name.get_or_init(|| name.to_string()) == name
    }

    /// Sealed kind
    pub fn kind(&self) -> VariantKind {
        self.kind
    }

    /// Value served without a binding
    pub fn default_value(&self) -> &VariantValue {
        &self.default_value
    }

    /// Options, always starting with the default
    pub fn options(&self) -> &[VariantValue] {
        &self.options
    }

    /// Replace the binding
    pub fn bind(&self, binding: VariantBinding) {
        *self.binding.write() = Some(Arc::new(binding));
    }

    /// Drop the binding; the default is served from now on
    pub fn unbind(&self) {
        *self.binding.write() = None;
    }

    /// Current binding
    pub fn binding(&self) -> Option<Arc<VariantBinding>> {
        self.binding.read().clone()
    }

    /// Current bound condition
    pub fn condition(&self) -> Option<String> {
        self.binding().map(|binding| binding.condition.clone())
    }

    /// Evaluate the variant for a caller and report an impression when targeted
    pub fn value(&self, context: &Context) -> VariantValue {
        let Some(binding) = self.binding() else {
            return self.default_value.clone();
        };
        let context = Context::merge(&binding.global_context, context);
        let Some(value) = self.targeted_value(&binding, &context, None) else {
            return self.default_value.clone();
        };

        if let Some(invoker) = &binding.impression_invoker {
            let impression = Impression {
                flag_name: self.name().to_string(),
                value: value.to_string(),
                targeted: true,
                experiment: binding.experiment.clone(),
                context,
            };
            dispatch(invoker.as_ref(), &impression);
        }
        value
    }

    /// [`Variant::value`] stringified
    pub fn value_as_string(&self, context: &Context) -> String {
        self.value(context).to_string()
    }

    /// Evaluate inside an enclosing evaluation; no impression is reported
    pub(crate) fn evaluate_nested(&self, context: &Context, frame: &mut EvaluationFrame) -> String {
        let value = self.binding().and_then(|binding| {
            let context = Context::merge(&binding.global_context, context);
            self.targeted_value(&binding, &context, Some(frame))
        });
        value.unwrap_or_else(|| self.default_value.clone()).to_string()
    }

    fn targeted_value(
        &self,
        binding: &VariantBinding,
        context: &Context,
        frame: Option<&mut EvaluationFrame>,
    ) -> Option<VariantValue> {
        let Some(parser) = binding.parser.upgrade() else {
            log::warn!("Flag '{}' is bound to a parser that was dropped", self.name());
            return None;
        };

        let result = match frame {
            Some(frame) => parser.evaluate_in_frame(&binding.condition, context, frame),
            None => {
                // the flag being served is active for its own condition
                let mut frame = EvaluationFrame::new(parser.config().max_recursion_depth);
                if let Err(err) = frame.enter(ReferenceKind::Flag, self.name()) {
                    log::trace!(
                        "Flag '{}' not guarded against self-reference: {err}",
                        self.name()
                    );
                }
                parser.evaluate_in_frame(&binding.condition, context, &mut frame)
            }
        };
        let value = result.value()?;
        let accepted = self.kind.accept(value);
        if accepted.is_none() {
            log::debug!(
                "Flag '{}' of kind {} ignored a {} result",
                self.name(),
                self.kind,
                value.type_name()
            );
        }
        accepted
    }
}

impl fmt::Debug for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Variant")
            .field("name", &self.name())
            .field("kind", &self.kind)
            .field("default_value", &self.default_value)
            .field("options", &self.options)
            .field("binding", &self.binding())
            .finish()
    }
}
