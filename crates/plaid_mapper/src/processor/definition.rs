use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use super::{FormatProvider, InvariantFormat, Processor, ScalarSupport, default_processors};
use crate::MapError;
use crate::registry::TypeRegistry;

/// How derived objects are laid out in plain data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum ObjectLayout {
    /// A lookup keyed by member name or `key` override.
    #[default]
    Lookup,
    /// A sequence indexed by declaration position or `index` override.
    ///
    /// Types taking part in type resolution reserve slot 0 for the
    /// discriminator; their members start at 1.
    Sequence,
}

/// The composition root of a wire format.
///
/// Owns the ordered processor list, the natively supported scalars, the
/// text format for everything else, the object layout, and the registry
/// all type queries go through. Cloning is cheap.
#[derive(Clone)]
pub struct Definition {
    processors: Arc<[Arc<dyn Processor>]>,
    scalars: ScalarSupport,
    format: Arc<dyn FormatProvider>,
    layout: ObjectLayout,
    registry: Arc<TypeRegistry>,
    discriminator_key: String,
    parallel: bool,
}

impl Definition {
    /// The key discriminators use unless an entry overrides it.
    pub const DEFAULT_DISCRIMINATOR_KEY: &'static str = "$type";

    #[inline]
    pub fn builder(registry: Arc<TypeRegistry>) -> DefinitionBuilder {
        DefinitionBuilder::new(registry)
    }

    fn preset(registry: Arc<TypeRegistry>, layout: ObjectLayout, scalars: ScalarSupport) -> Self {
        Self {
            processors: default_processors().into(),
            scalars,
            format: Arc::new(InvariantFormat),
            layout,
            registry,
            discriminator_key: Self::DEFAULT_DISCRIMINATOR_KEY.into(),
            parallel: false,
        }
    }

    /// Lookup-style objects with native booleans and numbers.
    #[inline]
    pub fn json(registry: Arc<TypeRegistry>) -> Self {
        Self::preset(registry, ObjectLayout::Lookup, ScalarSupport::ALL)
    }

    /// Sequence-style objects with native booleans and numbers.
    #[inline]
    pub fn sequence(registry: Arc<TypeRegistry>) -> Self {
        Self::preset(registry, ObjectLayout::Sequence, ScalarSupport::ALL)
    }

    /// Lookup-style objects whose scalars are all strings.
    #[inline]
    pub fn dictionary(registry: Arc<TypeRegistry>) -> Self {
        Self::preset(registry, ObjectLayout::Lookup, ScalarSupport::STRINGS)
    }

    #[inline]
    pub fn processors(&self) -> &[Arc<dyn Processor>] {
        &self.processors
    }

    #[inline]
    pub const fn scalars(&self) -> ScalarSupport {
        self.scalars
    }

    #[inline]
    pub fn format(&self) -> &dyn FormatProvider {
        &*self.format
    }

    #[inline]
    pub const fn layout(&self) -> ObjectLayout {
        self.layout
    }

    #[inline]
    pub fn registry(&self) -> &TypeRegistry {
        &self.registry
    }

    #[inline]
    pub fn discriminator_key(&self) -> &str {
        &self.discriminator_key
    }

    /// Whether collection elements and object members may be mapped in parallel.
    ///
    /// Always `false` without the `parallel` feature.
    #[inline]
    pub const fn is_parallel(&self) -> bool {
        self.parallel && cfg!(feature = "parallel")
    }
}

impl fmt::Debug for Definition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Definition")
            .field("processors", &self.processors.iter().map(|p| p.name()).collect::<Vec<_>>())
            .field("scalars", &self.scalars)
            .field("format", &self.format)
            .field("layout", &self.layout)
            .field("discriminator_key", &self.discriminator_key)
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

/// Builds a [`Definition`].
///
/// The builder starts without processors; an empty list is rejected by
/// [`build`](Self::build).
///
/// ```
/// use std::sync::Arc;
/// use plaid_mapper::processor::{Definition, ObjectLayout, ScalarProcessor};
/// use plaid_mapper::registry::TypeRegistry;
/// use plaid_mapper::MapError;
///
/// let registry = Arc::new(TypeRegistry::new());
///
/// let empty = Definition::builder(registry.clone()).build();
/// assert!(matches!(empty, Err(MapError::Configuration(_))));
///
/// let definition = Definition::builder(registry)
///     .processor(ScalarProcessor)
///     .layout(ObjectLayout::Sequence)
///     .discriminator_key("kind")
///     .build()
///     .unwrap();
/// assert_eq!(definition.processors().len(), 1);
/// assert_eq!(definition.discriminator_key(), "kind");
/// ```
pub struct DefinitionBuilder {
    processors: Vec<Arc<dyn Processor>>,
    scalars: ScalarSupport,
    format: Arc<dyn FormatProvider>,
    layout: ObjectLayout,
    registry: Arc<TypeRegistry>,
    discriminator_key: String,
    parallel: bool,
}

impl DefinitionBuilder {
    pub fn new(registry: Arc<TypeRegistry>) -> Self {
        Self {
            processors: Vec::new(),
            scalars: ScalarSupport::ALL,
            format: Arc::new(InvariantFormat),
            layout: ObjectLayout::Lookup,
            registry,
            discriminator_key: Definition::DEFAULT_DISCRIMINATOR_KEY.into(),
            parallel: false,
        }
    }

    /// Appends the [built-in processors](super::default_processors).
    pub fn with_default_processors(mut self) -> Self {
        self.processors.extend(default_processors());
        self
    }

    /// Appends a processor; it is consulted after those added before it.
    pub fn processor(mut self, processor: impl Processor + 'static) -> Self {
        self.processors.push(Arc::new(processor));
        self
    }

    /// Prepends a processor, so it takes precedence over every other one.
    pub fn processor_first(mut self, processor: impl Processor + 'static) -> Self {
        self.processors.insert(0, Arc::new(processor));
        self
    }

    pub fn scalars(mut self, scalars: ScalarSupport) -> Self {
        self.scalars = scalars;
        self
    }

    pub fn format(mut self, format: impl FormatProvider + 'static) -> Self {
        self.format = Arc::new(format);
        self
    }

    pub fn layout(mut self, layout: ObjectLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn discriminator_key(mut self, key: impl Into<String>) -> Self {
        self.discriminator_key = key.into();
        self
    }

    /// Requests parallel element mapping; ignored without the `parallel` feature.
    pub fn parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn build(self) -> Result<Definition, MapError> {
        if self.processors.is_empty() {
            return Err(MapError::Configuration("the processor list is empty".into()));
        }
        if self.discriminator_key.is_empty() {
            return Err(MapError::Configuration("the discriminator key is empty".into()));
        }
        if self.parallel && !cfg!(feature = "parallel") {
            log::warn!("parallel mapping requested without the `parallel` feature, mapping sequentially");
        }
        Ok(Definition {
            processors: self.processors.into(),
            scalars: self.scalars,
            format: self.format,
            layout: self.layout,
            registry: self.registry,
            discriminator_key: self.discriminator_key,
            parallel: self.parallel,
        })
    }
}
