//! Construction strategy for deserialized values

use std::fmt;

/// Produces the initial value a deserializing walk overwrites in place.
///
/// One capability covers both a prototype that is cloned and an arbitrary
/// constructor.
pub struct ValueFactory<T>(Box<dyn Fn() -> T + Send + Sync>);

impl<T> ValueFactory<T> {
    /// Build values with `constructor`
    pub fn constructor<F>(constructor: F) -> Self
    where
        F: Fn() -> T + Send + Sync + 'static,
    {
        Self(Box::new(constructor))
    }

    /// Build values by cloning `prototype`
    pub fn template(prototype: T) -> Self
    where
        T: Clone + Send + Sync + 'static,
    {
        Self(Box::new(move || prototype.clone()))
    }

    /// Produce a fresh value
    pub fn make(&self) -> T {
        (self.0)()
    }
}

impl<T: Default + 'static> Default for ValueFactory<T> {
    fn default() -> Self {
        Self(Box::new(T::default))
    }
}

impl<T> fmt::Debug for ValueFactory<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueFactory")
            .field("type", &std::any::type_name::<T>())
            .finish()
    }
}
