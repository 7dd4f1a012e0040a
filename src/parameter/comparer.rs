//! Equality strategies used to decide whether a parameter changed.
//!
//! A [`Comparer`] is resolved on *every* comparison. This matters for the
//! parameter-sourced case: the strategy is built from another parameter's
//! value after the current cycle's base apply, so a tolerance supplied in the
//! same update already applies to this update.

use std::rc::Rc;

use super::slot::ParameterSlot;

// =============================================================================
// Equality Strategy
// =============================================================================

/// Decides whether two values are equal for change detection.
pub trait EqualityComparer<T> {
    fn equals(&self, a: &T, b: &T) -> bool;
}

impl<T, F> EqualityComparer<T> for F
where
    F: Fn(&T, &T) -> bool,
{
    fn equals(&self, a: &T, b: &T) -> bool {
        self(a, b)
    }
}

/// `PartialEq` equality.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultComparer;

impl<T: PartialEq> EqualityComparer<T> for DefaultComparer {
    fn equals(&self, a: &T, b: &T) -> bool {
        a == b
    }
}

/// Numeric tolerance: values closer than `epsilon` are equal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tolerance {
    pub epsilon: f64,
}

impl Tolerance {
    /// Tolerance of `epsilon`.
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }
}

impl EqualityComparer<f64> for Tolerance {
    fn equals(&self, a: &f64, b: &f64) -> bool {
        (a - b).abs() < self.epsilon
    }
}

impl EqualityComparer<f32> for Tolerance {
    fn equals(&self, a: &f32, b: &f32) -> bool {
        f64::from(a - b).abs() < self.epsilon
    }
}

// =============================================================================
// Comparer
// =============================================================================

/// Shared equality strategy.
pub type SharedComparer<T> = Rc<dyn EqualityComparer<T>>;

/// How a slot obtains its equality strategy.
pub enum Comparer<T> {
    /// Same strategy for the slot's whole lifetime.
    Fixed(SharedComparer<T>),
    /// Re-evaluated on every comparison, so the strategy can be swapped over time.
    Supplier(Rc<dyn Fn() -> SharedComparer<T>>),
    /// Resolved from another tracked parameter's current value.
    Parameter {
        source: String,
        resolve: Rc<dyn Fn() -> SharedComparer<T>>,
    },
}

impl<T> Clone for Comparer<T> {
    fn clone(&self) -> Self {
        match self {
            Comparer::Fixed(c) => Comparer::Fixed(c.clone()),
            Comparer::Supplier(f) => Comparer::Supplier(f.clone()),
            Comparer::Parameter { source, resolve } => Comparer::Parameter {
                source: source.clone(),
                resolve: resolve.clone(),
            },
        }
    }
}

impl<T: PartialEq + 'static> Default for Comparer<T> {
    fn default() -> Self {
        Comparer::Fixed(Rc::new(DefaultComparer))
    }
}

impl<T: 'static> Comparer<T> {
    /// Fixed strategy.
    pub fn fixed(comparer: impl EqualityComparer<T> + 'static) -> Self {
        Comparer::Fixed(Rc::new(comparer))
    }

    /// Strategy re-supplied on every comparison.
    pub fn supplier<C, F>(supply: F) -> Self
    where
        C: EqualityComparer<T> + 'static,
        F: Fn() -> C + 'static,
    {
        Comparer::Supplier(Rc::new(move || Rc::new(supply()) as SharedComparer<T>))
    }

    /// Strategy built from another parameter's live value.
    ///
    /// The source parameter is read through its value getter at comparison
    /// time, so it reflects the value assigned in the current cycle.
    pub fn from_parameter<S, C, F>(source: &Rc<ParameterSlot<S>>, resolve: F) -> Self
    where
        S: Clone + PartialEq + 'static,
        C: EqualityComparer<T> + 'static,
        F: Fn(&S) -> C + 'static,
    {
        let slot = source.clone();
        Comparer::Parameter {
            source: source.name().to_string(),
            resolve: Rc::new(move || Rc::new(resolve(&slot.current())) as SharedComparer<T>),
        }
    }

    /// Resolve the strategy to use right now.
    pub fn resolve(&self) -> SharedComparer<T> {
        match self {
            Comparer::Fixed(c) => c.clone(),
            Comparer::Supplier(supply) => supply(),
            Comparer::Parameter { resolve, .. } => resolve(),
        }
    }

    /// Name of the parameter this comparer is resolved from, if any.
    pub fn source_name(&self) -> Option<&str> {
        match self {
            Comparer::Parameter { source, .. } => Some(source),
            _ => None,
        }
    }

    /// Compare with the strategy resolved at call time.
    pub fn equals(&self, a: &T, b: &T) -> bool {
        self.resolve().equals(a, b)
    }
}
