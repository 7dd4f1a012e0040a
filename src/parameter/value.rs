//! Value sources - where a slot reads its live value from.
//!
//! A slot never owns the component's value. It reads it through a
//! [`ValueSource`] after the host framework has assigned the incoming view.

use std::rc::Rc;

use spark_signals::Signal;

/// Getter into live component state.
pub type ValueGetter<T> = Rc<dyn Fn() -> T>;

/// Setter into live component state (two-way binding path only).
pub type ValueSetter<T> = Rc<dyn Fn(T)>;

/// A live value that can be a signal, a plain getter, or a getter/setter pair.
#[derive(Clone)]
pub enum ValueSource<T: Clone + PartialEq + 'static> {
    /// Read-only getter (called on every read).
    Getter(ValueGetter<T>),
    /// Reactive signal (readable and writable).
    Signal(Signal<T>),
    /// Getter with an explicit setter.
    Writable { get: ValueGetter<T>, set: ValueSetter<T> },
}

impl<T: Clone + PartialEq + 'static> ValueSource<T> {
    /// Build a read-only source from a closure.
    pub fn getter(get: impl Fn() -> T + 'static) -> Self {
        ValueSource::Getter(Rc::new(get))
    }

    /// Build a writable source from a getter/setter pair.
    pub fn writable(get: impl Fn() -> T + 'static, set: impl Fn(T) + 'static) -> Self {
        ValueSource::Writable {
            get: Rc::new(get),
            set: Rc::new(set),
        }
    }

    /// Read the current live value.
    pub fn get(&self) -> T {
        match self {
            ValueSource::Getter(get) => get(),
            ValueSource::Signal(signal) => signal.get(),
            ValueSource::Writable { get, .. } => get(),
        }
    }

    /// Write a new live value.
    ///
    /// Returns `false` when the source is read-only.
    pub fn set(&self, value: T) -> bool {
        match self {
            ValueSource::Getter(_) => false,
            ValueSource::Signal(signal) => {
                signal.set(value);
                true
            }
            ValueSource::Writable { set, .. } => {
                set(value);
                true
            }
        }
    }

    /// True when [`set`](Self::set) can write.
    pub fn is_writable(&self) -> bool {
        !matches!(self, ValueSource::Getter(_))
    }
}

impl<T: Clone + PartialEq + 'static> From<Signal<T>> for ValueSource<T> {
    fn from(signal: Signal<T>) -> Self {
        ValueSource::Signal(signal)
    }
}

impl<T: Clone + PartialEq + 'static> From<ValueGetter<T>> for ValueSource<T> {
    fn from(get: ValueGetter<T>) -> Self {
        ValueSource::Getter(get)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use spark_signals::signal;

    #[test]
    fn test_getter_reads_live_value() {
        let state = Rc::new(Cell::new(1));
        let state_clone = state.clone();
        let source = ValueSource::getter(move || state_clone.get());

        assert_eq!(source.get(), 1);
        state.set(7);
        assert_eq!(source.get(), 7);
        assert!(!source.is_writable());
        assert!(!source.set(9));
        assert_eq!(state.get(), 7);
    }

    #[test]
    fn test_signal_source() {
        let width = signal(10u16);
        let source: ValueSource<u16> = width.clone().into();

        assert_eq!(source.get(), 10);
        assert!(source.set(20));
        assert_eq!(width.get(), 20);
    }

    #[test]
    fn test_writable_source() {
        let state = Rc::new(Cell::new(0i32));
        let read = state.clone();
        let write = state.clone();
        let source = ValueSource::writable(move || read.get(), move |v| write.set(v));

        assert!(source.is_writable());
        assert!(source.set(5));
        assert_eq!(source.get(), 5);
        assert_eq!(state.get(), 5);
    }
}
