use std::collections::VecDeque;
use std::fmt;

/// A single response-producing unit.
///
/// Every behavior is a computed one: it wraps a function of the call's
/// arguments. Fixed values are computed behaviors that clone what they store.
pub struct Behavior<A, R> {
    produce: Box<dyn FnMut(&A) -> R>,
}

impl<A, R> Behavior<A, R> {
    /// Wrap an arbitrary response function
    pub fn new<F>(f: F) -> Self
    where
        F: FnMut(&A) -> R + 'static,
    {
        Self {
            produce: Box::new(f),
        }
    }

    /// Answer with a value computed from the call's arguments
    pub fn computed<F>(f: F) -> Self
    where
        F: FnMut(&A) -> R + 'static,
    {
        Self::new(f)
    }

    /// Run the wrapped response logic
    pub fn produce(&mut self, args: &A) -> R {
        (self.produce)(args)
    }
}

impl<A: 'static, R: 'static> Behavior<A, R> {
    /// Always answer with a clone of `value`
    pub fn returning(value: R) -> Self
    where
        R: Clone,
    {
        Self::new(move |_| value.clone())
    }

    /// Answer with the return type's default value
    pub fn default_value() -> Self
    where
        R: Default,
    {
        Self::new(|_| R::default())
    }

    /// Fail the call by panicking with `message`.
    ///
    /// The panic is not caught anywhere in the engine, so it reaches the
    /// code under test exactly as a failing collaborator would.
    pub fn panicking(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::new(move |_| panic!("{}", message))
    }
}

impl<A, R> fmt::Debug for Behavior<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Behavior").finish_non_exhaustive()
    }
}

/// Ordered behaviors of one expectation.
///
/// Consumed front to back; the last remaining behavior is reused forever
/// instead of being removed, so `[1, 2, 3]` answers `1, 2, 3, 3, 3, ...`.
pub struct BehaviorQueue<A, R> {
    behaviors: VecDeque<Behavior<A, R>>,
}

impl<A, R> BehaviorQueue<A, R> {
    pub fn new() -> Self {
        Self {
            behaviors: VecDeque::new(),
        }
    }

    /// Create a queue seeded with one behavior
    pub fn with(behavior: Behavior<A, R>) -> Self {
        let mut queue = Self::new();
        queue.append(behavior);
        queue
    }

    /// Add a behavior to the end of the queue
    pub fn append(&mut self, behavior: Behavior<A, R>) {
        self.behaviors.push_back(behavior);
    }

    /// Produce the next answer.
    ///
    /// Returns `None` only when the queue holds no behavior at all.
    pub fn consume_next(&mut self, args: &A) -> Option<R> {
        if self.behaviors.len() > 1 {
            let mut behavior = self.behaviors.pop_front()?;
            return Some(behavior.produce(args));
        }
        self.behaviors.front_mut().map(|behavior| behavior.produce(args))
    }

    pub fn len(&self) -> usize {
        self.behaviors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.behaviors.is_empty()
    }

    /// Drop every queued behavior
    pub fn clear(&mut self) {
        self.behaviors.clear();
    }
}

impl<A, R> Default for BehaviorQueue<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A, R> Extend<Behavior<A, R>> for BehaviorQueue<A, R> {
    fn extend<I: IntoIterator<Item = Behavior<A, R>>>(&mut self, iter: I) {
        self.behaviors.extend(iter);
    }
}

impl<A, R> fmt::Debug for BehaviorQueue<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BehaviorQueue")
            .field("len", &self.behaviors.len())
            .finish()
    }
}
