/// Last value observed on a signal.
///
/// A binding that combines several signals fires only once every input has
/// produced a value, and then again on each later update of any input.
#[derive(Debug, Clone)]
pub struct Latest<T> {
    value: Option<T>,
}

impl<T> Default for Latest<T> {
    fn default() -> Self {
        Self { value: None }
    }
}

impl<T> Latest<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores `value`, returning the one it replaced.
    pub fn set(&mut self, value: T) -> Option<T> {
        self.value.replace(value)
    }

    pub fn get(&self) -> Option<&T> {
        self.value.as_ref()
    }

    pub fn clear(&mut self) {
        self.value = None;
    }

    pub fn has_fired(&self) -> bool {
        self.value.is_some()
    }

    pub fn zip<'a, U>(&'a self, other: &'a Latest<U>) -> Option<(&'a T, &'a U)> {
        Some((self.get()?, other.get()?))
    }
}
