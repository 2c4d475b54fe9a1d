/// Reusable pool of render primitives handed out per frame.
///
/// Arena + cursor: `begin` resets the cursor, `next` hands out the element
/// under it and advances, growing through the supplied constructor only when
/// the frame needs more elements than any frame before it. Once the pool has
/// grown to the peak frame size, frames allocate nothing.
pub struct ObjectPool<T> {
    elements: Vec<T>,
    cursor: usize,
    construct: Box<dyn FnMut() -> T + Send>,
}

impl<T> ObjectPool<T> {
    pub fn new(mut construct: impl FnMut() -> T + Send + 'static, initial_size: usize) -> Self {
        let elements = (0..initial_size).map(|_| construct()).collect();
        Self {
            elements,
            cursor: 0,
            construct: Box::new(construct),
        }
    }

    /// Resets the frame cursor; previously handed-out elements are reused
    pub fn begin(&mut self) {
        self.cursor = 0;
    }

    /// The pooled element at the cursor, growing the pool if exhausted
    pub fn next(&mut self) -> &mut T {
        if self.cursor >= self.elements.len() {
            self.elements.push((self.construct)());
        }
        let element = &mut self.elements[self.cursor];
        self.cursor += 1;
        element
    }

    /// Elements handed out since the last `begin`, in order
    pub fn in_use(&self) -> &[T] {
        &self.elements[..self.cursor]
    }

    /// Total elements currently allocated
    pub fn capacity(&self) -> usize {
        self.elements.len()
    }

    /// Drops every pooled element and resets the cursor
    pub fn clear(&mut self) {
        self.elements.clear();
        self.cursor = 0;
    }
}

impl<T> std::fmt::Debug for ObjectPool<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ObjectPool")
            .field("capacity", &self.elements.len())
            .field("cursor", &self.cursor)
            .finish()
    }
}
