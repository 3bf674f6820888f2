// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A fixed-capacity circular buffer.

/// A fixed-size circular buffer that overwrites its oldest element when full.
///
/// Storage is allocated once at construction; pushing never allocates, which
/// makes it suitable for per-frame sample histories.
#[derive(Debug, Clone)]
pub struct RingBuffer<T, const N: usize> {
    data: [T; N],
    index: usize,
    count: usize,
}

impl<T: Default + Clone, const N: usize> RingBuffer<T, N> {
    /// Creates a new, empty ring buffer.
    pub fn new() -> Self {
        Self {
            data: std::array::from_fn(|_| T::default()),
            index: 0,
            count: 0,
        }
    }

    /// Pushes a new value, returning the evicted oldest value if the buffer was full.
    pub fn push(&mut self, value: T) -> Option<T> {
        let evicted = std::mem::replace(&mut self.data[self.index], value);
        self.index = (self.index + 1) % N;
        if self.count < N {
            self.count += 1;
            None
        } else {
            Some(evicted)
        }
    }

    /// Removes every element, keeping the storage.
    pub fn clear(&mut self) {
        for slot in self.data.iter_mut() {
            *slot = T::default();
        }
        self.index = 0;
        self.count = 0;
    }
}

impl<T, const N: usize> RingBuffer<T, N> {
    /// Returns the number of elements currently in the buffer.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the fixed capacity of the buffer.
    pub const fn capacity(&self) -> usize {
        N
    }

    /// Returns `true` if the buffer holds no elements.
    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Returns `true` once the buffer has wrapped at least once.
    pub fn is_full(&self) -> bool {
        self.count == N
    }

    /// Returns the most recently pushed element.
    pub fn latest(&self) -> Option<&T> {
        if self.count == 0 {
            return None;
        }
        Some(&self.data[(self.index + N - 1) % N])
    }

    /// Returns an iterator over the values in chronological order (oldest to newest).
    pub fn iter(&self) -> impl Iterator<Item = &T> + '_ {
        let start = if self.count < N { 0 } else { self.index };
        (0..self.count).map(move |i| &self.data[(start + i) % N])
    }
}

impl<T: PartialEq, const N: usize> RingBuffer<T, N> {
    /// Returns `true` if an equal value is currently held.
    pub fn contains(&self, value: &T) -> bool {
        self.iter().any(|v| v == value)
    }
}

impl<T: Default + Clone, const N: usize> Default for RingBuffer<T, N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> RingBuffer<f32, N> {
    /// Calculates the arithmetic mean of the values in the buffer.
    pub fn average(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        self.iter().sum::<f32>() / self.count as f32
    }

    /// Difference between the mean of the newest half and the mean of the oldest half.
    ///
    /// Positive when the values are increasing.
    pub fn trend(&self) -> f32 {
        if self.count < 2 {
            return 0.0;
        }
        let half = self.count / 2;
        let first_half_avg: f32 = self.iter().take(half).sum::<f32>() / half as f32;
        let last_half_avg: f32 = self.iter().skip(self.count - half).sum::<f32>() / half as f32;
        last_half_avg - first_half_avg
    }

    /// Calculates the population variance of the values in the buffer.
    pub fn variance(&self) -> f32 {
        if self.count < 2 {
            return 0.0;
        }
        let avg = self.average();
        self.iter().map(|v| (v - avg) * (v - avg)).sum::<f32>() / self.count as f32
    }

    /// Returns the minimum value in the buffer, or `0.0` if empty.
    pub fn min(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        self.iter().copied().fold(f32::MAX, f32::min)
    }

    /// Returns the maximum value in the buffer, or `0.0` if empty.
    pub fn max(&self) -> f32 {
        if self.count == 0 {
            return 0.0;
        }
        self.iter().copied().fold(f32::MIN, f32::max)
    }
}
