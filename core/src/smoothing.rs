use std::collections::VecDeque;

/// Rullende aritmetisk snitt over de siste `capacity` verdiene.
#[derive(Debug, Clone)]
pub struct RollingMean {
    capacity: usize,
    values: VecDeque<f64>,
}

impl RollingMean {
    /// `capacity` 0 behandles som 1.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self { capacity, values: VecDeque::with_capacity(capacity) }
    }

    /// Legger til en verdi og returnerer nytt snitt.
    pub fn push(&mut self, v: f64) -> f64 {
        if self.values.len() == self.capacity {
            self.values.pop_front();
        }
        self.values.push_back(v);
        self.mean()
    }

    /// Snitt av vinduet; 0 når tomt.
    pub fn mean(&self) -> f64 {
        if self.values.is_empty() {
            return 0.0;
        }
        self.values.iter().sum::<f64>() / self.values.len() as f64
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn clear(&mut self) {
        self.values.clear();
    }
}

/// Snitt av en serie; 0 for tom serie.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}
