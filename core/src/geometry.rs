use crate::types::JointPosition;

/// Minste lengde brukt for null-vektorer (a == b eller c == b).
pub const MIN_MAGNITUDE: f64 = 1e-6;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vec3 {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Vec3 {
    /// Vektor fra `from` til `to`; manglende z tolkes som 0.
    pub fn between(from: &JointPosition, to: &JointPosition) -> Self {
        Self {
            x: to.x - from.x,
            y: to.y - from.y,
            z: to.z.unwrap_or(0.0) - from.z.unwrap_or(0.0),
        }
    }

    #[inline]
    pub fn dot(&self, o: &Vec3) -> f64 {
        self.x * o.x + self.y * o.y + self.z * o.z
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Vinkel (grader, 0–180) i toppunkt `b` mellom strålene b→a og b→c.
///
/// Cosinus klemmes til [-1, 1] før acos. Null-lengde stråler gir aldri
/// deling på null: lengden erstattes med `MIN_MAGNITUDE`.
pub fn angle_at(a: &JointPosition, b: &JointPosition, c: &JointPosition) -> f64 {
    let v1 = Vec3::between(b, a);
    let v2 = Vec3::between(b, c);

    let m1 = nonzero(v1.norm());
    let m2 = nonzero(v2.norm());

    let cos = (v1.dot(&v2) / (m1 * m2)).clamp(-1.0, 1.0);
    let deg = cos.acos().to_degrees();
    if deg.is_finite() { deg } else { 0.0 }
}

#[inline]
fn nonzero(m: f64) -> f64 {
    if m > 0.0 && m.is_finite() { m } else { MIN_MAGNITUDE }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nonzero_replaces_zero_and_nan() {
        assert_eq!(nonzero(0.0), MIN_MAGNITUDE);
        assert_eq!(nonzero(f64::NAN), MIN_MAGNITUDE);
        assert_eq!(nonzero(2.0), 2.0);
    }
}
