use glam::Vec2;

/// A line between two nearby particles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    /// `1 - distance / radius`, in `(0, 1]`
    pub strength: f32,
}

/// Pairs `(i, j)` with `i < j` closer than `radius`, scanned in index order
/// and truncated at `max` pairs.
pub fn find_connections(positions: &[Vec2], radius: f32, max: usize) -> Vec<Connection> {
    let mut out = Vec::new();
    if radius <= 0.0 {
        return out;
    }
    'outer: for i in 0..positions.len() {
        for j in (i + 1)..positions.len() {
            if out.len() >= max {
                break 'outer;
            }
            let distance = positions[i].distance(positions[j]);
            if distance < radius {
                out.push(Connection {
                    a: i,
                    b: j,
                    strength: 1.0 - distance / radius,
                });
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connections_respect_radius_and_cap() {
        let pts = vec![Vec2::ZERO, Vec2::new(10.0, 0.0), Vec2::new(500.0, 0.0), Vec2::new(5.0, 0.0)];
        let all = find_connections(&pts, 100.0, 10);
        assert_eq!(all.len(), 3);
        assert!(all.iter().all(|c| c.a < c.b && c.b != 2 && c.a != 2));
        assert!((all[0].strength - 0.9).abs() < 1e-6);

        let capped = find_connections(&pts, 100.0, 1);
        assert_eq!(capped.len(), 1);
        assert_eq!((capped[0].a, capped[0].b), (0, 1));
    }
}
