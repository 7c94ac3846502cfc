//! Parameter grids
use serde::{Deserialize, Serialize};

/// Values from `start` up to but excluding `stop`, spaced by `step`
///
/// Values are computed as `start + i * step` so they don't accumulate rounding error. A step that
/// can't reach `stop` (zero, or of the wrong sign) gives an empty grid.
pub fn arange(start: f64, stop: f64, step: f64) -> Vec<f64> {
    let count = ((stop - start) / step).ceil();
    if !count.is_finite() || count <= 0. {
        return Vec::new();
    }
    (0..count as usize).map(|i| start + i as f64 * step).collect()
}

/// `num` evenly spaced values from `start` to `stop`, both included
pub fn linspace(start: f64, stop: f64, num: usize) -> Vec<f64> {
    match num {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (stop - start) / (num - 1) as f64;
            (0..num)
                .map(|i| {
                    if i == num - 1 {
                        stop
                    } else {
                        start + i as f64 * step
                    }
                })
                .collect()
        }
    }
}

/// A grid as written in a sweep configuration file
///
/// ```toml
/// ammonia = { range = { start = 0.0, stop = 100.0, step = 10.0 } }
/// maintenance = { linspace = { start = 0.0, stop = 20.0, num = 5 } }
/// glucose = { values = [10.0, 15.0, 20.0] }
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Grid {
    Range { start: f64, stop: f64, step: f64 },
    Linspace { start: f64, stop: f64, num: usize },
    Values(Vec<f64>),
}

impl Grid {
    pub fn values(&self) -> Vec<f64> {
        match self {
            Grid::Range { start, stop, step } => arange(*start, *stop, *step),
            Grid::Linspace { start, stop, num } => linspace(*start, *stop, *num),
            Grid::Values(values) => values.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arange_excludes_stop() {
        let values = arange(0., 100., 10.);
        assert_eq!(values.len(), 10);
        assert!((values[0] - 0.).abs() < 1e-25);
        assert!((values[9] - 90.).abs() < 1e-12);
    }

    #[test]
    fn arange_integer_glucose() {
        let values = arange(10., 21., 1.);
        assert_eq!(values.len(), 11);
        for (i, v) in values.iter().enumerate() {
            assert!((v - (10. + i as f64)).abs() < 1e-12);
        }
    }

    #[test]
    fn arange_empty() {
        assert!(arange(0., 10., 0.).is_empty());
        assert!(arange(10., 0., 1.).is_empty());
        assert!(arange(5., 5., 1.).is_empty());
    }

    #[test]
    fn linspace_includes_both_ends() {
        let values = linspace(0., 20., 5);
        assert_eq!(values.len(), 5);
        for (v, expected) in values.iter().zip([0., 5., 10., 15., 20.]) {
            assert!((v - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn linspace_small() {
        assert!(linspace(0., 1., 0).is_empty());
        assert_eq!(linspace(3., 7., 1), vec![3.]);
    }

    #[test]
    fn grid_values() {
        let grid = Grid::Range {
            start: 0.,
            stop: 30.,
            step: 10.,
        };
        assert_eq!(grid.values().len(), 3);
        let grid = Grid::Values(vec![1., 2.]);
        assert_eq!(grid.values(), vec![1., 2.]);
    }
}
