//! Smoothing and differentiation of sampled curves.

/// Widest kernel half-width evaluated; weights past it are dropped.
const MAX_RADIUS: f64 = (1u64 << 20) as f64;

/// Smooth `data` with a normalized Gaussian kernel of standard deviation
/// `sigma` samples, truncated at `truncate * sigma`.
///
/// Samples beyond either end are mirrored about the edge, the edge sample
/// included (`d c b a | a b c d | d c b a`). A non-positive or non-finite
/// `sigma` returns the input unchanged.
pub fn gaussian_smooth(data: &[f64], sigma: f64, truncate: f64) -> Vec<f64> {
    if data.is_empty() || !sigma.is_finite() || sigma <= 0.0 {
        return data.to_vec();
    }

    let radius = (truncate * sigma + 0.5).clamp(0.0, MAX_RADIUS) as usize;
    let n = data.len();
    let kernel = gaussian_kernel(sigma, radius, 2 * n);
    let n = n as isize;
    let radius = radius as isize;

    (0..n)
        .map(|i| {
            kernel
                .iter()
                .enumerate()
                .map(|(k, w)| w * data[reflect_index(i + k as isize - radius, n)])
                .sum()
        })
        .collect()
}

/// Normalized weights for offsets `-radius..=radius`.
///
/// Reflection repeats with `period`, so a kernel wider than that is folded
/// onto `period` slots; slot `k` then weighs every offset `x` with
/// `x + radius ≡ k (mod period)`.
fn gaussian_kernel(sigma: f64, radius: usize, period: usize) -> Vec<f64> {
    let width = (2 * radius + 1).min(period);
    let denom = 2.0 * sigma * sigma;
    let mut kernel = vec![0.0; width];
    for k in 0..=2 * radius {
        let x = k as f64 - radius as f64;
        // `denom` may underflow to zero for tiny sigma.
        let weight = if k == radius { 1.0 } else { (-(x * x) / denom).exp() };
        kernel[k % width] += weight;
    }
    let total: f64 = kernel.iter().sum();
    for w in &mut kernel {
        *w /= total;
    }
    kernel
}

/// Map an index outside `0..n` back into range by mirroring, repeating as
/// often as needed for kernels wider than the signal.
fn reflect_index(i: isize, n: isize) -> usize {
    let period = 2 * n;
    let m = i.rem_euclid(period);
    (if m >= n { period - 1 - m } else { m }) as usize
}

/// Derivative of `values` with respect to `positions`.
///
/// Interior points use second-order central differences that account for
/// uneven spacing; the two end points use one-sided differences. Fewer than
/// two samples yield an empty result.
pub fn gradient(values: &[f64], positions: &[f64]) -> Vec<f64> {
    let n = values.len().min(positions.len());
    if n < 2 {
        return Vec::new();
    }

    let mut out = Vec::with_capacity(n);
    out.push((values[1] - values[0]) / (positions[1] - positions[0]));
    for i in 1..n - 1 {
        let dx1 = positions[i] - positions[i - 1];
        let dx2 = positions[i + 1] - positions[i];
        let a = -dx2 / (dx1 * (dx1 + dx2));
        let b = (dx2 - dx1) / (dx1 * dx2);
        let c = dx1 / (dx2 * (dx1 + dx2));
        out.push(a * values[i - 1] + b * values[i] + c * values[i + 1]);
    }
    out.push((values[n - 1] - values[n - 2]) / (positions[n - 1] - positions[n - 2]));
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn reflect_mirrors_including_edge() {
        // d c b a | a b c d | d c b a
        let n = 4;
        assert_eq!(reflect_index(-1, n), 0);
        assert_eq!(reflect_index(-4, n), 3);
        assert_eq!(reflect_index(4, n), 3);
        assert_eq!(reflect_index(7, n), 0);
        assert_eq!(reflect_index(8, n), 0);
        assert_eq!(reflect_index(-5, 1), 0);
    }

    #[test]
    fn smoothing_preserves_constant_signal() {
        let data = vec![-12.5; 37];
        let smoothed = gaussian_smooth(&data, 50.0, 4.0);
        assert_eq!(smoothed.len(), data.len());
        assert!(smoothed.iter().all(|&v| close(v, -12.5)));
    }

    #[test]
    fn smoothing_spreads_an_impulse_symmetrically() {
        let mut data = vec![0.0; 101];
        data[50] = 1.0;
        let smoothed = gaussian_smooth(&data, 3.0, 4.0);
        let total: f64 = smoothed.iter().sum();
        assert!(close(total, 1.0));
        assert!(smoothed[50] < 1.0);
        assert!(close(smoothed[47], smoothed[53]));
        assert!(smoothed[49] > smoothed[48]);
    }

    /// Direct sum over the full kernel, without folding.
    fn smooth_unfolded(data: &[f64], sigma: f64, radius: isize) -> Vec<f64> {
        let n = data.len() as isize;
        let weight = |x: isize| (-((x * x) as f64) / (2.0 * sigma * sigma)).exp();
        let total: f64 = (-radius..=radius).map(weight).sum();
        (0..n)
            .map(|i| {
                (-radius..=radius)
                    .map(|x| weight(x) * data[reflect_index(i + x, n)])
                    .sum::<f64>()
                    / total
            })
            .collect()
    }

    #[test]
    fn kernel_wider_than_signal_matches_direct_sum() {
        let data = [3.0, -1.0, 4.0, 1.5, -5.0];
        // radius 12 spans more than one reflection period of 10.
        let smoothed = gaussian_smooth(&data, 3.0, 4.0);
        let expected = smooth_unfolded(&data, 3.0, 12);
        for (a, b) in smoothed.iter().zip(&expected) {
            assert!(close(*a, *b), "{a} != {b}");
        }
    }

    #[test]
    fn huge_sigma_averages_without_blowing_up() {
        let data = [1.0, 2.0, 3.0, 6.0];
        for sigma in [1e12, f64::MAX] {
            let smoothed = gaussian_smooth(&data, sigma, 4.0);
            assert_eq!(smoothed.len(), data.len());
            for v in smoothed {
                assert!((v - 3.0).abs() < 1e-5, "sigma {sigma}: {v}");
            }
        }
    }

    #[test]
    fn zero_sigma_is_identity() {
        let data = vec![1.0, 5.0, 2.0];
        assert_eq!(gaussian_smooth(&data, 0.0, 4.0), data);
    }

    #[test]
    fn gradient_of_quadratic_is_exact_inside() {
        let x: Vec<f64> = (0..10).map(|i| i as f64 * 0.5).collect();
        let y: Vec<f64> = x.iter().map(|v| v * v).collect();
        let g = gradient(&y, &x);
        assert_eq!(g.len(), 10);
        for i in 1..9 {
            assert!(close(g[i], 2.0 * x[i]));
        }
        // One-sided ends.
        assert!(close(g[0], (y[1] - y[0]) / 0.5));
        assert!(close(g[9], (y[9] - y[8]) / 0.5));
    }

    #[test]
    fn gradient_handles_uneven_spacing() {
        let x = [0.0, 1.0, 3.0, 6.0];
        let y: Vec<f64> = x.iter().map(|v| 4.0 * v - 1.0).collect();
        let g = gradient(&y, &x);
        assert!(g.iter().all(|&v| close(v, 4.0)));
    }

    #[test]
    fn gradient_needs_two_points() {
        assert!(gradient(&[1.0], &[0.0]).is_empty());
        assert!(gradient(&[], &[]).is_empty());
    }
}
