//! Fast Fourier transform and its string-matching applications.
//!
//! The entry point is the [`Fft`] planner. It owns the bit-reversal
//! permutations it has computed so far (one per transform size), so a
//! long-lived planner amortises that setup across calls; the memoisation
//! belongs to the planner instance, never to the process.

use hashbrown::HashMap;

mod complex;

pub use complex::Complex;

/// Transform direction.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Inverse,
}

/// FFT planner and executor.
#[derive(Default)]
pub struct Fft {
    /// Bit-reversal permutation per power-of-two size.
    permutations: HashMap<usize, Vec<usize>>,
}

impl Fft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterative radix-2 Cooley–Tukey transform.
    ///
    /// The input is zero-padded to the next power of two. The inverse
    /// transform divides by the transform length, so
    /// `transform(transform(x, Forward), Inverse)` reproduces `x` up to
    /// rounding.
    ///
    /// # Complexity
    /// * Time complexity: **O(n log n)**.
    /// * Auxiliary space: **O(n)**.
    pub fn transform(&mut self, mut samples: Vec<Complex>, direction: Direction) -> Vec<Complex> {
        let n = samples.len().next_power_of_two();
        samples.resize(n, Complex::ZERO);

        let mut samples = self.bit_reverse(samples);

        let sign = match direction {
            Direction::Forward => 1.0,
            Direction::Inverse => -1.0,
        };
        let mut len = 2;
        while len <= n {
            let arg = sign * 2.0 * std::f64::consts::PI / len as f64;
            let step = Complex::new(arg.cos(), arg.sin());
            for block in samples.chunks_mut(len) {
                let mut w = Complex::new(1.0, 0.0);
                let (lo, hi) = block.split_at_mut(len / 2);
                for (u, v) in lo.iter_mut().zip(hi.iter_mut()) {
                    let t = *v * w;
                    let s = *u;
                    *u = s + t;
                    *v = s - t;
                    w = w * step;
                }
            }
            len <<= 1;
        }

        if direction == Direction::Inverse {
            let scale = 1.0 / n as f64;
            for sample in &mut samples {
                *sample = sample.scaled(scale);
            }
        }
        samples
    }

    /// Transforms of two real signals with one complex transform.
    ///
    /// Packs `z(n) = x(n) + i*y(n)` and unpacks the spectra through the
    /// conjugate symmetry `X[k] = (Z[k] + conj(Z[N-k])) / 2`,
    /// `Y[k] = -i * (Z[k] - conj(Z[N-k])) / 2`.
    pub fn transform_real_pair(&mut self, x: &[f64], y: &[f64]) -> (Vec<Complex>, Vec<Complex>) {
        let len = x.len().max(y.len());
        let joined: Vec<Complex> = (0..len)
            .map(|i| {
                Complex::new(
                    x.get(i).copied().unwrap_or(0.0),
                    y.get(i).copied().unwrap_or(0.0),
                )
            })
            .collect();
        let z = self.transform(joined, Direction::Forward);

        let n = z.len();
        let mut spectrum_x = Vec::with_capacity(n);
        let mut spectrum_y = Vec::with_capacity(n);
        let minus_i = Complex::new(0.0, -1.0);
        for k in 0..n {
            let mirrored = z[(n - k) % n].conj();
            spectrum_x.push((z[k] + mirrored).scaled(0.5));
            spectrum_y.push((minus_i * (z[k] - mirrored)).scaled(0.5));
        }
        (spectrum_x, spectrum_y)
    }

    /// Convolution of two integer sequences, rounded back to integers.
    ///
    /// # Example
    /// ```rust
    /// use algokit::fft::Fft;
    ///
    /// let mut fft = Fft::new();
    /// assert_eq!(fft.convolve(&[1, 2, 3], &[4, 5]), vec![4, 13, 22, 15]);
    /// ```
    pub fn convolve(&mut self, lhs: &[i64], rhs: &[i64]) -> Vec<i64> {
        if lhs.is_empty() || rhs.is_empty() {
            return Vec::new();
        }
        let conv_len = lhs.len() + rhs.len() - 1;
        let mut a: Vec<Complex> = lhs.iter().map(|&v| Complex::real(v as f64)).collect();
        let mut b: Vec<Complex> = rhs.iter().map(|&v| Complex::real(v as f64)).collect();
        a.resize(conv_len, Complex::ZERO);
        b.resize(conv_len, Complex::ZERO);

        let spectrum_a = self.transform(a, Direction::Forward);
        let spectrum_b = self.transform(b, Direction::Forward);
        let product: Vec<Complex> = spectrum_a
            .into_iter()
            .zip(spectrum_b)
            .map(|(u, v)| u * v)
            .collect();
        let samples = self.transform(product, Direction::Inverse);

        samples
            .into_iter()
            .take(conv_len)
            .map(|c| c.re.round() as i64)
            .collect()
    }

    /// Cyclic cross-correlation of two equal-length sequences: entry `s`
    /// is the dot product of `lhs` with `rhs` cyclically shifted by `s`.
    ///
    /// Reduces to a convolution by reversing one operand and doubling the
    /// other against itself.
    pub fn cyclic_correlation(&mut self, lhs: &[i64], rhs: &[i64]) -> Vec<i64> {
        assert_eq!(lhs.len(), rhs.len(), "correlation needs equal lengths");
        let n = lhs.len();
        if n == 0 {
            return Vec::new();
        }
        let mut reversed: Vec<i64> = lhs.iter().rev().copied().collect();
        reversed.resize(2 * n, 0);
        let mut doubled = rhs.to_vec();
        doubled.extend_from_slice(rhs);

        let conv = self.convolve(&reversed, &doubled);
        conv[n - 1..2 * n - 1].to_vec()
    }

    /// All starting positions where `pattern` occurs in `text` exactly.
    ///
    /// Uses the squared-difference expansion: with the pattern reversed,
    /// one convolution yields every alignment's cross term, and the two
    /// square sums complete `B[i] = sum_j (p[j] - t[i+j])^2`; a zero `B[i]`
    /// is an occurrence.
    pub fn find_substring(&mut self, text: &str, pattern: &str) -> Vec<usize> {
        let text = text.as_bytes();
        let pattern = pattern.as_bytes();
        if pattern.is_empty() || pattern.len() > text.len() {
            return Vec::new();
        }
        let m = pattern.len();

        let text_signal: Vec<i64> = text.iter().map(|&b| i64::from(b)).collect();
        let reversed_pattern: Vec<i64> = pattern.iter().rev().map(|&b| i64::from(b)).collect();
        let conv = self.convolve(&text_signal, &reversed_pattern);

        let square = |b: u8| i64::from(b) * i64::from(b);
        let pattern_squares: i64 = pattern.iter().copied().map(square).sum();
        let mut window_squares: i64 = text[..m].iter().copied().map(square).sum();

        let mut result = Vec::new();
        let mut mismatch = pattern_squares - 2 * conv[m - 1] + window_squares;
        if mismatch == 0 {
            result.push(0);
        }
        for i in 1..=text.len() - m {
            window_squares += square(text[m - 1 + i]) - square(text[i - 1]);
            mismatch = pattern_squares - 2 * conv[m - 1 + i] + window_squares;
            if mismatch == 0 {
                result.push(i);
            }
        }
        result
    }

    /// Number of alignments where `pattern` fuzzily occurs in `text` with
    /// tolerance `k`: every pattern character must have a matching text
    /// character at most `k` positions away from its aligned slot.
    ///
    /// For each letter the ±k-dilated text mask is correlated with the
    /// exact pattern mask; an alignment whose letter-match total reaches
    /// `pattern.len()` is a fuzzy occurrence.
    pub fn fuzzy_matches(&mut self, text: &str, pattern: &str, k: usize) -> usize {
        let text = text.as_bytes();
        let pattern = pattern.as_bytes();
        let (n, m) = (text.len(), pattern.len());
        if m == 0 || m > n {
            return 0;
        }

        let mut letters: Vec<u8> = pattern.to_vec();
        letters.sort_unstable();
        letters.dedup();

        let mut matched = vec![0i64; n - m + 1];
        for letter in letters {
            // 1 wherever `letter` occurs within distance k
            let mut dilated = vec![0i64; n];
            let mut coverage = 0i64; // occurrences inside the current window
            for i in 0..n + k {
                if i < n && text[i] == letter {
                    coverage += 1;
                }
                if i > 2 * k && text[i - 2 * k - 1] == letter {
                    coverage -= 1;
                }
                if i >= k && coverage > 0 {
                    dilated[i - k] = 1;
                }
            }

            let reversed_mask: Vec<i64> = pattern
                .iter()
                .rev()
                .map(|&b| i64::from(b == letter))
                .collect();
            let conv = self.convolve(&dilated, &reversed_mask);
            for (i, total) in matched.iter_mut().enumerate() {
                *total += conv[m - 1 + i];
            }
        }

        matched.iter().filter(|&&total| total == m as i64).count()
    }

    /// The bit-reversal permutation applied to `samples`, whose length
    /// must be a power of two. Permutations are computed once per size.
    fn bit_reverse(&mut self, samples: Vec<Complex>) -> Vec<Complex> {
        let n = samples.len();
        debug_assert!(n.is_power_of_two());
        let permutation = self.permutations.entry(n).or_insert_with(|| {
            let bits = n.trailing_zeros();
            let mut permutation = vec![0usize; n];
            for i in 1..n {
                permutation[i] = permutation[i >> 1] >> 1 | ((i & 1) << (bits - 1));
            }
            permutation
        });
        permutation.iter().map(|&i| samples[i]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn schoolbook(lhs: &[i64], rhs: &[i64]) -> Vec<i64> {
        let mut out = vec![0i64; lhs.len() + rhs.len() - 1];
        for (i, &a) in lhs.iter().enumerate() {
            for (j, &b) in rhs.iter().enumerate() {
                out[i + j] += a * b;
            }
        }
        out
    }

    #[test]
    fn transform_round_trip() {
        let mut fft = Fft::new();
        let signal: Vec<Complex> = [1.0, 2.0, -1.0, 0.5, 3.0].iter().map(|&v| Complex::real(v)).collect();
        let spectrum = fft.transform(signal.clone(), Direction::Forward);
        let restored = fft.transform(spectrum, Direction::Inverse);
        for (orig, back) in signal.iter().zip(&restored) {
            assert!((orig.re - back.re).abs() < 1e-9);
            assert!(back.im.abs() < 1e-9);
        }
    }

    #[test]
    fn convolution_matches_schoolbook() {
        let mut fft = Fft::new();
        let a = [3, -1, 4, 1, -5, 9, 2];
        let b = [2, 7, -1, 8];
        assert_eq!(fft.convolve(&a, &b), schoolbook(&a, &b));
        assert_eq!(fft.convolve(&[5], &[7]), vec![35]);
        assert_eq!(fft.convolve(&[], &[1, 2]), Vec::<i64>::new());
    }

    #[test]
    fn real_pair_matches_separate_transforms() {
        let mut fft = Fft::new();
        let x = [1.0, 4.0, -2.0, 0.0, 7.0];
        let y = [3.0, 3.0, 1.0, -1.0, 2.0];
        let (spectrum_x, spectrum_y) = fft.transform_real_pair(&x, &y);

        let direct_x = fft.transform(x.iter().map(|&v| Complex::real(v)).collect(), Direction::Forward);
        let direct_y = fft.transform(y.iter().map(|&v| Complex::real(v)).collect(), Direction::Forward);
        for k in 0..direct_x.len() {
            assert!((spectrum_x[k].re - direct_x[k].re).abs() < 1e-9);
            assert!((spectrum_x[k].im - direct_x[k].im).abs() < 1e-9);
            assert!((spectrum_y[k].re - direct_y[k].re).abs() < 1e-9);
            assert!((spectrum_y[k].im - direct_y[k].im).abs() < 1e-9);
        }
    }

    #[test]
    fn cyclic_correlation_matches_brute_force() {
        let mut fft = Fft::new();
        let a = [1i64, 2, 3, 4];
        let b = [5i64, 6, 7, 8];
        let expected: Vec<i64> = (0..a.len())
            .map(|s| (0..a.len()).map(|i| a[i] * b[(i + s) % b.len()]).sum())
            .collect();
        assert_eq!(fft.cyclic_correlation(&a, &b), expected);
    }

    #[test]
    fn substring_positions() {
        let mut fft = Fft::new();
        assert_eq!(fft.find_substring("abacaba", "aba"), vec![0, 4]);
        assert_eq!(fft.find_substring("aaaa", "aa"), vec![0, 1, 2]);
        assert_eq!(fft.find_substring("abc", "abcd"), Vec::<usize>::new());
        assert_eq!(fft.find_substring("mississippi", "issi"), vec![1, 4]);
    }

    #[test]
    fn fuzzy_sample() {
        let mut fft = Fft::new();
        assert_eq!(fft.fuzzy_matches("AGCAATTCAT", "ACAT", 1), 3);
        // zero tolerance degenerates to exact search
        assert_eq!(fft.fuzzy_matches("abacaba", "aba", 0), 2);
        assert_eq!(fft.fuzzy_matches("abc", "", 1), 0);
    }

    #[test]
    fn permutation_cache_is_reused() {
        let mut fft = Fft::new();
        let _ = fft.convolve(&[1, 2, 3, 4], &[1, 1]);
        let sizes_before = fft.permutations.len();
        let _ = fft.convolve(&[4, 3, 2, 1], &[1, 1]);
        assert_eq!(fft.permutations.len(), sizes_before);
    }
}
