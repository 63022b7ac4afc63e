use algokit::fft::Fft;
use proptest::prelude::*;

#[test]
fn fuzzy_sample_from_the_statement() {
    // S = AGCAATTCAT, T = ACAT, k = 1 has exactly three fuzzy alignments
    let mut fft = Fft::new();
    assert_eq!(fft.fuzzy_matches("AGCAATTCAT", "ACAT", 1), 3);
}

#[test]
fn fuzzy_tolerance_grows_matches() {
    let mut fft = Fft::new();
    let exact = fft.fuzzy_matches("abcabcabc", "abc", 0);
    let loose = fft.fuzzy_matches("abcabcabc", "abc", 1);
    let looser = fft.fuzzy_matches("abcabcabc", "abc", 5);
    assert_eq!(exact, 3);
    assert!(loose >= exact);
    assert!(looser >= loose);
    assert_eq!(looser, 7); // every alignment matches once anything goes
}

fn brute_fuzzy(text: &[u8], pattern: &[u8], k: usize) -> usize {
    (0..=text.len() - pattern.len())
        .filter(|&shift| {
            pattern.iter().enumerate().all(|(j, &p)| {
                let lo = (shift + j).saturating_sub(k);
                let hi = (shift + j + k).min(text.len() - 1);
                text[lo..=hi].contains(&p)
            })
        })
        .count()
}

proptest! {
    #[test]
    fn convolution_matches_schoolbook(
        a in prop::collection::vec(-100i64..100, 1..40),
        b in prop::collection::vec(-100i64..100, 1..40),
    ) {
        let mut expected = vec![0i64; a.len() + b.len() - 1];
        for (i, &x) in a.iter().enumerate() {
            for (j, &y) in b.iter().enumerate() {
                expected[i + j] += x * y;
            }
        }
        let mut fft = Fft::new();
        prop_assert_eq!(fft.convolve(&a, &b), expected);
    }

    #[test]
    fn substring_search_matches_scan(text in "[abc]{1,50}", pattern in "[abc]{1,5}") {
        prop_assume!(pattern.len() <= text.len());
        let expected: Vec<usize> = (0..=text.len() - pattern.len())
            .filter(|&i| text[i..].starts_with(&pattern))
            .collect();
        let mut fft = Fft::new();
        prop_assert_eq!(fft.find_substring(&text, &pattern), expected);
    }

    #[test]
    fn fuzzy_search_matches_brute_force(
        text in "[AGCT]{4,30}",
        pattern in "[AGCT]{1,4}",
        k in 0usize..3,
    ) {
        prop_assume!(pattern.len() <= text.len());
        let expected = brute_fuzzy(text.as_bytes(), pattern.as_bytes(), k);
        let mut fft = Fft::new();
        prop_assert_eq!(fft.fuzzy_matches(&text, &pattern, k), expected);
    }
}
