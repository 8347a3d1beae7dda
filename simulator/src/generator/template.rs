/// `length` values stepping evenly from `from` to `to`, both ends included.
pub fn ramp(from: f64, to: f64, length: usize) -> Vec<f64> {
    match length {
        0 => Vec::new(),
        1 => vec![from],
        _ => {
            let step = (to - from) / (length - 1) as f64;
            (0..length).map(|i| from + step * i as f64).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_hits_both_ends() {
        assert_eq!(ramp(45.0, -45.0, 5), vec![45.0, 22.5, 0.0, -22.5, -45.0]);
        assert_eq!(ramp(1.0, 2.0, 1), vec![1.0]);
        assert!(ramp(1.0, 2.0, 0).is_empty());
    }
}
