//! Integer-ratio rebinning kernels for 1-D, 2-D and 3-D arrays.

use crate::error::RebinError;

/// How values are combined when resizing.
///
/// `Average` compresses by block-averaging and expands by linear
/// interpolation. `Sample` takes the first sample of each block when
/// compressing and the nearest source sample when expanding.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Mode {
    /// Block-average on compression, linear interpolation on expansion.
    #[default]
    Average,
    /// Nearest-sample in both directions.
    Sample,
}

/// Checks that `to` divides or is divided by `from`.
fn check_ratio(axis: usize, from: usize, to: usize) -> Result<(), RebinError> {
    if from == 0 {
        return Err(RebinError::EmptyInput);
    }
    if to == 0 {
        return Err(RebinError::ZeroSize { axis });
    }
    if to.max(from) % to.min(from) != 0 {
        return Err(RebinError::NonIntegerRatio { axis, from, to });
    }
    Ok(())
}

/// Resizes one axis of scalar data. Sizes must already be validated.
fn resize_1d(data: &[f64], new_len: usize, mode: Mode) -> Vec<f64> {
    let n = data.len();
    if new_len == n {
        return data.to_vec();
    }
    if new_len < n {
        let factor = n / new_len;
        match mode {
            Mode::Average => (0..new_len)
                .map(|i| {
                    let block = &data[i * factor..(i + 1) * factor];
                    block.iter().sum::<f64>() / factor as f64
                })
                .collect(),
            Mode::Sample => (0..new_len).map(|i| data[i * factor]).collect(),
        }
    } else {
        let factor = new_len / n;
        (0..new_len)
            .map(|i| {
                // Fractional source position is i*n/new_len = i/factor.
                let base = i / factor;
                match mode {
                    Mode::Sample => data[base],
                    Mode::Average => {
                        if base >= n - 1 {
                            // Past the last interior point the final value repeats.
                            data[n - 1]
                        } else {
                            let frac = (i % factor) as f64 / factor as f64;
                            data[base] + frac * (data[base + 1] - data[base])
                        }
                    }
                }
            })
            .collect()
    }
}

/// Resizes the outer axis of nested data, combining whole rows element-wise.
fn resize_rows<T, F>(rows: &[T], new_len: usize, mode: Mode, combine: F) -> Vec<T>
where
    T: Clone,
    F: Fn(&[&T], &[f64]) -> T,
{
    let n = rows.len();
    if new_len == n {
        return rows.to_vec();
    }
    if new_len < n {
        let factor = n / new_len;
        match mode {
            Mode::Average => (0..new_len)
                .map(|i| {
                    let block: Vec<&T> = rows[i * factor..(i + 1) * factor].iter().collect();
                    let w = vec![1.0 / factor as f64; factor];
                    combine(&block, &w)
                })
                .collect(),
            Mode::Sample => (0..new_len).map(|i| rows[i * factor].clone()).collect(),
        }
    } else {
        let factor = new_len / n;
        (0..new_len)
            .map(|i| {
                let base = i / factor;
                match mode {
                    Mode::Sample => rows[base].clone(),
                    Mode::Average => {
                        if base >= n - 1 {
                            rows[n - 1].clone()
                        } else {
                            let frac = (i % factor) as f64 / factor as f64;
                            combine(&[&rows[base], &rows[base + 1]], &[1.0 - frac, frac])
                        }
                    }
                }
            })
            .collect()
    }
}

fn check_rectangular<T>(rows: &[Vec<T>]) -> Result<usize, RebinError> {
    if rows.is_empty() || rows[0].is_empty() {
        return Err(RebinError::EmptyInput);
    }
    let expected = rows[0].len();
    for (row, r) in rows.iter().enumerate() {
        if r.len() != expected {
            return Err(RebinError::RaggedInput {
                row,
                got: r.len(),
                expected,
            });
        }
    }
    Ok(expected)
}

/// Rebins a 1-D array to `new_len`.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`RebinError::EmptyInput`] | input is empty |
/// | [`RebinError::ZeroSize`] | `new_len` is zero |
/// | [`RebinError::NonIntegerRatio`] | `new_len` neither divides nor multiplies the input length |
pub fn rebin_1d(data: &[f64], new_len: usize, mode: Mode) -> Result<Vec<f64>, RebinError> {
    check_ratio(0, data.len(), new_len)?;
    Ok(resize_1d(data, new_len, mode))
}

/// Rebins a 2-D array (outer axis 0, inner axis 1) to `new_shape`.
///
/// Axes are resized independently, inner axis first.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`RebinError::EmptyInput`] | input is empty along any axis |
/// | [`RebinError::RaggedInput`] | rows have differing lengths |
/// | [`RebinError::ZeroSize`] | an output size is zero |
/// | [`RebinError::NonIntegerRatio`] | an axis pair is not integer-related |
pub fn rebin_2d(
    data: &[Vec<f64>],
    new_shape: (usize, usize),
    mode: Mode,
) -> Result<Vec<Vec<f64>>, RebinError> {
    let width = check_rectangular(data)?;
    check_ratio(0, data.len(), new_shape.0)?;
    check_ratio(1, width, new_shape.1)?;

    let inner: Vec<Vec<f64>> = data
        .iter()
        .map(|row| resize_1d(row, new_shape.1, mode))
        .collect();

    Ok(resize_rows(&inner, new_shape.0, mode, |rows, weights| {
        let mut acc = vec![0.0; new_shape.1];
        for (row, &w) in rows.iter().zip(weights) {
            for (a, &v) in acc.iter_mut().zip(row.iter()) {
                *a += w * v;
            }
        }
        acc
    }))
}

/// Rebins a 3-D array (axes 0, 1, 2 from outer to inner) to `new_shape`.
///
/// Each plane is rebinned in 2-D first, then the outer axis is resized.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`RebinError::EmptyInput`] | input is empty along any axis |
/// | [`RebinError::RaggedInput`] | nested arrays are not rectangular |
/// | [`RebinError::ZeroSize`] | an output size is zero |
/// | [`RebinError::NonIntegerRatio`] | an axis pair is not integer-related |
pub fn rebin_3d(
    data: &[Vec<Vec<f64>>],
    new_shape: (usize, usize, usize),
    mode: Mode,
) -> Result<Vec<Vec<Vec<f64>>>, RebinError> {
    if data.is_empty() {
        return Err(RebinError::EmptyInput);
    }
    check_ratio(0, data.len(), new_shape.0)?;

    let planes: Vec<Vec<Vec<f64>>> = data
        .iter()
        .map(|plane| rebin_2d(plane, (new_shape.1, new_shape.2), mode))
        .collect::<Result<_, _>>()?;

    Ok(resize_rows(&planes, new_shape.0, mode, |planes, weights| {
        let mut acc = vec![vec![0.0; new_shape.2]; new_shape.1];
        for (plane, &w) in planes.iter().zip(weights) {
            for (arow, prow) in acc.iter_mut().zip(plane.iter()) {
                for (a, &v) in arow.iter_mut().zip(prow.iter()) {
                    *a += w * v;
                }
            }
        }
        acc
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn identity_1d() {
        let data = vec![1.0, 2.0, 3.0];
        let out = rebin_1d(&data, 3, Mode::Average).unwrap();
        assert_eq!(out, data);
    }

    #[test]
    fn compress_average() {
        let data = vec![1.0, 3.0, 5.0, 7.0];
        let out = rebin_1d(&data, 2, Mode::Average).unwrap();
        assert_relative_eq!(out[0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(out[1], 6.0, epsilon = 1e-12);
    }

    #[test]
    fn compress_sample_takes_block_start() {
        let data = vec![1.0, 3.0, 5.0, 7.0];
        let out = rebin_1d(&data, 2, Mode::Sample).unwrap();
        assert_eq!(out, vec![1.0, 5.0]);
    }

    #[test]
    fn expand_interpolates_and_repeats_tail() {
        let data = vec![0.0, 4.0];
        let out = rebin_1d(&data, 4, Mode::Average).unwrap();
        assert_eq!(out, vec![0.0, 2.0, 4.0, 4.0]);
    }

    #[test]
    fn expand_sample_repeats_blocks() {
        let data = vec![0.0, 4.0];
        let out = rebin_1d(&data, 4, Mode::Sample).unwrap();
        assert_eq!(out, vec![0.0, 0.0, 4.0, 4.0]);
    }

    #[test]
    fn expand_three_to_six() {
        let data = vec![0.0, 2.0, 6.0];
        let out = rebin_1d(&data, 6, Mode::Average).unwrap();
        assert_eq!(out, vec![0.0, 1.0, 2.0, 4.0, 6.0, 6.0]);
    }

    #[test]
    fn non_integer_ratio_rejected() {
        let data = vec![1.0; 6];
        let err = rebin_1d(&data, 4, Mode::Average).unwrap_err();
        assert!(matches!(
            err,
            RebinError::NonIntegerRatio {
                axis: 0,
                from: 6,
                to: 4
            }
        ));
    }

    #[test]
    fn zero_size_rejected() {
        let err = rebin_1d(&[1.0, 2.0], 0, Mode::Average).unwrap_err();
        assert!(matches!(err, RebinError::ZeroSize { axis: 0 }));
    }

    #[test]
    fn empty_input_rejected() {
        let err = rebin_1d(&[], 4, Mode::Average).unwrap_err();
        assert!(matches!(err, RebinError::EmptyInput));
    }

    #[test]
    fn rebin_2d_block_average() {
        let data = vec![
            vec![1.0, 1.0, 3.0, 3.0],
            vec![1.0, 1.0, 3.0, 3.0],
            vec![5.0, 5.0, 7.0, 7.0],
            vec![5.0, 5.0, 7.0, 7.0],
        ];
        let out = rebin_2d(&data, (2, 2), Mode::Average).unwrap();
        assert_eq!(out.len(), 2);
        assert_relative_eq!(out[0][0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(out[0][1], 3.0, epsilon = 1e-12);
        assert_relative_eq!(out[1][0], 5.0, epsilon = 1e-12);
        assert_relative_eq!(out[1][1], 7.0, epsilon = 1e-12);
    }

    #[test]
    fn rebin_2d_expand_rows() {
        let data = vec![vec![0.0, 0.0], vec![4.0, 8.0]];
        let out = rebin_2d(&data, (4, 2), Mode::Average).unwrap();
        assert_eq!(out.len(), 4);
        assert_relative_eq!(out[1][0], 2.0, epsilon = 1e-12);
        assert_relative_eq!(out[1][1], 4.0, epsilon = 1e-12);
        // Tail rows repeat the final row.
        assert_eq!(out[2], out[3]);
    }

    #[test]
    fn rebin_2d_ragged_rejected() {
        let data = vec![vec![1.0, 2.0], vec![3.0]];
        let err = rebin_2d(&data, (2, 2), Mode::Average).unwrap_err();
        assert!(matches!(err, RebinError::RaggedInput { row: 1, .. }));
    }

    #[test]
    fn rebin_2d_mixed_axes() {
        // Compress axis 0 by 2, expand axis 1 by 2.
        let data = vec![vec![0.0, 4.0], vec![2.0, 6.0]];
        let out = rebin_2d(&data, (1, 4), Mode::Average).unwrap();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].len(), 4);
        // Inner axis first: rows become [0,2,4,4] and [2,4,6,6]; averaged.
        assert_relative_eq!(out[0][0], 1.0, epsilon = 1e-12);
        assert_relative_eq!(out[0][1], 3.0, epsilon = 1e-12);
        assert_relative_eq!(out[0][2], 5.0, epsilon = 1e-12);
        assert_relative_eq!(out[0][3], 5.0, epsilon = 1e-12);
    }

    #[test]
    fn rebin_3d_shapes() {
        let data = vec![vec![vec![1.0; 4]; 4]; 4];
        let out = rebin_3d(&data, (2, 2, 2), Mode::Average).unwrap();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].len(), 2);
        assert_eq!(out[0][0].len(), 2);
        assert_relative_eq!(out[1][1][1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn rebin_3d_average_blocks() {
        let data = vec![
            vec![vec![0.0, 0.0], vec![0.0, 0.0]],
            vec![vec![8.0, 8.0], vec![8.0, 8.0]],
        ];
        let out = rebin_3d(&data, (1, 1, 1), Mode::Average).unwrap();
        assert_relative_eq!(out[0][0][0], 4.0, epsilon = 1e-12);
    }

    #[test]
    fn rebin_3d_non_integer_rejected() {
        let data = vec![vec![vec![1.0; 3]; 3]; 3];
        let err = rebin_3d(&data, (3, 3, 2), Mode::Average).unwrap_err();
        assert!(matches!(err, RebinError::NonIntegerRatio { axis: 2, .. }));
    }

    #[test]
    fn mode_is_send_and_sync() {
        fn assert_impl<T: Send + Sync>() {}
        assert_impl::<Mode>();
    }
}
