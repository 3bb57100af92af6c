//! Round-trip properties of integer-ratio rebinning.

use aeolus_rebin::{Mode, rebin_1d, rebin_2d, rebin_3d};

#[test]
fn same_shape_is_identity() {
    let data: Vec<f64> = (0..16).map(|i| (i as f64).sin()).collect();
    let out = rebin_1d(&data, 16, Mode::Average).unwrap();
    assert_eq!(out, data);

    let grid = vec![data.clone(), data.clone()];
    let out2 = rebin_2d(&grid, (2, 16), Mode::Sample).unwrap();
    assert_eq!(out2, grid);

    let cube = vec![grid.clone(), grid.clone(), grid.clone()];
    let out3 = rebin_3d(&cube, (3, 2, 16), Mode::Average).unwrap();
    assert_eq!(out3, cube);
}

#[test]
fn sample_mode_down_then_up_is_exact_on_block_constant_data() {
    // Data constant over blocks of 4 survives a 4x down/up round trip exactly.
    let data: Vec<f64> = (0..32).flat_map(|i| std::iter::repeat_n(i as f64, 4)).collect();
    let down = rebin_1d(&data, 32, Mode::Sample).unwrap();
    let up = rebin_1d(&down, 128, Mode::Sample).unwrap();
    assert_eq!(up, data);
}

#[test]
fn average_mode_down_then_up_preserves_block_means() {
    let data: Vec<f64> = (0..8).flat_map(|i| std::iter::repeat_n(i as f64, 2)).collect();
    let down = rebin_1d(&data, 8, Mode::Average).unwrap();
    // Each downsampled value equals the block mean, which here is the block value.
    for (i, &v) in down.iter().enumerate() {
        assert!((v - i as f64).abs() < 1e-12);
    }
}

#[test]
fn two_dimensional_round_trip_in_sample_mode() {
    let grid: Vec<Vec<f64>> = (0..4)
        .map(|r| (0..4).map(|c| (r * 4 + c) as f64).collect())
        .collect();
    let up = rebin_2d(&grid, (8, 8), Mode::Sample).unwrap();
    let down = rebin_2d(&up, (4, 4), Mode::Sample).unwrap();
    assert_eq!(down, grid);
}
