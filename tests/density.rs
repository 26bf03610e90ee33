use kira_pseudotimeqc::EvalError;
use kira_pseudotimeqc::checks::evaluate_density;
use kira_pseudotimeqc::config::DensityParams;
use kira_pseudotimeqc::model::Embedding;

fn lattice(side: usize) -> Embedding {
    let mut cells = Vec::new();
    let mut coords = Vec::new();
    for i in 0..side {
        for j in 0..side {
            cells.push(format!("c{}_{}", i, j));
            coords.push([i as f64, j as f64]);
        }
    }
    Embedding::new(cells, coords).unwrap()
}

fn with_width(bin_width: f64) -> DensityParams {
    DensityParams {
        bin_width,
        ..DensityParams::default()
    }
}

#[test]
fn coincident_cells_fill_their_support() {
    let cells: Vec<String> = (0..5).map(|i| format!("c{}", i)).collect();
    let emb = Embedding::new(cells, vec![[1.0, 1.0]; 5]).unwrap();
    let res = evaluate_density(&emb, &DensityParams::default()).unwrap();
    assert_eq!(res.occupied_rate, 1.0);
}

#[test]
fn lattice_at_its_own_spacing_is_fully_occupied() {
    let res = evaluate_density(&lattice(10), &with_width(1.0)).unwrap();
    assert_eq!(res.occupied_bins, 100);
    assert_eq!(res.candidate_bins, 100);
    assert_eq!(res.occupied_rate, 1.0);
}

#[test]
fn finer_grid_exposes_gaps() {
    let emb = lattice(10);
    let r1 = evaluate_density(&emb, &with_width(1.0)).unwrap().occupied_rate;
    let half = evaluate_density(&emb, &with_width(0.5)).unwrap();
    let r4 = evaluate_density(&emb, &with_width(0.25)).unwrap().occupied_rate;

    // 18 x 18 interior bins plus 19 occupied bins on the far edges
    assert_eq!(half.candidate_bins, 343);
    assert_eq!(half.occupied_bins, 100);
    assert!(r1 > half.occupied_rate);
    assert!(half.occupied_rate > r4);
}

#[test]
fn oversized_grid_is_a_configuration_error() {
    let err = evaluate_density(&lattice(10), &with_width(1e-6)).unwrap_err();
    assert!(matches!(err, EvalError::Configuration(_)));
}

fn scaled_lattice(side: usize, spread: f64) -> Embedding {
    let emb = lattice(side);
    let coords = emb.coords().iter().map(|p| [p[0] * spread, p[1] * spread]).collect();
    Embedding::new(emb.cells().to_vec(), coords).unwrap()
}

#[test]
fn wider_spread_lowers_occupancy() {
    let params = with_width(1.0);
    let rates: Vec<f64> = [1.0, 2.0, 4.0, 8.0]
        .iter()
        .map(|&s| evaluate_density(&scaled_lattice(10, s), &params).unwrap().occupied_rate)
        .collect();
    assert_eq!(rates[0], 1.0);
    for pair in rates.windows(2) {
        assert!(pair[1] < pair[0], "{:?}", rates);
    }
}

fn collinear(spread: f64) -> Embedding {
    let cells: Vec<String> = (0..10).map(|i| format!("c{}", i)).collect();
    let coords = (0..10).map(|i| [i as f64 * spread / 9.0, 0.0]).collect();
    Embedding::new(cells, coords).unwrap()
}

#[test]
fn collinear_cells_count_gaps_along_their_segment() {
    let params = DensityParams::default();
    let tight = evaluate_density(&collinear(1.0), &params).unwrap();
    assert_eq!(tight.occupied_rate, 1.0);

    let wide = evaluate_density(&collinear(10.0), &params).unwrap();
    assert_eq!(wide.candidate_bins, 21);
    assert_eq!(wide.occupied_bins, 10);

    let wider = evaluate_density(&collinear(100.0), &params).unwrap();
    assert_eq!(wider.candidate_bins, 201);
    assert!(wider.occupied_rate < wide.occupied_rate);
}

#[test]
fn diagonal_cells_are_not_fully_dense() {
    let cells: Vec<String> = (0..5).map(|i| format!("c{}", i)).collect();
    let coords = (0..5).map(|i| [i as f64 * 5.0, i as f64 * 5.0]).collect();
    let emb = Embedding::new(cells, coords).unwrap();
    let res = evaluate_density(&emb, &with_width(1.0)).unwrap();
    assert_eq!(res.occupied_bins, 5);
    assert!(res.candidate_bins >= 21);
    assert!(res.occupied_rate < 0.25);
}

#[test]
fn huge_range_is_a_configuration_error() {
    let cells: Vec<String> = (0..3).map(|i| format!("c{}", i)).collect();
    let emb = Embedding::new(cells, vec![[0.0, 0.0], [1e20, 0.0], [0.0, 1.0]]).unwrap();
    let err = evaluate_density(&emb, &DensityParams::default()).unwrap_err();
    assert!(matches!(err, EvalError::Configuration(_)));
}
