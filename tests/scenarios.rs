use netsimplex::{solve, Error, Network, NetworkSimplex, Pricing};

#[test]
fn single_edge_carries_the_supply() {
    let solution = solve(2, 1, 5, &[1, -1], &[0], &[1], &[3]).unwrap();
    assert_eq!(solution.flows(), &[1]);
    assert_eq!(solution.total_cost(), 3);
}

#[test]
fn imbalanced_supplies_are_infeasible() {
    assert_eq!(
        solve(2, 1, 5, &[1, -2], &[0], &[1], &[3]),
        Err(Error::Infeasible)
    );
}

#[test]
fn triangle_routes_on_the_cheaper_path() {
    // 0 -> 1 -> 2 costs 2 per unit, 0 -> 2 costs 5
    let solution = solve(3, 3, 10, &[2, 0, -2], &[0, 1, 0], &[1, 2, 2], &[1, 1, 5]).unwrap();
    assert_eq!(solution.flows(), &[2, 2, 0]);
    assert_eq!(solution.total_cost(), 4);

    // 0 -> 1 -> 2 costs 6 per unit, 0 -> 2 costs 4
    let solution = solve(3, 3, 10, &[2, 0, -2], &[0, 1, 0], &[1, 2, 2], &[3, 3, 4]).unwrap();
    assert_eq!(solution.flows(), &[0, 0, 2]);
    assert_eq!(solution.total_cost(), 8);
}

#[test]
fn zero_capacity_on_the_only_path_is_infeasible() {
    assert_eq!(
        solve(3, 2, 0, &[1, 0, -1], &[0, 1], &[1, 2], &[1, 1]),
        Err(Error::Infeasible)
    );

    let g = Network::with_capacities(vec![1i64, 0, -1], &[(0, 1), (1, 2)], &[4, 0], &[1, 1]).unwrap();
    assert_eq!(NetworkSimplex::new().solve(&g), Err(Error::Infeasible));
}

#[test]
fn negative_cycle_of_unbounded_capacity() {
    assert_eq!(
        solve(3, 3, i64::MAX, &[0, 0, 0], &[0, 1, 2], &[1, 2, 0], &[-3, 1, 1]),
        Err(Error::Unbounded)
    );
    assert_eq!(
        solve(4, 4, i64::MAX, &[1, 0, 0, -1], &[0, 1, 2, 1], &[1, 2, 1, 3], &[1, -2, 1, 1]),
        Err(Error::Unbounded)
    );

    // the same cycle with finite capacity is simply saturated
    let solution = solve(3, 3, 7, &[0, 0, 0], &[0, 1, 2], &[1, 2, 0], &[-3, 1, 1]).unwrap();
    assert_eq!(solution.flows(), &[7, 7, 7]);
    assert_eq!(solution.total_cost(), -7);
}

#[test]
fn unbounded_detection_needs_the_whole_cycle_unbounded() {
    let edges = [(0, 1), (1, 2), (2, 0)];
    let g = Network::with_capacities(vec![0i64; 3], &edges, &[i64::MAX, i64::MAX, 6], &[-3, 1, 1]).unwrap();
    let solution = NetworkSimplex::new().solve(&g).unwrap();
    assert_eq!(solution.flows(), &[6, 6, 6]);
}

#[test]
fn out_of_range_vertex_is_rejected() {
    assert_eq!(
        solve(2, 2, 5, &[1, -1], &[0, 3], &[1, 0], &[1, 1]),
        Err(Error::InvalidIndex { edge: 1, vertex: 3 })
    );
}

#[test]
fn huge_costs_overflow_instead_of_wrapping() {
    assert_eq!(
        solve(2, 1, 5, &[1, -1], &[0], &[1], &[i64::MAX]),
        Err(Error::NumericOverflow)
    );
}

#[test]
fn opposite_costs_near_the_limit_cancel() {
    let big = i64::MAX / 8;
    let g = Network::new(vec![2i64, -2], [(0, 1), (0, 1)], 1, &[big, -big]).unwrap();
    let solution = NetworkSimplex::new().solve(&g).unwrap();
    assert_eq!(solution.flows(), &[1, 1]);
    assert_eq!(solution.total_cost(), 0);
}

#[test]
fn every_pricing_rule_finds_the_optimum() {
    for rule in [Pricing::FirstEligible, Pricing::BestEligible, Pricing::BlockSearch] {
        let g = Network::new(
            vec![4i32, 0, 0, -4],
            [(0, 1), (0, 2), (1, 3), (2, 3), (1, 2)],
            3,
            &[2, 2, 3, 1, 1],
        )
        .unwrap();
        let solution = NetworkSimplex::new().with_pricing(rule).solve(&g).unwrap();
        // three units over 0 -> 2 -> 3 (cost 3) and one over 0 -> 1 -> 3 (cost 5)
        assert_eq!(solution.total_cost(), 14);
        assert_eq!(solution.flows(), &[1, 3, 1, 3, 0]);
    }
}
